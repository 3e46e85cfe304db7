use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use retropad_core::{AppContext, Document, SearchOptions, locate, replace_all};

const WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "héllo", "wörld",
];

fn random_text(word_count: usize) -> String {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut out = String::with_capacity(word_count * 6);
    for i in 0..word_count {
        out.push_str(WORDS[rng.gen_range(0..WORDS.len())]);
        out.push(if i % 12 == 11 { '\n' } else { ' ' });
    }
    out
}

fn bench_locate(c: &mut Criterion) {
    let text = random_text(200_000);
    let middle = text.chars().count() / 2;

    c.bench_function("locate/down_from_middle", |b| {
        b.iter(|| {
            locate(
                black_box(&text),
                black_box("lazy dog"),
                SearchOptions::down(true),
                middle,
            )
            .unwrap()
        })
    });

    c.bench_function("locate/up_case_insensitive", |b| {
        b.iter(|| {
            locate(
                black_box(&text),
                black_box("WÖRLD"),
                SearchOptions::up(false),
                middle,
            )
            .unwrap()
        })
    });

    c.bench_function("locate/absent_full_scan", |b| {
        b.iter(|| locate(black_box(&text), "zebra", SearchOptions::down(true), 0).unwrap())
    });
}

fn bench_replace_all(c: &mut Criterion) {
    let text = random_text(200_000);

    c.bench_function("replace_all/common_word", |b| {
        b.iter(|| black_box(replace_all(black_box(&text), "the", "a", true).unwrap().count))
    });

    c.bench_function("replace_all/through_app_context", |b| {
        b.iter_batched(
            || {
                let mut app = AppContext::new(None);
                *app.document_mut() = Document::from_text(&text);
                app
            },
            |mut app| {
                app.execute(retropad_core::Command::EditReplace);
                if let retropad_core::Dialog::Replace(d) = app.dialog_mut() {
                    d.find_what.set("fox");
                    d.replace_with.set("cat");
                }
                app.submit_find_dialog(retropad_core::FindAction::ReplaceAll);
                black_box(app.document().len_chars());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_locate, bench_replace_all);
criterion_main!(benches);
