use pretty_assertions::assert_eq;
use retropad_core::menu::resolve;
use retropad_core::{
    AppContext, Clipboard, Command, ConfirmAnswer, Dialog, FindAction, FontDescriptor, MENU_BAR,
    MessageKind, PendingAction, SettingsStore,
};
use std::fs;
use std::path::Path;

fn app_with(text: &str) -> AppContext {
    let mut app = AppContext::new(None);
    app.document_mut().replace_selection(text);
    app.document_mut().set_selection(0, 0);
    app
}

fn selection(app: &AppContext) -> (usize, usize) {
    app.document().selection_range()
}

fn set_find_text(app: &mut AppContext, find: &str, replace: &str) {
    match app.dialog_mut() {
        Dialog::Find(d) => d.find_what.set(find),
        Dialog::Replace(d) => {
            d.find_what.set(find);
            d.replace_with.set(replace);
        }
        other => panic!("expected a find or replace dialog, got {other:?}"),
    }
}

fn set_path(app: &mut AppContext, path: &Path) {
    match app.dialog_mut() {
        Dialog::Open { path: field } | Dialog::SaveAs { path: field, .. } => {
            field.set(&path.display().to_string())
        }
        other => panic!("expected a path prompt, got {other:?}"),
    }
}

#[test]
fn test_save_enabled_only_when_modified() {
    let mut app = AppContext::new(None);
    assert!(!app.command_state(Command::FileSave).enabled);
    assert!(app.command_state(Command::FileSaveAs).enabled);

    app.document_mut().type_char('x');
    assert!(app.command_state(Command::FileSave).enabled);
}

#[test]
fn test_word_wrap_hides_and_restores_status_bar() {
    let mut app = AppContext::new(None);
    assert!(app.status_visible());

    app.execute(Command::FormatWordWrap);
    assert!(app.word_wrap());
    assert!(!app.status_visible());
    assert!(app.command_state(Command::FormatWordWrap).checked);
    assert!(!app.command_state(Command::EditGoTo).enabled);
    assert!(!app.command_state(Command::ViewStatusBar).enabled);

    // Disabled while wrapping: the toggle is ignored.
    app.execute(Command::ViewStatusBar);
    assert!(!app.status_visible());

    app.execute(Command::FormatWordWrap);
    assert!(!app.word_wrap());
    assert!(app.status_visible());
    assert!(app.command_state(Command::EditGoTo).enabled);
    assert!(app.command_state(Command::ViewStatusBar).checked);
}

#[test]
fn test_hidden_status_bar_stays_hidden_after_wrap() {
    let mut app = AppContext::new(None);
    app.execute(Command::ViewStatusBar);
    assert!(!app.status_visible());

    app.set_word_wrap(true);
    app.set_word_wrap(false);
    assert!(!app.status_visible());
}

#[test]
fn test_menu_resolution_follows_context() {
    let mut app = AppContext::new(None);
    app.set_word_wrap(true);

    let format = resolve(&MENU_BAR[2], &app);
    assert_eq!(format[0].item.label, "Word Wrap");
    assert!(format[0].state.checked);

    let view = resolve(&MENU_BAR[3], &app);
    assert!(!view[0].state.enabled);
}

#[test]
fn test_go_to_line() {
    let mut app = app_with("first\nsecond\nthird");

    app.execute(Command::EditGoTo);
    let Dialog::GoTo(d) = app.dialog_mut() else {
        panic!("expected go to dialog");
    };
    d.line.set("2");
    app.submit_go_to();
    assert_eq!(app.dialog(), &Dialog::None);
    assert_eq!(selection(&app), (6, 6));
    assert_eq!(app.status_text(), "Ln 2, Col 1    Lines: 3");

    app.go_to_line(99);
    assert_eq!(selection(&app), (13, 13));
}

#[test]
fn test_go_to_rejects_zero() {
    let mut app = app_with("a\nb");
    app.execute(Command::EditGoTo);
    let Dialog::GoTo(d) = app.dialog_mut() else {
        panic!("expected go to dialog");
    };
    d.line.set("0");
    app.submit_go_to();

    let message = app.message().unwrap();
    assert_eq!(message.kind, MessageKind::Warning);
    assert_eq!(message.text, "Enter a valid line number.");
    assert!(matches!(app.dialog(), Dialog::GoTo(_)));
    assert_eq!(selection(&app), (0, 0));
}

#[test]
fn test_find_next_cycles_through_matches() {
    let mut app = app_with("one two one");

    app.execute(Command::EditFind);
    set_find_text(&mut app, "one", "");
    app.submit_find_dialog(FindAction::FindNext);
    assert_eq!(selection(&app), (0, 3));

    app.close_dialog();
    app.execute(Command::EditFindNext);
    assert_eq!(selection(&app), (8, 11));
    app.execute(Command::EditFindNext);
    assert_eq!(selection(&app), (0, 3));

    // Shift+F3 searches backwards; nothing precedes 0 so it wraps to the last match.
    app.execute(Command::EditFindPrevious);
    assert_eq!(selection(&app), (8, 11));
    assert_eq!(app.message(), None);
}

#[test]
fn test_find_reports_missing_text() {
    let mut app = app_with("hello");
    app.execute(Command::EditFind);
    set_find_text(&mut app, "zzz", "");
    app.submit_find_dialog(FindAction::FindNext);

    assert_eq!(app.message().unwrap().text, "Cannot find the text.");
    assert_eq!(selection(&app), (0, 0));
    assert!(matches!(app.dialog(), Dialog::Find(_)));

    app.dismiss_message();
    assert_eq!(app.message(), None);
}

#[test]
fn test_match_case_from_dialog() {
    let mut app = app_with("Hello hello");
    app.execute(Command::EditFind);
    let Dialog::Find(d) = app.dialog_mut() else {
        panic!("expected find dialog");
    };
    d.find_what.set("hello");
    d.match_case = true;
    app.submit_find_dialog(FindAction::FindNext);
    assert_eq!(selection(&app), (6, 11));
    assert!(app.search_state().match_case);
}

#[test]
fn test_replace_one_at_a_time() {
    let mut app = app_with("foo foo");
    app.execute(Command::EditReplace);
    set_find_text(&mut app, "foo", "bar");

    app.submit_find_dialog(FindAction::Replace);
    assert_eq!(app.document().text(), "bar foo");
    assert!(app.document().is_modified());

    app.submit_find_dialog(FindAction::Replace);
    assert_eq!(app.document().text(), "bar bar");

    app.submit_find_dialog(FindAction::Replace);
    assert_eq!(app.document().text(), "bar bar");
    assert_eq!(app.message().unwrap().text, "Cannot find the text.");
}

#[test]
fn test_replace_all_reports_count() {
    let mut app = app_with("the quick brown fox the lazy dog");
    app.document_mut().set_modified(false);
    app.document_mut().set_selection(5, 5);
    app.execute(Command::EditReplace);
    set_find_text(&mut app, "the", "a");
    app.submit_find_dialog(FindAction::ReplaceAll);

    assert_eq!(app.document().text(), "a quick brown fox a lazy dog");
    assert_eq!(app.message().unwrap().text, "Replaced 2 occurrences.");
    assert!(app.document().is_modified());
    assert_eq!(selection(&app), (0, 0));

    // Replace all is a single undo step.
    app.execute(Command::EditUndo);
    assert_eq!(app.document().text(), "the quick brown fox the lazy dog");
}

#[test]
fn test_replace_all_singular_and_zero() {
    let mut app = app_with("one");
    app.document_mut().set_modified(false);
    app.execute(Command::EditReplace);

    set_find_text(&mut app, "zzz", "x");
    app.submit_find_dialog(FindAction::ReplaceAll);
    assert_eq!(app.message().unwrap().text, "Replaced 0 occurrences.");
    assert!(!app.document().is_modified());

    set_find_text(&mut app, "ONE", "1");
    app.submit_find_dialog(FindAction::ReplaceAll);
    assert_eq!(app.message().unwrap().text, "Replaced 1 occurrence.");
    assert_eq!(app.document().text(), "1");
}

#[test]
fn test_undo_toggles() {
    let mut app = AppContext::new(None);
    for ch in "abc".chars() {
        app.document_mut().type_char(ch);
    }
    app.execute(Command::EditUndo);
    assert_eq!(app.document().text(), "");
    app.execute(Command::EditUndo);
    assert_eq!(app.document().text(), "abc");
}

#[test]
fn test_cut_and_paste() {
    let mut app = app_with("hello world");
    assert!(!app.command_state(Command::EditPaste).enabled);

    app.document_mut().set_selection(0, 6);
    app.execute(Command::EditCut);
    assert_eq!(app.document().text(), "world");

    app.document_mut().set_selection(5, 5);
    app.execute(Command::EditPaste);
    assert_eq!(app.document().text(), "worldhello ");
}

#[test]
fn test_copy_then_paste_with_explicit_local_clipboard() {
    let mut app = app_with("abc").with_clipboard(Clipboard::local());
    app.document_mut().set_selection(0, 3);
    app.execute(Command::EditCopy);
    assert!(app.command_state(Command::EditPaste).enabled);

    app.document_mut().set_selection(3, 3);
    app.execute(Command::EditPaste);
    assert_eq!(app.document().text(), "abcabc");
}

#[test]
fn test_exit_without_changes_quits() {
    let mut app = AppContext::new(None);
    app.execute(Command::FileExit);
    assert!(app.should_quit());
}

#[test]
fn test_confirm_save_cancel_and_no() {
    let mut app = app_with("draft");
    app.execute(Command::FileNew);
    assert_eq!(app.dialog(), &Dialog::ConfirmSave(PendingAction::New));
    assert_eq!(
        app.confirm_save_prompt(),
        "Do you want to save changes to Untitled?"
    );

    app.answer_confirm_save(ConfirmAnswer::Cancel);
    assert_eq!(app.dialog(), &Dialog::None);
    assert_eq!(app.document().text(), "draft");

    app.execute(Command::FileNew);
    app.answer_confirm_save(ConfirmAnswer::No);
    assert_eq!(app.document().text(), "");
    assert!(!app.document().is_modified());
    assert_eq!(app.title(), "Untitled - retropad");
}

#[test]
fn test_confirm_save_yes_on_untitled_goes_through_save_as() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");

    let mut app = app_with("line one\nline two");
    app.execute(Command::FileExit);
    app.answer_confirm_save(ConfirmAnswer::Yes);
    assert!(matches!(
        app.dialog(),
        Dialog::SaveAs {
            then: Some(PendingAction::Exit),
            ..
        }
    ));

    set_path(&mut app, &path);
    app.submit_save_as();

    assert!(app.should_quit());
    assert_eq!(fs::read(&path).unwrap(), b"line one\r\nline two".to_vec());
    assert_eq!(app.title(), "notes.txt - retropad");
}

#[test]
fn test_open_then_save_keeps_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    fs::write(&path, b"\xEF\xBB\xBFa\nb").unwrap();

    let mut app = AppContext::new(None);
    app.execute(Command::FileOpen);
    set_path(&mut app, &path);
    app.submit_open();

    assert_eq!(app.dialog(), &Dialog::None);
    assert_eq!(app.document().text(), "a\nb");
    assert_eq!(app.title(), "doc.txt - retropad");

    app.document_mut().set_selection(3, 3);
    app.document_mut().type_char('!');
    assert_eq!(app.title(), "*doc.txt - retropad");

    app.execute(Command::FileSave);
    assert!(!app.document().is_modified());
    assert_eq!(fs::read(&path).unwrap(), b"\xEF\xBB\xBFa\nb!".to_vec());
}

#[test]
fn test_confirm_save_yes_with_path_saves_then_opens_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    fs::write(&path, "old").unwrap();

    let mut app = AppContext::new(None);
    app.open_path(&path).unwrap();
    app.document_mut().select_all();
    app.document_mut().replace_selection("new");

    app.execute(Command::FileOpen);
    assert!(app.confirm_save_prompt().ends_with("doc.txt?"));
    app.answer_confirm_save(ConfirmAnswer::Yes);

    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    assert!(matches!(app.dialog(), Dialog::Open { .. }));
}

#[test]
fn test_open_failure_shows_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = AppContext::new(None);
    app.execute(Command::FileOpen);
    set_path(&mut app, &dir.path().join("nope.txt"));
    app.submit_open();

    assert_eq!(app.message().unwrap().kind, MessageKind::Error);
    assert_eq!(app.title(), "Untitled - retropad");
}

#[test]
fn test_open_or_create_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.txt");

    let mut app = AppContext::new(None);
    app.open_or_create(&path).unwrap();
    assert_eq!(app.title(), "fresh.txt - retropad");
    assert!(app.document().is_empty());
    assert!(!path.exists());
}

#[test]
fn test_go_to_under_word_wrap_explains_why() {
    let mut app = app_with("one\ntwo");
    app.set_word_wrap(true);
    assert!(!app.command_state(Command::EditGoTo).enabled);

    app.execute(Command::EditGoTo);
    assert!(matches!(app.dialog(), Dialog::None));
    let message = app.message().unwrap();
    assert_eq!(message.text, "Go To is unavailable when Word Wrap is on.");
    assert_eq!(message.kind, MessageKind::Info);
}

#[test]
fn test_printing_reports_not_implemented() {
    for command in [Command::FilePageSetup, Command::FilePrint] {
        let mut app = AppContext::new(None);
        app.execute(command);
        assert_eq!(
            app.message().unwrap().text,
            "Printing is not implemented in retropad."
        );
    }
}

#[test]
fn test_view_help_message() {
    let mut app = AppContext::new(None);
    app.execute(Command::HelpViewHelp);
    assert_eq!(
        app.message().unwrap().text,
        "No help file is available for retropad."
    );
}

#[test]
fn test_font_choice_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("retropad.ini"));

    let mut app = AppContext::new(Some(store.clone()));
    assert_eq!(app.font(), &FontDescriptor::default());

    app.execute(Command::FormatFont);
    let Dialog::Font(d) = app.dialog_mut() else {
        panic!("expected font dialog");
    };
    d.face_name.set("Fixedsys");
    d.size.set("12");
    d.bold = true;
    app.submit_font();

    let saved = store.load_font().unwrap();
    assert_eq!(saved.face_name, "Fixedsys");
    assert_eq!(saved.height, -12);
    assert!(saved.is_bold());

    let reopened = AppContext::new(Some(store));
    assert_eq!(reopened.font(), &saved);
}
