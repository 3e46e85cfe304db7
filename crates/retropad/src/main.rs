//! retropad - a classic notepad for the terminal.
//!
//! Built with crossterm and ratatui on top of `retropad-core`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p retropad -- [FILE] [--settings retropad.ini] [--log-file retropad.log]
//! ```
//!
//! # Keys
//!
//! - F10 or Alt+F/E/O/V/H: open the menu bar
//! - Ctrl+N / Ctrl+O / Ctrl+S / F12 / Ctrl+P / Ctrl+Q: new, open, save, save as, print, exit
//! - Ctrl+Z / Ctrl+X / Ctrl+C / Ctrl+V / Del: undo, cut, copy, paste, delete
//! - Ctrl+F / F3 / Shift+F3 / Ctrl+H / Ctrl+G: find, find next, find previous, replace, go to
//! - Ctrl+A / F5: select all, insert time and date
//! - Arrows, Home/End, PageUp/PageDown move the caret; Shift extends the selection

mod keymap;
mod ui;

use clap::Parser;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use retropad_core::{AppContext, Clipboard, SettingsStore};
use std::{
    fs::File,
    io::{self, stdout},
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Parser)]
#[command(name = "retropad", version, about = "A classic notepad for the terminal")]
struct Args {
    /// File to open; created on first save if it does not exist.
    file: Option<PathBuf>,

    /// Settings file. Defaults to `retropad.ini` next to the executable.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Write log output to this file. The level is read from `RETROPAD_LOG`.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Start with word wrap turned on.
    #[arg(long)]
    word_wrap: bool,
}

/// An open top-level menu and its highlighted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MenuCursor {
    menu: usize,
    item: usize,
}

/// Terminal front end state around the core [`AppContext`].
struct Shell {
    app: AppContext,
    menu: Option<MenuCursor>,
    /// First logical line shown.
    scroll_line: usize,
    /// Wrapped rows of `scroll_line` hidden above the viewport.
    scroll_row: usize,
    /// Cells scrolled off to the left (word wrap off).
    scroll_left: usize,
    /// Text area from the last frame.
    text_area: Rect,
    last_title: String,
}

impl Shell {
    fn new(app: AppContext) -> Self {
        Self {
            app,
            menu: None,
            scroll_line: 0,
            scroll_row: 0,
            scroll_left: 0,
            text_area: Rect::default(),
            last_title: String::new(),
        }
    }

    fn page_height(&self) -> usize {
        usize::from(self.text_area.height).max(1)
    }
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("RETROPAD_LOG", "info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();
    Ok(())
}

fn settings_store(args: &Args) -> Option<SettingsStore> {
    if let Some(path) = &args.settings {
        return Some(SettingsStore::new(path));
    }
    match SettingsStore::beside_executable() {
        Ok(store) => Some(store),
        Err(err) => {
            log::warn!("settings disabled: {err}");
            None
        }
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let mut app = AppContext::new(settings_store(&args)).with_clipboard(Clipboard::system());
    app.set_word_wrap(args.word_wrap);
    if let Some(path) = &args.file
        && let Err(err) = app.open_or_create(path)
    {
        eprintln!("retropad: {err}");
        std::process::exit(1);
    }
    log::info!("starting with {}", app.title());

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut shell = Shell::new(app);
    let result = run_app(&mut terminal, &mut shell);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("terminal error: {err}");
        eprintln!("retropad: {err}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    shell: &mut Shell,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| shell.render(f))?;

        let title = shell.app.title();
        if title != shell.last_title {
            execute!(terminal.backend_mut(), SetTitle(&title))?;
            shell.last_title = title;
        }

        if shell.app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => shell.handle_key_event(key),
                Event::Paste(text) => shell.handle_paste(&text),
                // Redrawn on the next iteration.
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    Ok(())
}
