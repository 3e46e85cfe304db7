//! Application context.
//!
//! [`AppContext`] owns everything the editor knows about its single document: the buffer,
//! where it came from, view flags, search state, the open dialog and the message layer. The
//! shell passes it to its handlers; nothing is global.
//!
//! # Example
//!
//! ```rust
//! use retropad_core::{AppContext, Command, Dialog, FindAction};
//!
//! let mut app = AppContext::new(None);
//! app.document_mut().replace_selection("the quick brown fox the lazy dog");
//!
//! app.execute(Command::EditReplace);
//! if let Dialog::Replace(d) = app.dialog_mut() {
//!     d.find_what.set("the");
//!     d.replace_with.set("a");
//! }
//! app.submit_find_dialog(FindAction::ReplaceAll);
//!
//! assert_eq!(app.document().text(), "a quick brown fox a lazy dog");
//! assert_eq!(app.message().unwrap().text, "Replaced 2 occurrences.");
//! ```

use crate::clipboard::Clipboard;
use crate::commands::{Command, CommandState};
use crate::dialog::{
    ConfirmAnswer, Dialog, FieldFocus, FindAction, FindDialog, FontDialog, GoToDialog,
    LINE_NUMBER_DIGITS_MAX, Message, PATH_MAX, PendingAction, ReplaceDialog, SEARCH_TEXT_MAX,
    TextField,
};
use crate::document::Document;
use crate::encoding::TextEncoding;
use crate::file_io::{self, FileError};
use crate::line_ending::LineEnding;
use crate::search::{self, SearchDirection, SearchMatch, SearchOptions};
use crate::settings::{FontDescriptor, SettingsStore};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Application name used in titles and message boxes.
pub const APP_TITLE: &str = "retropad";
/// Display name of a document without a path.
pub const UNTITLED_NAME: &str = "Untitled";

const NOT_FOUND_TEXT: &str = "Cannot find the text.";
const GO_TO_WRAPPED_TEXT: &str = "Go To is unavailable when Word Wrap is on.";

/// Last-used find/replace strings and flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    /// Text searched for by Find Next.
    pub find_text: String,
    pub replace_text: String,
    pub match_case: bool,
    /// Direction used by F3; Shift+F3 searches the other way.
    pub direction: SearchDirection,
}

impl SearchState {
    fn options(&self, direction: SearchDirection) -> SearchOptions {
        SearchOptions {
            case_sensitive: self.match_case,
            direction,
        }
    }
}

/// State of the editor window and its document.
#[derive(Debug)]
pub struct AppContext {
    document: Document,
    current_path: Option<PathBuf>,
    encoding: TextEncoding,
    line_ending: LineEnding,
    word_wrap: bool,
    status_visible: bool,
    status_before_wrap: bool,
    font: FontDescriptor,
    search: SearchState,
    dialog: Dialog,
    message: Option<Message>,
    clipboard: Clipboard,
    settings: Option<SettingsStore>,
    should_quit: bool,
}

impl AppContext {
    /// Create an empty untitled document. The font is loaded from `settings` when present.
    pub fn new(settings: Option<SettingsStore>) -> Self {
        let font = settings
            .as_ref()
            .and_then(SettingsStore::load_font)
            .unwrap_or_default();

        Self {
            document: Document::new(),
            current_path: None,
            encoding: TextEncoding::default(),
            line_ending: LineEnding::default(),
            word_wrap: false,
            status_visible: true,
            status_before_wrap: true,
            font,
            search: SearchState::default(),
            dialog: Dialog::None,
            message: None,
            clipboard: Clipboard::local(),
            settings,
            should_quit: false,
        }
    }

    /// Use `clipboard` for Cut, Copy and Paste instead of the in-process one.
    pub fn with_clipboard(mut self, clipboard: Clipboard) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// The open document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for editing keys and tests.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Path the document was opened from or last saved to.
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// Encoding used by the next save.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Line ending written by the next save.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn word_wrap(&self) -> bool {
        self.word_wrap
    }

    /// Whether the status bar is shown.
    pub fn status_visible(&self) -> bool {
        self.status_visible
    }

    /// Font applied to the edit area.
    pub fn font(&self) -> &FontDescriptor {
        &self.font
    }

    /// Strings and flags from the last find or replace.
    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    /// The open dialog, [`Dialog::None`] when there is none.
    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// Mutable dialog state for typing into its fields.
    pub fn dialog_mut(&mut self) -> &mut Dialog {
        &mut self.dialog
    }

    /// Dismiss the open dialog without applying it.
    pub fn close_dialog(&mut self) {
        self.dialog = Dialog::None;
    }

    /// The message box on top of everything else, if any.
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }

    /// Set once Exit has been confirmed.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Window title: `*name - retropad`, the star marking unsaved changes.
    pub fn title(&self) -> String {
        let name = self
            .current_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED_NAME.to_string());
        let star = if self.document.is_modified() { "*" } else { "" };
        format!("{star}{name} - {APP_TITLE}")
    }

    /// Status bar text for the selection start: `Ln 1, Col 1    Lines: 1`.
    pub fn status_text(&self) -> String {
        let (start, _) = self.document.selection_range();
        let (line, column) = self.document.position_of(start);
        format!(
            "Ln {}, Col {}    Lines: {}",
            line + 1,
            column + 1,
            self.document.line_count()
        )
    }

    /// Enabled/checked state of `command`; disabled commands are ignored by [`execute`].
    ///
    /// [`execute`]: Self::execute
    pub fn command_state(&self, command: Command) -> CommandState {
        let has_selection = !self.document.selection().is_empty();
        match command {
            Command::FileSave => CommandState::enabled_if(self.document.is_modified()),
            Command::EditUndo => CommandState::enabled_if(self.document.can_undo()),
            Command::EditCut | Command::EditCopy => CommandState::enabled_if(has_selection),
            Command::EditPaste => CommandState::enabled_if(self.clipboard.may_have_text()),
            Command::EditGoTo => CommandState::enabled_if(!self.word_wrap),
            Command::FormatWordWrap => CommandState::toggle(self.word_wrap),
            Command::ViewStatusBar => CommandState {
                enabled: !self.word_wrap,
                checked: self.status_visible,
            },
            _ => CommandState::ENABLED,
        }
    }

    /// Run a menu command. Failures are reported through [`message`](Self::message).
    pub fn execute(&mut self, command: Command) {
        // Ctrl+G still reaches Go To under word wrap so it can say why it is unavailable.
        if !self.command_state(command).enabled && command != Command::EditGoTo {
            log::debug!("ignoring disabled command {command:?}");
            return;
        }
        log::debug!("command {command:?}");

        match command {
            Command::FileNew => self.request(PendingAction::New),
            Command::FileOpen => self.request(PendingAction::Open),
            Command::FileSave => {
                self.save(false);
            }
            Command::FileSaveAs => {
                self.save(true);
            }
            Command::FilePageSetup | Command::FilePrint => {
                self.message = Some(Message::info(format!(
                    "Printing is not implemented in {APP_TITLE}."
                )));
            }
            Command::FileExit => self.request(PendingAction::Exit),
            Command::EditUndo => {
                self.document.undo();
            }
            Command::EditCut => self.cut(),
            Command::EditCopy => self.copy(),
            Command::EditPaste => self.paste(),
            Command::EditDelete => self.document.delete_forward(),
            Command::EditFind => self.show_find_dialog(),
            Command::EditFindNext => {
                self.find_next(false);
            }
            Command::EditFindPrevious => {
                self.find_next(true);
            }
            Command::EditReplace => self.show_replace_dialog(),
            Command::EditGoTo => self.show_go_to_dialog(),
            Command::EditSelectAll => self.document.select_all(),
            Command::EditTimeDate => self.insert_time_date(&Local::now()),
            Command::FormatWordWrap => self.set_word_wrap(!self.word_wrap),
            Command::FormatFont => {
                self.dialog = Dialog::Font(FontDialog::from_font(&self.font));
            }
            Command::ViewStatusBar => self.set_status_visible(!self.status_visible),
            Command::HelpViewHelp => {
                self.message = Some(Message::info(format!(
                    "No help file is available for {APP_TITLE}."
                )));
            }
            Command::HelpAbout => self.dialog = Dialog::About,
        }
    }

    // ---- File ------------------------------------------------------------------------------

    /// Run `action` now, or ask to save pending changes first.
    fn request(&mut self, action: PendingAction) {
        if self.document.is_modified() {
            self.dialog = Dialog::ConfirmSave(action);
        } else {
            self.perform(action);
        }
    }

    fn perform(&mut self, action: PendingAction) {
        match action {
            PendingAction::New => {
                self.dialog = Dialog::None;
                self.new_document();
            }
            PendingAction::Open => {
                self.dialog = Dialog::Open {
                    path: TextField::new(PATH_MAX),
                };
            }
            PendingAction::Exit => {
                self.dialog = Dialog::None;
                self.should_quit = true;
            }
        }
    }

    /// Prompt text for [`Dialog::ConfirmSave`].
    pub fn confirm_save_prompt(&self) -> String {
        let name = self
            .current_path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| UNTITLED_NAME.to_string());
        format!("Do you want to save changes to {name}?")
    }

    /// Settle the "save changes?" prompt.
    pub fn answer_confirm_save(&mut self, answer: ConfirmAnswer) {
        let Dialog::ConfirmSave(action) = self.dialog else {
            return;
        };

        match answer {
            ConfirmAnswer::Cancel => self.dialog = Dialog::None,
            ConfirmAnswer::No => self.perform(action),
            ConfirmAnswer::Yes => match self.current_path.clone() {
                Some(path) => {
                    self.dialog = Dialog::None;
                    if self.save_reporting(&path) {
                        self.perform(action);
                    }
                }
                None => {
                    self.dialog = Dialog::SaveAs {
                        path: TextField::new(PATH_MAX),
                        then: Some(action),
                    };
                }
            },
        }
    }

    /// Reset to an empty untitled document.
    pub fn new_document(&mut self) {
        self.document = Document::new();
        self.current_path = None;
        self.encoding = TextEncoding::default();
        self.line_ending = LineEnding::default();
        log::info!("new document");
    }

    /// Load `path` into the editor, replacing the current document.
    pub fn open_path(&mut self, path: &Path) -> Result<(), FileError> {
        let loaded = file_io::load(path)?;
        self.document.set_text(&loaded.text);
        self.document.set_modified(false);
        self.current_path = Some(path.to_path_buf());
        self.encoding = loaded.encoding;
        self.line_ending = loaded.line_ending;
        Ok(())
    }

    /// Open `path` if it exists, otherwise start an empty document that will be saved there.
    pub fn open_or_create(&mut self, path: &Path) -> Result<(), FileError> {
        if path.exists() {
            return self.open_path(path);
        }
        log::info!("{} does not exist yet, starting empty", path.display());
        self.new_document();
        self.current_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Write the document to `path` and make it the current path.
    pub fn save_to(&mut self, path: &Path) -> Result<(), FileError> {
        self.current_path = Some(path.to_path_buf());
        let written = file_io::save(
            path,
            &self.document.text(),
            self.encoding,
            self.line_ending,
        )?;
        self.encoding = written;
        self.document.set_modified(false);
        Ok(())
    }

    fn save_reporting(&mut self, path: &Path) -> bool {
        match self.save_to(path) {
            Ok(()) => true,
            Err(err) => {
                self.report_error("Could not save the file", err);
                false
            }
        }
    }

    /// Save to the current path, or ask for one. Returns `true` once the file is written.
    fn save(&mut self, save_as: bool) -> bool {
        match self.current_path.clone() {
            Some(path) if !save_as => self.save_reporting(&path),
            current => {
                let initial = current
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                self.dialog = Dialog::SaveAs {
                    path: TextField::new(PATH_MAX).with_value(&initial),
                    then: None,
                };
                false
            }
        }
    }

    /// Confirm the open prompt. An empty path is ignored.
    pub fn submit_open(&mut self) {
        let Dialog::Open { path } = &self.dialog else {
            return;
        };
        if path.is_empty() {
            return;
        }
        let path = PathBuf::from(path.value());
        self.dialog = Dialog::None;
        if let Err(err) = self.open_path(&path) {
            self.report_error("Could not open the file", err);
        }
    }

    /// Confirm the save-as prompt, then resume the pending action if the save succeeded.
    pub fn submit_save_as(&mut self) {
        let Dialog::SaveAs { path, then } = &self.dialog else {
            return;
        };
        if path.is_empty() {
            return;
        }
        let path = PathBuf::from(path.value());
        let then = *then;
        self.dialog = Dialog::None;

        if self.save_reporting(&path)
            && let Some(action) = then
        {
            self.perform(action);
        }
    }

    // ---- Edit ------------------------------------------------------------------------------

    fn cut(&mut self) {
        if self.document.selection().is_empty() {
            return;
        }
        self.clipboard.set_text(self.document.selected_text());
        self.document.replace_selection("");
    }

    fn copy(&mut self) {
        if !self.document.selection().is_empty() {
            self.clipboard.set_text(self.document.selected_text());
        }
    }

    fn paste(&mut self) {
        let text = self.clipboard.text();
        if !text.is_empty() {
            self.document.replace_selection(&text);
        }
    }

    /// Insert a `H:MM AM/PM M/D/YYYY` stamp over the selection.
    pub fn insert_time_date<Tz>(&mut self, now: &DateTime<Tz>)
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let stamp = now.format("%-I:%M %p %-m/%-d/%Y").to_string();
        self.document.replace_selection(&stamp);
    }

    fn show_find_dialog(&mut self) {
        if matches!(self.dialog, Dialog::Find(_)) {
            return;
        }
        self.dialog = Dialog::Find(FindDialog {
            find_what: TextField::new(SEARCH_TEXT_MAX).with_value(&self.search.find_text),
            match_case: self.search.match_case,
            direction: self.search.direction,
        });
    }

    fn show_replace_dialog(&mut self) {
        if matches!(self.dialog, Dialog::Replace(_)) {
            return;
        }
        self.dialog = Dialog::Replace(ReplaceDialog {
            find_what: TextField::new(SEARCH_TEXT_MAX).with_value(&self.search.find_text),
            replace_with: TextField::new(SEARCH_TEXT_MAX).with_value(&self.search.replace_text),
            match_case: self.search.match_case,
            focus: FieldFocus::First,
        });
    }

    /// Copy the find/replace dialog's fields into the search state and run `action`.
    ///
    /// An empty find field keeps the previous search string. The dialog stays open.
    pub fn submit_find_dialog(&mut self, action: FindAction) {
        match &self.dialog {
            Dialog::Find(d) => {
                if !d.find_what.is_empty() {
                    self.search.find_text = d.find_what.value().to_string();
                }
                self.search.match_case = d.match_case;
                self.search.direction = d.direction;
            }
            Dialog::Replace(d) => {
                if !d.find_what.is_empty() {
                    self.search.find_text = d.find_what.value().to_string();
                }
                self.search.replace_text = d.replace_with.value().to_string();
                self.search.match_case = d.match_case;
            }
            _ => return,
        }

        if self.search.find_text.is_empty() {
            return;
        }

        match action {
            FindAction::FindNext => {
                self.find_and_select(self.search.direction);
            }
            FindAction::Replace => {
                self.replace_next();
            }
            FindAction::ReplaceAll => {
                self.replace_all();
            }
        }
    }

    /// Find the next match in the stored direction (`reverse` flips it) and select it.
    ///
    /// With no search string yet, opens the find dialog instead.
    pub fn find_next(&mut self, reverse: bool) -> bool {
        if self.search.find_text.is_empty() {
            self.show_find_dialog();
            return false;
        }
        let direction = if reverse {
            self.search.direction.reversed()
        } else {
            self.search.direction
        };
        self.find_and_select(direction).is_some()
    }

    fn locate_from(&mut self, direction: SearchDirection, anchor: usize) -> Option<SearchMatch> {
        let text = self.document.text();
        match search::locate(
            &text,
            &self.search.find_text,
            self.search.options(direction),
            anchor,
        ) {
            Ok(Some(found)) => Some(found),
            Ok(None) => {
                self.message = Some(Message::info(NOT_FOUND_TEXT));
                None
            }
            Err(err) => {
                self.report_error("Search failed", err);
                None
            }
        }
    }

    fn find_and_select(&mut self, direction: SearchDirection) -> Option<SearchMatch> {
        let (start, end) = self.document.selection_range();
        let anchor = match direction {
            SearchDirection::Down => end,
            SearchDirection::Up => start,
        };
        let found = self.locate_from(direction, anchor)?;
        self.document.set_selection(found.start, found.end);
        Some(found)
    }

    /// Replace the next match, searching from the selection start, with the replacement.
    pub fn replace_next(&mut self) -> bool {
        let (start, _) = self.document.selection_range();
        let Some(found) = self.locate_from(self.search.direction, start) else {
            return false;
        };
        self.document.set_selection(found.start, found.end);
        let replacement = self.search.replace_text.clone();
        self.document.replace_selection(&replacement);
        true
    }

    /// Replace every occurrence and report the count. Returns the number replaced.
    pub fn replace_all(&mut self) -> usize {
        let text = self.document.text();
        let replaced = match search::replace_all(
            &text,
            &self.search.find_text,
            &self.search.replace_text,
            self.search.match_case,
        ) {
            Ok(replaced) => replaced,
            Err(err) => {
                self.report_error("Replace failed", err);
                return 0;
            }
        };

        let count = replaced.count;
        if count > 0 {
            self.document.replace_text(&replaced.text);
        }
        log::debug!("replaced {count} occurrence(s) of {:?}", self.search.find_text);

        let plural = if count == 1 { "" } else { "s" };
        self.message = Some(Message::info(format!(
            "Replaced {count} occurrence{plural}."
        )));
        count
    }

    fn show_go_to_dialog(&mut self) {
        if self.word_wrap {
            self.message = Some(Message::info(GO_TO_WRAPPED_TEXT));
            return;
        }
        self.dialog = Dialog::GoTo(GoToDialog {
            line: TextField::digits(LINE_NUMBER_DIGITS_MAX).with_value("1"),
        });
    }

    /// Confirm the go-to prompt. Invalid input keeps the dialog open with a warning.
    pub fn submit_go_to(&mut self) {
        let Dialog::GoTo(d) = &self.dialog else {
            return;
        };
        match d.line.value().parse::<usize>() {
            Ok(line) if line > 0 => {
                self.dialog = Dialog::None;
                self.go_to_line(line);
            }
            _ => self.message = Some(Message::warning("Enter a valid line number.")),
        }
    }

    /// Put the caret at the start of 1-based `line`, clamped to the last line.
    pub fn go_to_line(&mut self, line: usize) {
        let line = line.clamp(1, self.document.line_count());
        let offset = self.document.line_start(line - 1);
        self.document.set_selection(offset, offset);
    }

    // ---- Format / View ---------------------------------------------------------------------

    /// Word wrap hides the status bar and disables it; turning wrap off restores it.
    pub fn set_word_wrap(&mut self, enabled: bool) {
        if self.word_wrap == enabled {
            return;
        }
        self.word_wrap = enabled;
        if enabled {
            self.status_before_wrap = self.status_visible;
            self.status_visible = false;
        } else {
            self.status_visible = self.status_before_wrap;
        }
    }

    /// Show or hide the status bar.
    pub fn set_status_visible(&mut self, visible: bool) {
        self.status_visible = visible;
    }

    /// Apply the font dialog and persist the choice.
    pub fn submit_font(&mut self) {
        let Dialog::Font(d) = &self.dialog else {
            return;
        };
        self.font = d.to_font(&self.font);
        self.dialog = Dialog::None;

        if let Some(settings) = &self.settings
            && let Err(err) = settings.save_font(&self.font)
        {
            log::warn!("could not persist font: {err}");
        }
    }

    fn report_error(&mut self, context: &str, err: impl Display) {
        log::warn!("{context}: {err}");
        self.message = Some(Message::error(format!("{context}.\n{err}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn title_marks_modified_untitled() {
        let mut app = AppContext::new(None);
        assert_eq!(app.title(), "Untitled - retropad");
        app.document_mut().type_char('x');
        assert_eq!(app.title(), "*Untitled - retropad");
    }

    #[test]
    fn status_text_uses_selection_start() {
        let mut app = AppContext::new(None);
        app.document_mut().replace_selection("ab\ncde\n");
        app.document_mut().set_selection(6, 4);
        assert_eq!(app.status_text(), "Ln 2, Col 2    Lines: 3");
    }

    #[test]
    fn time_date_stamp_format() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let now = tz.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        let mut app = AppContext::new(None);
        app.insert_time_date(&now);
        assert_eq!(app.document().text(), "2:07 PM 3/5/2024");
    }

    #[test]
    fn disabled_save_is_ignored() {
        let mut app = AppContext::new(None);
        app.execute(Command::FileSave);
        assert_eq!(app.dialog(), &Dialog::None);
    }

    #[test]
    fn find_next_without_text_opens_find_dialog() {
        let mut app = AppContext::new(None);
        assert!(!app.find_next(false));
        assert!(matches!(app.dialog(), Dialog::Find(_)));
    }
}
