//! Dialog state.
//!
//! At most one dialog is open at a time; [`Dialog::None`] means the edit area has focus.
//! Informational message boxes are a separate layer ([`Message`]) so one can be raised while a
//! find or replace dialog stays open underneath.

use crate::search::SearchDirection;
use crate::settings::FontDescriptor;

/// Longest find/replace string accepted, in characters.
pub const SEARCH_TEXT_MAX: usize = 127;
/// Longest path accepted by the open and save-as prompts.
pub const PATH_MAX: usize = 1023;
/// Longest line number accepted by the go-to prompt.
pub const LINE_NUMBER_DIGITS_MAX: usize = 10;

/// A bounded single-line input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    value: String,
    max_chars: usize,
    digits_only: bool,
}

impl TextField {
    /// An empty field holding at most `max_chars` characters.
    pub fn new(max_chars: usize) -> Self {
        Self {
            value: String::new(),
            max_chars,
            digits_only: false,
        }
    }

    /// A field that only accepts ASCII digits.
    pub fn digits(max_chars: usize) -> Self {
        Self {
            digits_only: true,
            ..Self::new(max_chars)
        }
    }

    /// Builder-style initial value; truncated to the field's limit.
    pub fn with_value(mut self, value: &str) -> Self {
        self.set(value);
        self
    }

    /// Current contents.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the contents, dropping rejected characters and anything past the limit.
    pub fn set(&mut self, value: &str) {
        self.value.clear();
        for ch in value.chars() {
            self.push(ch);
        }
    }

    /// Append a character. Returns `false` if the field is full or the character is rejected.
    pub fn push(&mut self, ch: char) -> bool {
        if ch.is_control() || (self.digits_only && !ch.is_ascii_digit()) {
            return false;
        }
        if self.value.chars().count() >= self.max_chars {
            return false;
        }
        self.value.push(ch);
        true
    }

    /// Remove the last character (Backspace).
    pub fn pop(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

/// Which input of a two-field dialog has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldFocus {
    #[default]
    First,
    Second,
}

impl FieldFocus {
    pub fn toggled(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindDialog {
    pub find_what: TextField,
    pub match_case: bool,
    pub direction: SearchDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceDialog {
    pub find_what: TextField,
    pub replace_with: TextField,
    pub match_case: bool,
    pub focus: FieldFocus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoToDialog {
    pub line: TextField,
}

/// Font picker: face name and size fields plus style toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDialog {
    pub face_name: TextField,
    pub size: TextField,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    pub focus: FieldFocus,
}

impl FontDialog {
    pub fn from_font(font: &FontDescriptor) -> Self {
        let size = if font.height == 0 {
            String::new()
        } else {
            font.height.unsigned_abs().to_string()
        };
        Self {
            face_name: TextField::new(31).with_value(&font.face_name),
            size: TextField::digits(4).with_value(&size),
            bold: font.is_bold(),
            italic: font.is_italic(),
            underline: font.is_underline(),
            strike_out: font.is_strike_out(),
            focus: FieldFocus::First,
        }
    }

    /// Apply the dialog's choices on top of `base`. An empty face name keeps the old one.
    pub fn to_font(&self, base: &FontDescriptor) -> FontDescriptor {
        let mut font = base.clone();
        if !self.face_name.is_empty() {
            font.face_name = self.face_name.value().to_string();
        }
        font.height = match self.size.value().parse::<i32>() {
            Ok(size) if size > 0 => -size,
            _ => 0,
        };
        font.set_bold(self.bold);
        font.italic = u8::from(self.italic);
        font.underline = u8::from(self.underline);
        font.strike_out = u8::from(self.strike_out);
        font
    }
}

/// Action to resume once the "save changes?" question is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    New,
    Open,
    Exit,
}

/// Answer to the "save changes?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAnswer {
    Yes,
    No,
    Cancel,
}

/// Buttons of the find and replace dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindAction {
    FindNext,
    Replace,
    ReplaceAll,
}

/// The dialog currently shown above the edit area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialog {
    #[default]
    None,
    Find(FindDialog),
    Replace(ReplaceDialog),
    GoTo(GoToDialog),
    Font(FontDialog),
    Open {
        path: TextField,
    },
    SaveAs {
        path: TextField,
        /// Action to run after a successful save.
        then: Option<PendingAction>,
    },
    ConfirmSave(PendingAction),
    About,
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Find(_) => "Find",
            Self::Replace(_) => "Replace",
            Self::GoTo(_) => "Go To Line",
            Self::Font(_) => "Font",
            Self::Open { .. } => "Open",
            Self::SaveAs { .. } => "Save As",
            Self::ConfirmSave(_) => "retropad",
            Self::About => "About retropad",
        }
    }

    /// The input that receives typed characters, if the dialog has one.
    pub fn active_field_mut(&mut self) -> Option<&mut TextField> {
        match self {
            Self::Find(d) => Some(&mut d.find_what),
            Self::Replace(d) => Some(match d.focus {
                FieldFocus::First => &mut d.find_what,
                FieldFocus::Second => &mut d.replace_with,
            }),
            Self::GoTo(d) => Some(&mut d.line),
            Self::Font(d) => Some(match d.focus {
                FieldFocus::First => &mut d.face_name,
                FieldFocus::Second => &mut d.size,
            }),
            Self::Open { path } | Self::SaveAs { path, .. } => Some(path),
            Self::None | Self::ConfirmSave(_) | Self::About => None,
        }
    }

    /// Move focus to the other input of two-field dialogs.
    pub fn cycle_focus(&mut self) {
        match self {
            Self::Replace(d) => d.focus = d.focus.toggled(),
            Self::Font(d) => d.focus = d.focus.toggled(),
            _ => {}
        }
    }
}

/// Severity of a message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Informational, such as a search result.
    Info,
    /// Rejected input.
    Warning,
    /// A failed file or settings operation.
    Error,
}

/// A message box; any key dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    /// Informational message box.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    /// Warning message box.
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Warning,
            text: text.into(),
        }
    }

    /// Error message box.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_field_is_bounded() {
        let mut field = TextField::new(3).with_value("abcdef");
        assert_eq!(field.value(), "abc");
        assert!(!field.push('x'));
        field.pop();
        assert!(field.push('x'));
        assert_eq!(field.value(), "abx");
    }

    #[test]
    fn digit_field_rejects_letters() {
        let mut field = TextField::digits(LINE_NUMBER_DIGITS_MAX);
        assert!(field.push('4'));
        assert!(!field.push('a'));
        assert!(!field.push('-'));
        assert_eq!(field.value(), "4");
    }

    #[test]
    fn replace_dialog_focus_routes_typing() {
        let mut dialog = Dialog::Replace(ReplaceDialog {
            find_what: TextField::new(SEARCH_TEXT_MAX),
            replace_with: TextField::new(SEARCH_TEXT_MAX),
            match_case: false,
            focus: FieldFocus::First,
        });
        dialog.active_field_mut().unwrap().push('a');
        dialog.cycle_focus();
        dialog.active_field_mut().unwrap().push('b');

        let Dialog::Replace(d) = dialog else {
            panic!("expected replace dialog");
        };
        assert_eq!(d.find_what.value(), "a");
        assert_eq!(d.replace_with.value(), "b");
    }

    #[test]
    fn font_dialog_round_trips_styles() {
        let mut base = FontDescriptor::default();
        base.height = -14;
        let mut dialog = FontDialog::from_font(&base);
        assert_eq!(dialog.size.value(), "14");
        dialog.italic = true;
        dialog.face_name.set("Courier New");

        let font = dialog.to_font(&base);
        assert_eq!(font.face_name, "Courier New");
        assert_eq!(font.height, -14);
        assert!(font.is_italic());
        assert!(!font.is_bold());
    }
}
