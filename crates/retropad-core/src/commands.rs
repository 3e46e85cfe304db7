//! Menu commands.
//!
//! Every menu item and accelerator maps to one [`Command`]; the shell hands them to
//! [`AppContext::execute`](crate::AppContext::execute).

/// A menu or accelerator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    FileNew,
    FileOpen,
    FileSave,
    FileSaveAs,
    FilePageSetup,
    FilePrint,
    FileExit,
    EditUndo,
    EditCut,
    EditCopy,
    EditPaste,
    EditDelete,
    EditFind,
    EditFindNext,
    EditFindPrevious,
    EditReplace,
    EditGoTo,
    EditSelectAll,
    EditTimeDate,
    FormatWordWrap,
    FormatFont,
    ViewStatusBar,
    HelpViewHelp,
    HelpAbout,
}

/// Enabled/checked state of a command, as shown by its menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandState {
    /// Greyed out in the menu when `false`.
    pub enabled: bool,
    /// Shows a check mark in the menu.
    pub checked: bool,
}

impl CommandState {
    /// Enabled and unchecked; the state of most commands.
    pub const ENABLED: Self = Self {
        enabled: true,
        checked: false,
    };

    /// Unchecked item, enabled when `enabled`.
    pub fn enabled_if(enabled: bool) -> Self {
        Self {
            enabled,
            checked: false,
        }
    }

    /// Enabled item with a check mark when `checked`.
    pub fn toggle(checked: bool) -> Self {
        Self {
            enabled: true,
            checked,
        }
    }
}
