//! Menu bar model.
//!
//! The menu layout is static; enabled and checked states are resolved against an
//! [`AppContext`] each time a menu is drawn.

use crate::app::AppContext;
use crate::commands::{Command, CommandState};

/// A clickable menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    /// Accelerator shown next to the label.
    pub accelerator: Option<&'static str>,
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator,
}

/// A top-level menu. `mnemonic` opens it together with Alt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Menu {
    pub title: &'static str,
    pub mnemonic: char,
    pub entries: &'static [MenuEntry],
}

impl Menu {
    /// Items only, skipping separators.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Item(item) => Some(item),
            MenuEntry::Separator => None,
        })
    }
}

const fn item(label: &'static str, accelerator: &'static str, command: Command) -> MenuEntry {
    MenuEntry::Item(MenuItem {
        label,
        accelerator: Some(accelerator),
        command,
    })
}

const fn plain(label: &'static str, command: Command) -> MenuEntry {
    MenuEntry::Item(MenuItem {
        label,
        accelerator: None,
        command,
    })
}

const SEP: MenuEntry = MenuEntry::Separator;

pub const MENU_BAR: &[Menu] = &[
    Menu {
        title: "File",
        mnemonic: 'f',
        entries: &[
            item("New", "Ctrl+N", Command::FileNew),
            item("Open...", "Ctrl+O", Command::FileOpen),
            item("Save", "Ctrl+S", Command::FileSave),
            item("Save As...", "F12", Command::FileSaveAs),
            SEP,
            plain("Page Setup...", Command::FilePageSetup),
            item("Print...", "Ctrl+P", Command::FilePrint),
            SEP,
            item("Exit", "Ctrl+Q", Command::FileExit),
        ],
    },
    Menu {
        title: "Edit",
        mnemonic: 'e',
        entries: &[
            item("Undo", "Ctrl+Z", Command::EditUndo),
            SEP,
            item("Cut", "Ctrl+X", Command::EditCut),
            item("Copy", "Ctrl+C", Command::EditCopy),
            item("Paste", "Ctrl+V", Command::EditPaste),
            item("Delete", "Del", Command::EditDelete),
            SEP,
            item("Find...", "Ctrl+F", Command::EditFind),
            item("Find Next", "F3", Command::EditFindNext),
            item("Find Previous", "Shift+F3", Command::EditFindPrevious),
            item("Replace...", "Ctrl+H", Command::EditReplace),
            item("Go To...", "Ctrl+G", Command::EditGoTo),
            SEP,
            item("Select All", "Ctrl+A", Command::EditSelectAll),
            item("Time/Date", "F5", Command::EditTimeDate),
        ],
    },
    Menu {
        title: "Format",
        mnemonic: 'o',
        entries: &[
            plain("Word Wrap", Command::FormatWordWrap),
            plain("Font...", Command::FormatFont),
        ],
    },
    Menu {
        title: "View",
        mnemonic: 'v',
        entries: &[plain("Status Bar", Command::ViewStatusBar)],
    },
    Menu {
        title: "Help",
        mnemonic: 'h',
        entries: &[
            plain("View Help", Command::HelpViewHelp),
            SEP,
            plain("About retropad", Command::HelpAbout),
        ],
    },
];

/// Index of the top-level menu opened by Alt+`key`.
pub fn menu_for_mnemonic(key: char) -> Option<usize> {
    let key = key.to_ascii_lowercase();
    MENU_BAR.iter().position(|menu| menu.mnemonic == key)
}

/// A menu item together with its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedItem {
    pub item: MenuItem,
    pub state: CommandState,
}

/// Items of `menu` with enabled/checked state taken from `app`.
pub fn resolve(menu: &Menu, app: &AppContext) -> Vec<ResolvedItem> {
    menu.items()
        .map(|item| ResolvedItem {
            item: *item,
            state: app.command_state(item.command),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_command_appears_once() {
        let commands: Vec<Command> = MENU_BAR
            .iter()
            .flat_map(|menu| menu.items().map(|item| item.command))
            .collect();
        let unique: HashSet<_> = commands.iter().copied().collect();
        assert_eq!(commands.len(), unique.len());
        assert_eq!(unique.len(), 24);
    }

    #[test]
    fn mnemonics_are_case_insensitive() {
        assert_eq!(menu_for_mnemonic('F'), Some(0));
        assert_eq!(menu_for_mnemonic('o'), Some(2));
        assert_eq!(menu_for_mnemonic('z'), None);
    }
}
