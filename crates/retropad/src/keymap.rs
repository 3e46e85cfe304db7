//! Key handling: accelerators, caret movement, menus and dialogs.

use crate::{MenuCursor, Shell};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use retropad_core::menu::menu_for_mnemonic;
use retropad_core::{Command, ConfirmAnswer, Dialog, FindAction, MENU_BAR, SearchDirection};

/// Accelerator table. Returns `None` for keys that edit text or move the caret.
pub(crate) fn accelerator(key: &KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers == KeyModifiers::CONTROL;
    let command = match key.code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'n' => Command::FileNew,
            'o' => Command::FileOpen,
            's' => Command::FileSave,
            'p' => Command::FilePrint,
            'q' => Command::FileExit,
            'z' => Command::EditUndo,
            'x' => Command::EditCut,
            'c' => Command::EditCopy,
            'v' => Command::EditPaste,
            'f' => Command::EditFind,
            'h' => Command::EditReplace,
            'g' => Command::EditGoTo,
            'a' => Command::EditSelectAll,
            _ => return None,
        },
        KeyCode::F(3) if key.modifiers.contains(KeyModifiers::SHIFT) => {
            Command::EditFindPrevious
        }
        KeyCode::F(3) => Command::EditFindNext,
        KeyCode::F(5) => Command::EditTimeDate,
        KeyCode::F(12) => Command::FileSaveAs,
        KeyCode::Delete if key.modifiers.is_empty() => Command::EditDelete,
        _ => return None,
    };
    Some(command)
}

impl Shell {
    pub(crate) fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // A message box swallows the key that dismisses it.
        if self.app.message().is_some() {
            self.app.dismiss_message();
            return;
        }

        if self.menu.is_some() {
            self.handle_menu_key(key);
            return;
        }

        if self.app.dialog().is_open() {
            self.handle_dialog_key(key);
            return;
        }

        if key.code == KeyCode::F(10) {
            self.open_menu(0);
            return;
        }
        if key.modifiers == KeyModifiers::ALT
            && let KeyCode::Char(c) = key.code
            && let Some(menu) = menu_for_mnemonic(c)
        {
            self.open_menu(menu);
            return;
        }

        if let Some(command) = accelerator(&key) {
            self.app.execute(command);
            return;
        }

        self.handle_edit_key(key);
    }

    pub(crate) fn handle_paste(&mut self, text: &str) {
        if self.menu.is_some() || self.app.message().is_some() {
            return;
        }
        if self.app.dialog().is_open() {
            if let Some(field) = self.app.dialog_mut().active_field_mut() {
                for ch in text.chars() {
                    field.push(ch);
                }
            }
            return;
        }
        self.app.document_mut().replace_selection(text);
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let page = self.page_height() as isize;
        let doc = self.app.document_mut();

        match key.code {
            KeyCode::Left => doc.move_left(extend),
            KeyCode::Right => doc.move_right(extend),
            KeyCode::Up => doc.move_vertical(-1, extend),
            KeyCode::Down => doc.move_vertical(1, extend),
            KeyCode::PageUp => doc.move_vertical(-page, extend),
            KeyCode::PageDown => doc.move_vertical(page, extend),
            KeyCode::Home if ctrl => doc.move_document_start(extend),
            KeyCode::End if ctrl => doc.move_document_end(extend),
            KeyCode::Home => doc.move_line_start(extend),
            KeyCode::End => doc.move_line_end(extend),
            KeyCode::Backspace => doc.backspace(),
            KeyCode::Enter => doc.type_char('\n'),
            KeyCode::Tab => doc.type_char('\t'),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                doc.type_char(c)
            }
            _ => {}
        }
    }

    // ---- Menus -----------------------------------------------------------------------------

    fn open_menu(&mut self, menu: usize) {
        let item = self.first_enabled_item(menu, 0, 1).unwrap_or(0);
        self.menu = Some(MenuCursor { menu, item });
    }

    /// Next enabled item of `menu` from `from` (inclusive) stepping by `step`, wrapping.
    fn first_enabled_item(&self, menu: usize, from: usize, step: isize) -> Option<usize> {
        let items: Vec<_> = MENU_BAR[menu].items().collect();
        let len = items.len() as isize;
        (0..len)
            .map(|i| (from as isize + step * i).rem_euclid(len) as usize)
            .find(|&idx| self.app.command_state(items[idx].command).enabled)
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let Some(cursor) = self.menu else {
            return;
        };
        let menus = MENU_BAR.len();

        match key.code {
            KeyCode::Esc | KeyCode::F(10) => self.menu = None,
            KeyCode::Left => self.open_menu((cursor.menu + menus - 1) % menus),
            KeyCode::Right => self.open_menu((cursor.menu + 1) % menus),
            KeyCode::Up | KeyCode::Down => {
                let count = MENU_BAR[cursor.menu].items().count();
                let (from, step) = if key.code == KeyCode::Up {
                    ((cursor.item + count - 1) % count, -1)
                } else {
                    ((cursor.item + 1) % count, 1)
                };
                if let Some(item) = self.first_enabled_item(cursor.menu, from, step) {
                    self.menu = Some(MenuCursor { item, ..cursor });
                }
            }
            KeyCode::Enter => {
                self.menu = None;
                if let Some(item) = MENU_BAR[cursor.menu].items().nth(cursor.item) {
                    self.app.execute(item.command);
                }
            }
            KeyCode::Char(c) if key.modifiers == KeyModifiers::ALT => {
                if let Some(menu) = menu_for_mnemonic(c) {
                    self.open_menu(menu);
                }
            }
            _ => {}
        }
    }

    // ---- Dialogs ---------------------------------------------------------------------------

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if matches!(self.app.dialog(), Dialog::ConfirmSave(_)) {
            let answer = match key.code {
                KeyCode::Char('y' | 'Y') => ConfirmAnswer::Yes,
                KeyCode::Char('n' | 'N') => ConfirmAnswer::No,
                KeyCode::Char('c' | 'C') | KeyCode::Esc => ConfirmAnswer::Cancel,
                _ => return,
            };
            self.app.answer_confirm_save(answer);
            return;
        }
        if matches!(self.app.dialog(), Dialog::About) {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.app.close_dialog();
            }
            return;
        }

        // Find and replace stay open while searching, so F3 keeps working underneath them.
        if matches!(self.app.dialog(), Dialog::Find(_) | Dialog::Replace(_))
            && let Some(command @ (Command::EditFindNext | Command::EditFindPrevious)) =
                accelerator(&key)
        {
            self.app.execute(command);
            return;
        }

        match key.code {
            KeyCode::Esc => self.app.close_dialog(),
            KeyCode::Tab | KeyCode::BackTab => self.app.dialog_mut().cycle_focus(),
            KeyCode::Enter => self.submit_dialog(),
            KeyCode::Backspace => {
                if let Some(field) = self.app.dialog_mut().active_field_mut() {
                    field.pop();
                }
            }
            KeyCode::Char(c) if alt => self.dialog_option(c.to_ascii_lowercase()),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = self.app.dialog_mut().active_field_mut() {
                    field.push(c);
                }
            }
            _ => {}
        }
    }

    fn submit_dialog(&mut self) {
        match self.app.dialog() {
            Dialog::Find(_) | Dialog::Replace(_) => self.app.submit_find_dialog(FindAction::FindNext),
            Dialog::GoTo(_) => self.app.submit_go_to(),
            Dialog::Font(_) => self.app.submit_font(),
            Dialog::Open { .. } => self.app.submit_open(),
            Dialog::SaveAs { .. } => self.app.submit_save_as(),
            Dialog::None | Dialog::ConfirmSave(_) | Dialog::About => {}
        }
    }

    /// Alt+letter toggles and buttons of the open dialog.
    fn dialog_option(&mut self, key: char) {
        if matches!(self.app.dialog(), Dialog::Replace(_)) {
            match key {
                'r' => return self.app.submit_find_dialog(FindAction::Replace),
                'a' => return self.app.submit_find_dialog(FindAction::ReplaceAll),
                _ => {}
            }
        }

        match self.app.dialog_mut() {
            Dialog::Find(d) => match key {
                'c' => d.match_case = !d.match_case,
                'u' => d.direction = SearchDirection::Up,
                'd' => d.direction = SearchDirection::Down,
                _ => {}
            },
            Dialog::Replace(d) if key == 'c' => d.match_case = !d.match_case,
            Dialog::Font(d) => match key {
                'b' => d.bold = !d.bold,
                'i' => d.italic = !d.italic,
                'u' => d.underline = !d.underline,
                'k' => d.strike_out = !d.strike_out,
                _ => {}
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn accelerators_map_to_commands() {
        assert_eq!(
            accelerator(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Command::FileSave)
        );
        assert_eq!(
            accelerator(&key(KeyCode::F(3), KeyModifiers::SHIFT)),
            Some(Command::EditFindPrevious)
        );
        assert_eq!(
            accelerator(&key(KeyCode::F(3), KeyModifiers::NONE)),
            Some(Command::EditFindNext)
        );
        assert_eq!(
            accelerator(&key(KeyCode::Char('p'), KeyModifiers::CONTROL)),
            Some(Command::FilePrint)
        );
        assert_eq!(accelerator(&key(KeyCode::Char('s'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn typing_goes_to_the_document() {
        let mut shell = Shell::new(retropad_core::AppContext::new(None));
        for c in "hi".chars() {
            shell.handle_key_event(key(KeyCode::Char(c), KeyModifiers::NONE));
        }
        shell.handle_key_event(key(KeyCode::Char('z'), KeyModifiers::CONTROL));
        assert_eq!(shell.app.document().text(), "");
    }

    #[test]
    fn menu_enter_runs_the_highlighted_command() {
        let mut shell = Shell::new(retropad_core::AppContext::new(None));
        shell.handle_key_event(key(KeyCode::Char('v'), KeyModifiers::ALT));
        assert_eq!(shell.menu.map(|m| m.menu), Some(3));

        shell.handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE));
        assert!(shell.menu.is_none());
        assert!(!shell.app.status_visible());
    }

    #[test]
    fn message_box_swallows_one_key() {
        let mut shell = Shell::new(retropad_core::AppContext::new(None));
        shell.handle_key_event(key(KeyCode::F(3), KeyModifiers::NONE));
        assert!(matches!(shell.app.dialog(), Dialog::Find(_)));

        for c in "zz".chars() {
            shell.handle_key_event(key(KeyCode::Char(c), KeyModifiers::NONE));
        }
        shell.handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE));
        assert!(shell.app.message().is_some());

        shell.handle_key_event(key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(shell.app.message().is_none());
        assert!(matches!(shell.app.dialog(), Dialog::Find(_)));
    }
}
