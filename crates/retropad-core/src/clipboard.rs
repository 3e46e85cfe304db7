//! Cut/copy/paste storage.
//!
//! [`Clipboard::system`] goes through the desktop clipboard so text moves between retropad
//! and other programs. When no desktop clipboard is reachable (a bare console, a test run)
//! the text stays in the process.

use crate::line_ending::normalize_newlines;
use std::fmt;

/// Clipboard used by the Cut, Copy and Paste commands.
pub struct Clipboard {
    system: Option<arboard::Clipboard>,
    /// Last text set from this process; the only storage when `system` is `None`.
    local: String,
}

impl Clipboard {
    /// In-process clipboard only.
    pub fn local() -> Self {
        Self {
            system: None,
            local: String::new(),
        }
    }

    /// Desktop clipboard, falling back to [`Clipboard::local`] when it cannot be opened.
    pub fn system() -> Self {
        match arboard::Clipboard::new() {
            Ok(system) => Self {
                system: Some(system),
                local: String::new(),
            },
            Err(err) => {
                log::warn!("system clipboard unavailable, using an in-process one: {err}");
                Self::local()
            }
        }
    }

    /// Whether text goes through the desktop clipboard.
    pub fn is_system(&self) -> bool {
        self.system.is_some()
    }

    /// Whether Paste may have something to insert. The desktop clipboard is assumed to.
    pub fn may_have_text(&self) -> bool {
        self.system.is_some() || !self.local.is_empty()
    }

    pub fn set_text(&mut self, text: String) {
        if let Some(system) = &mut self.system
            && let Err(err) = system.set_text(text.as_str())
        {
            log::warn!("could not copy to the system clipboard, keeping it in-process: {err}");
        }
        self.local = text;
    }

    /// Current clipboard text with line endings normalized to LF. Empty when the desktop
    /// clipboard holds no text.
    pub fn text(&mut self) -> String {
        if let Some(system) = &mut self.system {
            match system.get_text() {
                Ok(text) => return normalize_newlines(&text),
                Err(arboard::Error::ContentNotAvailable) => return String::new(),
                Err(err) => {
                    log::warn!("could not read the system clipboard, using in-process text: {err}")
                }
            }
        }
        self.local.clone()
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::local()
    }
}

impl fmt::Debug for Clipboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clipboard")
            .field("system", &self.system.is_some())
            .field("local", &self.local)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_clipboard_round_trips() {
        let mut clipboard = Clipboard::local();
        assert!(!clipboard.is_system());
        assert!(!clipboard.may_have_text());
        assert_eq!(clipboard.text(), "");

        clipboard.set_text("copied\nline".to_string());
        assert!(clipboard.may_have_text());
        assert_eq!(clipboard.text(), "copied\nline");
    }
}
