//! Line ending helpers.
//!
//! The document stores text internally using LF (`'\n'`) newlines.
//! When opening a file that uses CRLF (`"\r\n"`), the content is normalized on load, and the
//! detected line ending is written back when saving.

/// The newline sequence used when saving a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    Lf,
    /// Windows-style CRLF (`"\r\n"`). New documents use it, as the classic notepad does.
    #[default]
    Crlf,
}

impl LineEnding {
    /// Detect the dominant line ending from a source text.
    ///
    /// Policy: if the input contains any CRLF (`"\r\n"`), returns [`LineEnding::Crlf`].
    /// Text with LF but no CRLF is [`LineEnding::Lf`]; text without any newline keeps the
    /// default.
    pub fn detect_in_text(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else if text.contains('\n') {
            Self::Lf
        } else {
            Self::default()
        }
    }

    /// Convert an LF-normalized text to this line ending for saving.
    pub fn apply_to_text(self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            Self::Crlf => text.replace('\n', "\r\n"),
        }
    }

    /// Short label for the status bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Lf => "Unix (LF)",
            Self::Crlf => "Windows (CRLF)",
        }
    }
}

/// Normalize CRLF and lone CR line breaks to LF.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_crlf_before_lf() {
        assert_eq!(LineEnding::detect_in_text("a\r\nb\nc"), LineEnding::Crlf);
        assert_eq!(LineEnding::detect_in_text("a\nb"), LineEnding::Lf);
        assert_eq!(LineEnding::detect_in_text("ab"), LineEnding::Crlf);
    }

    #[test]
    fn normalizes_lone_cr() {
        assert_eq!(normalize_newlines("a\rb\r\nc"), "a\nb\nc");
    }
}
