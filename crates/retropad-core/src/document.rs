//! The document buffer: text, selection, modified flag and single-level undo.
//!
//! All offsets are character offsets into LF-normalized text. The selection is kept clamped
//! to `[0, len_chars]` at all times.

use crate::line_ending::normalize_newlines;
use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;

/// Selection as an anchor (fixed end) and a caret (moving end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Where the selection started.
    pub anchor: usize,
    /// Where the caret is.
    pub caret: usize,
}

impl Selection {
    /// A collapsed selection (plain caret).
    pub fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            caret: offset,
        }
    }

    pub fn new(anchor: usize, caret: usize) -> Self {
        Self { anchor, caret }
    }

    /// Lower offset of the range.
    pub fn start(&self) -> usize {
        self.anchor.min(self.caret)
    }

    /// Upper offset of the range.
    pub fn end(&self) -> usize {
        self.anchor.max(self.caret)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.caret
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditKind {
    Typing,
    Other,
}

#[derive(Debug, Clone)]
struct UndoSnapshot {
    rope: Rope,
    selection: Selection,
}

/// Editable text with a selection.
#[derive(Debug, Clone, Default)]
pub struct Document {
    rope: Rope,
    selection: Selection,
    modified: bool,
    undo: Option<UndoSnapshot>,
    last_edit: Option<EditKind>,
    preferred_column: Option<usize>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from text, normalizing line breaks to LF.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_newlines(text)),
            ..Self::default()
        }
    }

    /// Full text of the document.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Replace the whole text, as loading a file does. Clears undo and puts the caret at 0.
    /// The modified flag is left to the caller.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(&normalize_newlines(text));
        self.selection = Selection::default();
        self.undo = None;
        self.end_edit_run();
    }

    /// Replace the whole text as one undoable edit. Marks the document modified.
    pub fn replace_text(&mut self, text: &str) {
        self.push_undo();
        self.rope = Rope::from_str(&normalize_newlines(text));
        self.selection = Selection::default();
        self.modified = true;
        self.end_edit_run();
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Selection as an ordered `(start, end)` pair.
    pub fn selection_range(&self) -> (usize, usize) {
        (self.selection.start(), self.selection.end())
    }

    /// Set the selection; both ends are clamped to the text length.
    pub fn set_selection(&mut self, anchor: usize, caret: usize) {
        let len = self.len_chars();
        self.selection = Selection::new(anchor.min(len), caret.min(len));
        self.end_edit_run();
    }

    pub fn select_all(&mut self) {
        self.set_selection(0, self.len_chars());
    }

    pub fn selected_text(&self) -> String {
        let (start, end) = self.selection_range();
        self.rope.slice(start..end).to_string()
    }

    /// Replace the selection with `text` (an empty string deletes it).
    pub fn replace_selection(&mut self, text: &str) {
        self.apply_edit(text, EditKind::Other);
    }

    /// Insert a typed character. Consecutive typing forms a single undo step.
    pub fn type_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.apply_edit(ch.encode_utf8(&mut buf), EditKind::Typing);
    }

    /// Delete the selection, or the grapheme before the caret.
    pub fn backspace(&mut self) {
        if self.selection.is_empty() {
            let caret = self.selection.caret;
            if caret == 0 {
                return;
            }
            self.selection = Selection::new(self.prev_boundary(caret), caret);
        }
        self.apply_edit("", EditKind::Other);
    }

    /// Delete the selection, or the grapheme after the caret.
    pub fn delete_forward(&mut self) {
        if self.selection.is_empty() {
            let caret = self.selection.caret;
            if caret >= self.len_chars() {
                return;
            }
            self.selection = Selection::new(caret, self.next_boundary(caret));
        }
        self.apply_edit("", EditKind::Other);
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Swap the current state with the undo snapshot. Undoing twice restores the edit.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo.take() else {
            return false;
        };
        let current = UndoSnapshot {
            rope: std::mem::replace(&mut self.rope, snapshot.rope),
            selection: self.selection,
        };
        self.selection = snapshot.selection;
        self.undo = Some(current);
        self.modified = true;
        self.end_edit_run();
        true
    }

    /// Number of lines; a trailing newline starts an extra empty line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Zero-based line containing `offset`.
    pub fn line_of_char(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.len_chars()))
    }

    /// Offset of the first character of `line` (clamped to the last line).
    pub fn line_start(&self, line: usize) -> usize {
        let last = self.line_count().saturating_sub(1);
        self.rope.line_to_char(line.min(last))
    }

    /// Line length in characters, excluding the newline.
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return 0;
        }
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Line text without its newline.
    pub fn line_text(&self, line: usize) -> String {
        if line >= self.line_count() {
            return String::new();
        }
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        text
    }

    /// Zero-based `(line, column)` of `offset`.
    pub fn position_of(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len_chars());
        let line = self.rope.char_to_line(offset);
        (line, offset - self.rope.line_to_char(line))
    }

    /// Move the caret one grapheme left. Without `extend`, a selection collapses to its start.
    pub fn move_left(&mut self, extend: bool) {
        let target = if !extend && !self.selection.is_empty() {
            self.selection.start()
        } else {
            self.prev_boundary(self.selection.caret)
        };
        self.move_caret(target, extend);
    }

    /// Move the caret one grapheme right. Without `extend`, a selection collapses to its end.
    pub fn move_right(&mut self, extend: bool) {
        let target = if !extend && !self.selection.is_empty() {
            self.selection.end()
        } else {
            self.next_boundary(self.selection.caret)
        };
        self.move_caret(target, extend);
    }

    /// Move the caret by `delta` lines, keeping the column the caret started from.
    pub fn move_vertical(&mut self, delta: isize, extend: bool) {
        let (line, column) = self.position_of(self.selection.caret);
        let column = self.preferred_column.unwrap_or(column);
        let last = self.line_count().saturating_sub(1) as isize;
        let target_line = (line as isize + delta).clamp(0, last) as usize;
        let target = self.line_start(target_line) + column.min(self.line_len(target_line));
        self.move_caret(target, extend);
        self.preferred_column = Some(column);
    }

    pub fn move_line_start(&mut self, extend: bool) {
        let line = self.line_of_char(self.selection.caret);
        self.move_caret(self.line_start(line), extend);
    }

    pub fn move_line_end(&mut self, extend: bool) {
        let line = self.line_of_char(self.selection.caret);
        self.move_caret(self.line_start(line) + self.line_len(line), extend);
    }

    pub fn move_document_start(&mut self, extend: bool) {
        self.move_caret(0, extend);
    }

    pub fn move_document_end(&mut self, extend: bool) {
        self.move_caret(self.len_chars(), extend);
    }

    fn move_caret(&mut self, target: usize, extend: bool) {
        let target = target.min(self.len_chars());
        self.selection = if extend {
            Selection::new(self.selection.anchor, target)
        } else {
            Selection::caret(target)
        };
        self.end_edit_run();
    }

    fn apply_edit(&mut self, text: &str, kind: EditKind) {
        let coalesce = kind == EditKind::Typing
            && self.last_edit == Some(EditKind::Typing)
            && self.selection.is_empty();
        if !coalesce {
            self.push_undo();
        }

        let (start, end) = self.selection_range();
        let text = normalize_newlines(text);
        if start < end {
            self.rope.remove(start..end);
        }
        self.rope.insert(start, &text);

        self.selection = Selection::caret(start + text.chars().count());
        self.modified = true;
        self.last_edit = Some(kind);
        self.preferred_column = None;
    }

    fn push_undo(&mut self) {
        self.undo = Some(UndoSnapshot {
            rope: self.rope.clone(),
            selection: self.selection,
        });
    }

    fn end_edit_run(&mut self) {
        self.last_edit = None;
        self.preferred_column = None;
    }

    fn grapheme_columns(&self, line: usize) -> Vec<usize> {
        let text = self.line_text(line);
        let mut columns = Vec::with_capacity(text.len() + 1);
        let mut column = 0;
        for grapheme in text.graphemes(true) {
            columns.push(column);
            column += grapheme.chars().count();
        }
        columns.push(column);
        columns
    }

    fn prev_boundary(&self, offset: usize) -> usize {
        let (line, column) = self.position_of(offset);
        if column == 0 {
            return offset.saturating_sub(1);
        }
        let line_start = offset - column;
        let prev = self
            .grapheme_columns(line)
            .into_iter()
            .take_while(|&c| c < column)
            .last()
            .unwrap_or(0);
        line_start + prev
    }

    fn next_boundary(&self, offset: usize) -> usize {
        let (line, column) = self.position_of(offset);
        if column >= self.line_len(line) {
            return (offset + 1).min(self.len_chars());
        }
        let line_start = offset - column;
        let next = self
            .grapheme_columns(line)
            .into_iter()
            .find(|&c| c > column)
            .unwrap_or(column + 1);
        line_start + next
    }
}
