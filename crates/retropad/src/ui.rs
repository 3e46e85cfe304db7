//! Rendering: menu bar, edit area, status bar, dialogs and message boxes.

use crate::Shell;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use retropad_core::menu::resolve;
use retropad_core::{
    APP_TITLE, Dialog, FieldFocus, FontDescriptor, MENU_BAR, MenuEntry, MessageKind,
    SearchDirection, TextField,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TAB_WIDTH: usize = 8;

/// Cells taken by `ch` when it starts at cell `at` of its row.
fn char_cells(ch: char, at: usize) -> usize {
    match ch {
        '\t' => TAB_WIDTH - at % TAB_WIDTH,
        c if c.is_control() => 1,
        c => c.width().unwrap_or(0),
    }
}

/// Start columns of the rows `line` occupies when wrapped to `width` cells.
///
/// Rows break after the last space that fits, or mid-word when a word is wider than a row.
pub(crate) fn wrap_points(line: &[char], width: usize) -> Vec<usize> {
    let mut starts = vec![0];
    if width == 0 {
        return starts;
    }

    let mut row_start = 0;
    let mut cells = 0;
    let mut last_break = None;
    let mut i = 0;
    while i < line.len() {
        let w = char_cells(line[i], cells);
        if cells + w > width && i > row_start {
            let brk = match last_break {
                Some(b) if b > row_start => b,
                _ => i,
            };
            starts.push(brk);
            row_start = brk;
            cells = 0;
            last_break = None;
            i = brk;
            continue;
        }
        cells += w;
        if matches!(line[i], ' ' | '\t') {
            last_break = Some(i + 1);
        }
        i += 1;
    }
    starts
}

/// Row of `column` within wrapped rows starting at `starts`.
fn row_of(starts: &[usize], column: usize) -> usize {
    starts
        .iter()
        .rposition(|&start| start <= column)
        .unwrap_or(0)
}

fn cells_between(line: &[char], from: usize, to: usize) -> usize {
    line[from..to.min(line.len())]
        .iter()
        .fold(0, |cells, &ch| cells + char_cells(ch, cells))
}

fn font_style(font: &FontDescriptor) -> Style {
    let mut modifiers = Modifier::empty();
    if font.is_bold() {
        modifiers |= Modifier::BOLD;
    }
    if font.is_italic() {
        modifiers |= Modifier::ITALIC;
    }
    if font.is_underline() {
        modifiers |= Modifier::UNDERLINED;
    }
    if font.is_strike_out() {
        modifiers |= Modifier::CROSSED_OUT;
    }
    Style::default().add_modifier(modifiers)
}

/// One screen row of a logical line.
struct RowSlice<'a> {
    chars: &'a [char],
    /// Document offset of `chars[0]`.
    line_offset: usize,
    from: usize,
    to: usize,
}

fn render_row(
    row: RowSlice<'_>,
    skip_cells: usize,
    max_cells: usize,
    selection: (usize, usize),
    base: Style,
) -> Line<'static> {
    let selected = base.bg(Color::Blue).fg(Color::White);
    let mut spans = Vec::new();
    let mut buffer = String::new();
    let mut current = base;
    let mut cells = 0;

    for col in row.from..row.to {
        let ch = row.chars[col];
        let start_cell = cells;
        let w = char_cells(ch, cells);
        cells += w;
        if start_cell < skip_cells {
            continue;
        }
        if cells - skip_cells > max_cells {
            break;
        }

        let offset = row.line_offset + col;
        let style = if offset >= selection.0 && offset < selection.1 {
            selected
        } else {
            base
        };
        if style != current && !buffer.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut buffer), current));
        }
        current = style;

        match ch {
            '\t' => buffer.extend(std::iter::repeat_n(' ', w)),
            c if c.is_control() => buffer.push('?'),
            c => buffer.push(c),
        }
    }

    if !buffer.is_empty() {
        spans.push(Span::styled(buffer, current));
    }
    Line::from(spans)
}

/// A `width` x `height` rectangle centered in `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn checkbox(label: &str, checked: bool) -> String {
    format!("[{}] {label}", if checked { 'x' } else { ' ' })
}

fn radio(label: &str, on: bool) -> String {
    format!("({}) {label}", if on { '*' } else { ' ' })
}

/// Text for an input row plus the cell offset of its caret.
fn field_line(label: &str, field: &TextField, focused: bool) -> (Line<'static>, Option<u16>) {
    let marker = if focused { '>' } else { ' ' };
    let prefix = format!("{marker} {label} ");
    let caret = (prefix.width() + field.value().width()) as u16;
    let line = Line::from(vec![
        Span::raw(prefix),
        Span::styled(
            field.value().to_string(),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ),
    ]);
    (line, focused.then_some(caret))
}

impl Shell {
    pub(crate) fn render(&mut self, frame: &mut Frame) {
        let status_height = u16::from(self.app.status_visible());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),             // menu bar
                Constraint::Min(1),                // edit area
                Constraint::Length(status_height), // status bar
            ])
            .split(frame.area());

        let editor_area = chunks[1];
        self.text_area = Block::default().borders(Borders::ALL).inner(editor_area);
        self.adjust_scroll();

        self.render_editor(frame, editor_area);
        if self.app.status_visible() {
            self.render_status_bar(frame, chunks[2]);
        }
        self.render_menu_bar(frame, chunks[0]);

        let overlay_active =
            self.menu.is_some() || self.app.dialog().is_open() || self.app.message().is_some();
        if !overlay_active {
            self.place_caret(frame);
        }

        if self.app.dialog().is_open() {
            self.render_dialog(frame, editor_area);
        }
        if self.menu.is_some() {
            self.render_menu(frame, chunks[0]);
        }
        if self.app.message().is_some() {
            self.render_message(frame, editor_area);
        }
    }

    /// Caret row relative to `scroll_line`/`scroll_row` and its x offset, in cells.
    fn caret_layout(&self) -> (usize, usize, usize) {
        let doc = self.app.document();
        let caret = doc.selection().caret;
        let (line, column) = doc.position_of(caret);
        let chars: Vec<char> = doc.line_text(line).chars().collect();

        if self.app.word_wrap() {
            let starts = wrap_points(&chars, usize::from(self.text_area.width));
            let row = row_of(&starts, column);
            let x = cells_between(&chars, starts[row], column);
            (line, row, x)
        } else {
            (line, 0, cells_between(&chars, 0, column))
        }
    }

    fn rows_in_line(&self, line: usize) -> usize {
        let chars: Vec<char> = self.app.document().line_text(line).chars().collect();
        wrap_points(&chars, usize::from(self.text_area.width)).len()
    }

    /// Keep the caret inside the text area.
    fn adjust_scroll(&mut self) {
        let height = usize::from(self.text_area.height);
        let width = usize::from(self.text_area.width);
        if height == 0 || width == 0 {
            return;
        }

        let last_line = self.app.document().line_count().saturating_sub(1);
        self.scroll_line = self.scroll_line.min(last_line);

        let (line, row, x) = self.caret_layout();

        if !self.app.word_wrap() {
            self.scroll_row = 0;
            if line < self.scroll_line {
                self.scroll_line = line;
            } else if line >= self.scroll_line + height {
                self.scroll_line = line + 1 - height;
            }
            if x < self.scroll_left {
                self.scroll_left = x;
            } else if x >= self.scroll_left + width {
                self.scroll_left = x + 1 - width;
            }
            return;
        }

        self.scroll_left = 0;
        let top_rows = self.rows_in_line(self.scroll_line);
        self.scroll_row = self.scroll_row.min(top_rows - 1);
        if (line, row) < (self.scroll_line, self.scroll_row) {
            self.scroll_line = line;
            self.scroll_row = row;
            return;
        }

        // Rows between the top of the viewport and the caret row.
        let mut distance = if line == self.scroll_line {
            row - self.scroll_row
        } else {
            let middle: usize = (self.scroll_line + 1..line)
                .map(|l| self.rows_in_line(l))
                .sum();
            top_rows - self.scroll_row + middle + row
        };

        while distance >= height {
            if self.scroll_row + 1 < self.rows_in_line(self.scroll_line) {
                self.scroll_row += 1;
            } else {
                self.scroll_line += 1;
                self.scroll_row = 0;
            }
            distance -= 1;
        }
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let doc = self.app.document();
        let height = usize::from(self.text_area.height);
        let width = usize::from(self.text_area.width);
        let selection = doc.selection_range();
        let base = font_style(self.app.font());

        let mut lines = Vec::with_capacity(height);
        let mut line = self.scroll_line;
        let mut skip_rows = self.scroll_row;

        while lines.len() < height && line < doc.line_count() {
            let chars: Vec<char> = doc.line_text(line).chars().collect();
            let line_offset = doc.line_start(line);

            if self.app.word_wrap() {
                let starts = wrap_points(&chars, width);
                for (idx, &from) in starts.iter().enumerate().skip(skip_rows) {
                    if lines.len() >= height {
                        break;
                    }
                    let to = starts.get(idx + 1).copied().unwrap_or(chars.len());
                    let row = RowSlice {
                        chars: &chars,
                        line_offset,
                        from,
                        to,
                    };
                    lines.push(render_row(row, 0, width, selection, base));
                }
            } else {
                let row = RowSlice {
                    chars: &chars,
                    line_offset,
                    from: 0,
                    to: chars.len(),
                };
                lines.push(render_row(row, self.scroll_left, width, selection, base));
            }

            skip_rows = 0;
            line += 1;
        }

        let name = self
            .app
            .current_path()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| retropad_core::UNTITLED_NAME.to_string());
        let marker = if doc.is_modified() { " *" } else { "" };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {name}{marker} "));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn place_caret(&self, frame: &mut Frame) {
        let area = self.text_area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let (line, row, x) = self.caret_layout();

        let y = if self.app.word_wrap() {
            if (line, row) < (self.scroll_line, self.scroll_row) {
                return;
            }
            let mut y = 0;
            let mut l = self.scroll_line;
            let mut r = self.scroll_row;
            while (l, r) < (line, row) {
                y += 1;
                if r + 1 < self.rows_in_line(l) {
                    r += 1;
                } else {
                    l += 1;
                    r = 0;
                }
                if y >= usize::from(area.height) {
                    return;
                }
            }
            y
        } else {
            match line.checked_sub(self.scroll_line) {
                Some(y) if y < usize::from(area.height) => y,
                _ => return,
            }
        };

        let x = x.saturating_sub(self.scroll_left).min(usize::from(area.width) - 1);
        frame.set_cursor_position(Position::new(area.x + x as u16, area.y + y as u16));
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let left = self.app.status_text();
        let right = format!(
            "{}  {}  {} ",
            self.app.line_ending().label(),
            self.app.encoding(),
            self.app.font().describe()
        );
        let pad = usize::from(area.width).saturating_sub(left.width() + right.width() + 1);
        let text = format!(" {left}{}{right}", " ".repeat(pad));

        let status = Paragraph::new(text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
        frame.render_widget(status, area);
    }

    fn render_menu_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for (idx, menu) in MENU_BAR.iter().enumerate() {
            let open = self.menu.is_some_and(|cursor| cursor.menu == idx);
            let style = if open {
                Style::default().bg(Color::White).fg(Color::Black)
            } else {
                Style::default()
            };
            spans.push(Span::styled(format!(" {} ", menu.title), style));
        }
        spans.push(Span::styled(
            "  F10: menu",
            Style::default().fg(Color::DarkGray),
        ));

        let bar = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(bar, area);
    }

    fn render_menu(&self, frame: &mut Frame, bar: Rect) {
        let Some(cursor) = self.menu else {
            return;
        };
        let menu = &MENU_BAR[cursor.menu];
        let items = resolve(menu, &self.app);

        let label_width = menu.items().map(|i| i.label.width()).max().unwrap_or(0);
        let accel_width = menu
            .items()
            .filter_map(|i| i.accelerator)
            .map(str::width)
            .max()
            .unwrap_or(0);
        let inner_width = 2 + label_width + 2 + accel_width + 1;

        let mut lines = Vec::new();
        let mut item_idx = 0;
        for entry in menu.entries {
            match entry {
                MenuEntry::Separator => lines.push(Line::from("─".repeat(inner_width))),
                MenuEntry::Item(_) => {
                    let resolved = &items[item_idx];
                    let check = if resolved.state.checked { '✓' } else { ' ' };
                    let text = format!(
                        "{check} {:<label_width$}  {:>accel_width$} ",
                        resolved.item.label,
                        resolved.item.accelerator.unwrap_or(""),
                    );
                    let mut style = Style::default();
                    if !resolved.state.enabled {
                        style = style.fg(Color::DarkGray);
                    }
                    if item_idx == cursor.item {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    lines.push(Line::styled(text, style));
                    item_idx += 1;
                }
            }
        }

        let x_offset: usize = MENU_BAR[..cursor.menu]
            .iter()
            .map(|m| m.title.width() + 2)
            .sum();
        let frame_area = frame.area();
        let area = Rect {
            x: bar.x + x_offset as u16,
            y: bar.y + 1,
            width: (inner_width as u16 + 2).min(frame_area.width.saturating_sub(bar.x + x_offset as u16)),
            height: (lines.len() as u16 + 2).min(frame_area.height.saturating_sub(bar.y + 1)),
        };

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }

    fn render_dialog(&self, frame: &mut Frame, area: Rect) {
        let dialog = self.app.dialog();
        let mut lines: Vec<Line<'static>> = Vec::new();
        // (row, column) of the caret inside the dialog's inner area.
        let mut caret: Option<(u16, u16)> = None;
        let mut push_field = |lines: &mut Vec<Line<'static>>, label: &str, field: &TextField, focused: bool| {
            let (line, x) = field_line(label, field, focused);
            if let Some(x) = x {
                caret = Some((lines.len() as u16, x));
            }
            lines.push(line);
        };

        match dialog {
            Dialog::None => return,
            Dialog::Find(d) => {
                push_field(&mut lines, "Find what:", &d.find_what, true);
                lines.push(Line::from(""));
                lines.push(Line::from(format!(
                    "  {}    Direction: {} {}",
                    checkbox("Match case (Alt+C)", d.match_case),
                    radio("Up (Alt+U)", d.direction == SearchDirection::Up),
                    radio("Down (Alt+D)", d.direction == SearchDirection::Down),
                )));
                lines.push(Line::from(""));
                lines.push(hint("Enter: Find Next   F3/Shift+F3: Next/Previous   Esc: Cancel"));
            }
            Dialog::Replace(d) => {
                let first = d.focus == FieldFocus::First;
                push_field(&mut lines, "Find what:   ", &d.find_what, first);
                push_field(&mut lines, "Replace with:", &d.replace_with, !first);
                lines.push(Line::from(""));
                lines.push(Line::from(format!(
                    "  {}",
                    checkbox("Match case (Alt+C)", d.match_case)
                )));
                lines.push(Line::from(""));
                lines.push(hint(
                    "Enter: Find Next  Alt+R: Replace  Alt+A: Replace All  Tab: Switch  Esc: Cancel",
                ));
            }
            Dialog::GoTo(d) => {
                push_field(&mut lines, "Line number:", &d.line, true);
                lines.push(Line::from(""));
                lines.push(hint("Enter: Go To   Esc: Cancel"));
            }
            Dialog::Font(d) => {
                let first = d.focus == FieldFocus::First;
                push_field(&mut lines, "Font:", &d.face_name, first);
                push_field(&mut lines, "Size:", &d.size, !first);
                lines.push(Line::from(""));
                lines.push(Line::from(format!(
                    "  {}  {}  {}  {}",
                    checkbox("Bold (Alt+B)", d.bold),
                    checkbox("Italic (Alt+I)", d.italic),
                    checkbox("Underline (Alt+U)", d.underline),
                    checkbox("Strikeout (Alt+K)", d.strike_out),
                )));
                let sample = d.to_font(self.app.font());
                lines.push(Line::from(vec![
                    Span::raw("  Sample: "),
                    Span::styled("AaBbYyZz", font_style(&sample)),
                ]));
                lines.push(Line::from(""));
                lines.push(hint("Enter: OK   Tab: Switch   Esc: Cancel"));
            }
            Dialog::Open { path } | Dialog::SaveAs { path, .. } => {
                push_field(&mut lines, "File name:", path, true);
                lines.push(Line::from(""));
                lines.push(hint("Enter: OK   Esc: Cancel"));
            }
            Dialog::ConfirmSave(_) => {
                lines.push(Line::from(format!("  {}", self.app.confirm_save_prompt())));
                lines.push(Line::from(""));
                lines.push(hint("Y: Yes   N: No   Esc: Cancel"));
            }
            Dialog::About => {
                lines.push(Line::from(format!(
                    "  {APP_TITLE} {}",
                    env!("CARGO_PKG_VERSION")
                )));
                lines.push(Line::from("  A classic notepad for the terminal."));
                lines.push(Line::from(""));
                lines.push(hint("Enter: OK"));
            }
        }

        let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
        let width = (content_width + 4).max(40);
        let height = lines.len() as u16 + 2;
        let popup = centered_rect(width, height, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", dialog.title()));
        let inner = block.inner(popup);

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);

        if self.app.message().is_none()
            && let Some((row, x)) = caret
            && row < inner.height
        {
            let x = x.min(inner.width.saturating_sub(1));
            frame.set_cursor_position(Position::new(inner.x + x, inner.y + row));
        }
    }

    fn render_message(&self, frame: &mut Frame, area: Rect) {
        let Some(message) = self.app.message() else {
            return;
        };
        let (title, color) = match message.kind {
            MessageKind::Info => (APP_TITLE, Color::White),
            MessageKind::Warning => ("Warning", Color::Yellow),
            MessageKind::Error => ("Error", Color::LightRed),
        };

        let mut lines: Vec<Line> = message
            .text
            .lines()
            .map(|line| Line::from(format!("  {line}  ")))
            .collect();
        lines.push(Line::from(""));
        lines.push(hint("Press any key"));

        let width = (lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 2).max(30);
        let popup = centered_rect(width, lines.len() as u16 + 2, area);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color))
                        .title(format!(" {title} ")),
                ),
            popup,
        );
    }
}

fn hint(text: &str) -> Line<'static> {
    Line::styled(format!("  {text}"), Style::default().fg(Color::DarkGray))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};
    use retropad_core::{AppContext, Command};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn visible_rows(app: &AppContext, width: usize) -> usize {
        (0..app.document().line_count())
            .map(|line| wrap_points(&chars(&app.document().line_text(line)), width).len())
            .sum()
    }

    #[test]
    fn wrap_breaks_after_spaces() {
        assert_eq!(wrap_points(&chars("hello world foo"), 8), vec![0, 6, 12]);
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap_points(&chars("abcdefghij"), 4), vec![0, 4, 8]);
        assert_eq!(wrap_points(&chars(""), 4), vec![0]);
    }

    #[test]
    fn wide_characters_take_two_cells() {
        assert_eq!(wrap_points(&chars("日本語"), 4), vec![0, 2]);
        assert_eq!(cells_between(&chars("a\tb"), 0, 3), 9);
    }

    #[test]
    fn wrapped_row_count() {
        let mut app = AppContext::new(None);
        app.document_mut().replace_selection("abcdefgh\nxy");
        assert_eq!(visible_rows(&app, 4), 3);
    }

    #[test]
    fn renders_status_bar_and_title() {
        let mut app = AppContext::new(None);
        app.document_mut().replace_selection("hello\nworld");
        let mut shell = Shell::new(app);

        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal.draw(|f| shell.render(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let row = |y: u16| -> String {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(0).contains("File"));
        assert!(row(1).contains("Untitled *"));
        assert!(row(2).contains("hello"));
        assert!(row(9).contains("Ln 2, Col 6    Lines: 2"));
    }

    #[test]
    fn word_wrap_hides_status_bar_row() {
        let mut shell = Shell::new(AppContext::new(None));
        shell.app.execute(Command::FormatWordWrap);

        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal.draw(|f| shell.render(f)).unwrap();
        assert_eq!(shell.text_area.height, 8 - 1 - 2);
    }
}
