use super::view_model::{DisplayLine, ViewModel};
use crossterm::{
    cursor, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType, size},
};
use std::io::{self, Write, stdout};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Clone)]
pub struct RenderParams<'a> {
    /// Shown in place of the status line while a prompt is open.
    pub prompt: Option<&'a str>,
    pub capture: &'a str,
    pub status_message: &'a str,
    pub menu: &'a str,
}

/// One displayed glyph and the byte of the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cell {
    byte: usize,
    text: String,
    width: usize,
}

/// Tabs expand to the next stop, control bytes show as `^X`, bytes that
/// are not UTF-8 show as `?`.
fn layout_line(text: &[u8], tab_width: usize) -> Vec<Cell> {
    let tab = tab_width.max(1);
    let mut cells = Vec::new();
    let mut col = 0;
    let mut offset = 0;
    for chunk in text.utf8_chunks() {
        for (i, c) in chunk.valid().char_indices() {
            let (text, width) = match c {
                '\t' => {
                    let w = tab - col % tab;
                    (" ".repeat(w), w)
                }
                c if c.is_ascii_control() => (format!("^{}", (c as u8 ^ 0x40) as char), 2),
                c => (c.to_string(), c.width().unwrap_or(1)),
            };
            col += width;
            cells.push(Cell {
                byte: offset + i,
                text,
                width,
            });
        }
        offset += chunk.valid().len();
        for i in 0..chunk.invalid().len() {
            cells.push(Cell {
                byte: offset + i,
                text: "?".to_string(),
                width: 1,
            });
            col += 1;
        }
        offset += chunk.invalid().len();
    }
    cells
}

/// Screen column of the byte at `byte`, before horizontal scrolling.
fn cursor_column(cells: &[Cell], byte: usize) -> usize {
    cells
        .iter()
        .take_while(|cell| cell.byte < byte)
        .map(|cell| cell.width)
        .sum()
}

/// The part of the line between display columns `from` and `from + width`.
/// A glyph cut by either edge is dropped.
fn visible_slice(cells: &[Cell], from: usize, width: usize) -> String {
    let mut out = String::new();
    let mut col = 0;
    for cell in cells {
        let end = col + cell.width;
        if col >= from && end <= from + width {
            out.push_str(&cell.text);
        }
        col = end;
        if col >= from + width {
            break;
        }
    }
    out
}

/// Truncate `text` to at most `width` display columns.
fn clip(text: &str, width: usize) -> &str {
    if text.width() <= width {
        return text;
    }
    let mut used = 0;
    for (i, c) in text.char_indices() {
        used += c.width().unwrap_or(0);
        if used > width {
            return &text[..i];
        }
    }
    text
}

pub struct View {
    last_lines: Vec<(String, bool)>,
    last_status: String,
    last_menu: String,
    last_terminal_size: (u16, u16),
    horizontal_scroll: usize,
    needs_full_redraw: bool,
}

impl View {
    pub fn new() -> Self {
        Self {
            last_lines: Vec::new(),
            last_status: String::new(),
            last_menu: String::new(),
            last_terminal_size: (0, 0),
            horizontal_scroll: 0,
            needs_full_redraw: true,
        }
    }

    /// Rows available for document text: the terminal minus the status and
    /// menu lines.
    pub fn text_rows() -> usize {
        let (_, height) = size().unwrap_or((80, 24));
        (height as usize).saturating_sub(2).max(1)
    }

    fn status_line(view_model: &dyn ViewModel, params: &RenderParams) -> String {
        if let Some(prompt) = params.prompt {
            return format!("{prompt}{}", params.capture);
        }
        let cursor = view_model.get_cursor_position();
        let modified = if view_model.is_modified() { "*" } else { "" };
        let mode = if view_model.insert_mode() {
            "Insert"
        } else {
            "Overwrite"
        };
        format!(
            "{}{modified}  Line:{}/{} Col:{}  {mode}  {}",
            view_model.filename(),
            cursor.line + 1,
            view_model.get_line_count(),
            cursor.column + 1,
            params.status_message
        )
    }

    fn adjust_horizontal_scroll(&mut self, cursor_col: usize, width: usize) {
        if cursor_col < self.horizontal_scroll {
            self.horizontal_scroll = cursor_col;
            self.needs_full_redraw = true;
        } else if cursor_col >= self.horizontal_scroll + width {
            self.horizontal_scroll = cursor_col + 1 - width;
            self.needs_full_redraw = true;
        }
    }

    pub fn render(&mut self, view_model: &dyn ViewModel, params: &RenderParams) -> io::Result<()> {
        let (width, height) = size()?;
        let width = width as usize;
        let rows = (height as usize).saturating_sub(2);
        let mut out = stdout().lock();

        if self.last_terminal_size != (width as u16, height) {
            self.last_terminal_size = (width as u16, height);
            self.needs_full_redraw = true;
        }

        let tab_width = view_model.tab_width();
        let lines: Vec<DisplayLine> = view_model.visible_lines(rows);
        let cursor = view_model.get_cursor_position();
        let cursor_row = cursor.line.saturating_sub(view_model.top_line());
        let cursor_cells = lines
            .get(cursor_row)
            .map(|line| layout_line(&line.text, tab_width))
            .unwrap_or_default();
        let cursor_col = cursor_column(&cursor_cells, cursor.column);
        self.adjust_horizontal_scroll(cursor_col, width.max(1));

        if self.needs_full_redraw {
            queue!(out, Clear(ClearType::All))?;
            self.last_lines.clear();
            self.last_status.clear();
            self.last_menu.clear();
            self.needs_full_redraw = false;
        }

        let status = Self::status_line(view_model, params);
        if status != self.last_status {
            queue!(
                out,
                cursor::MoveTo(0, 0),
                Clear(ClearType::CurrentLine),
                SetAttribute(Attribute::Reverse),
                Print(clip(&status, width)),
                SetAttribute(Attribute::Reset)
            )?;
            self.last_status = status;
        }

        let rendered: Vec<(String, bool)> = (0..rows)
            .map(|i| match lines.get(i) {
                Some(line) => (
                    visible_slice(
                        &layout_line(&line.text, tab_width),
                        self.horizontal_scroll,
                        width,
                    ),
                    line.in_block,
                ),
                None => (String::new(), false),
            })
            .collect();
        for (i, (text, in_block)) in rendered.iter().enumerate() {
            if self.last_lines.get(i) == Some(&(text.clone(), *in_block)) {
                continue;
            }
            queue!(out, cursor::MoveTo(0, (i + 1) as u16), Clear(ClearType::CurrentLine))?;
            if *in_block {
                queue!(
                    out,
                    SetAttribute(Attribute::Reverse),
                    Print(text),
                    SetAttribute(Attribute::Reset)
                )?;
            } else {
                queue!(out, Print(text))?;
            }
        }
        self.last_lines = rendered;

        if params.menu != self.last_menu {
            queue!(
                out,
                cursor::MoveTo(0, height.saturating_sub(1)),
                Clear(ClearType::CurrentLine),
                Print(clip(params.menu, width))
            )?;
            self.last_menu = params.menu.to_string();
        }

        let (row, col) = match params.prompt {
            Some(prompt) => (0, (prompt.width() + params.capture.width()).min(width)),
            None => (cursor_row + 1, cursor_col - self.horizontal_scroll),
        };
        queue!(out, cursor::MoveTo(col as u16, row as u16))?;
        out.flush()
    }

    pub fn force_redraw(&mut self) {
        self.needs_full_redraw = true;
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(text: &[u8], tab: usize) -> String {
        layout_line(text, tab).into_iter().map(|c| c.text).collect()
    }

    #[test]
    fn test_control_bytes_and_tabs() {
        assert_eq!(rendered(b"a\x02b", 8), "a^Bb");
        assert_eq!(rendered(b"a\tb", 4), "a   b");
        assert_eq!(rendered(b"\x7f", 4), "^?");
        assert_eq!(rendered(b"a\xffb", 4), "a?b");
    }

    #[test]
    fn test_cursor_column() {
        let cells = layout_line(b"a\tb", 4);
        assert_eq!(cursor_column(&cells, 0), 0);
        assert_eq!(cursor_column(&cells, 1), 1);
        assert_eq!(cursor_column(&cells, 2), 4);
        assert_eq!(cursor_column(&cells, 3), 5);

        let wide = layout_line("a中b".as_bytes(), 4);
        assert_eq!(cursor_column(&wide, 1), 1);
        assert_eq!(cursor_column(&wide, 4), 3);

        let ctrl = layout_line(b"\x13x", 4);
        assert_eq!(cursor_column(&ctrl, 1), 2);
    }

    #[test]
    fn test_visible_slice_scrolls() {
        let cells = layout_line(b"abcdefgh", 8);
        assert_eq!(visible_slice(&cells, 0, 3), "abc");
        assert_eq!(visible_slice(&cells, 5, 10), "fgh");
        // A double-width glyph cut by the edge is dropped.
        let wide = layout_line("中文".as_bytes(), 8);
        assert_eq!(visible_slice(&wide, 1, 4), "文");
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("hello", 10), "hello");
        assert_eq!(clip("hello", 3), "hel");
        assert_eq!(clip("中文字", 5), "中文");
    }

    #[test]
    fn test_status_line_shows_position_and_prompt() {
        use crate::document_model::{Block, Document};
        use crate::view::DocumentViewModel;

        let mut doc = Document::from_text(&["one", "two", "three"]);
        doc.goto_line("2").unwrap();
        doc.insert_char(b'x').unwrap();
        let block = Block::new();
        let view_model = DocumentViewModel::new(&doc, &block);
        let mut params = RenderParams {
            prompt: None,
            capture: "",
            status_message: "Found: two",
            menu: "",
        };
        assert_eq!(
            View::status_line(&view_model, &params),
            "UNTITLED.TXT*  Line:2/3 Col:2  Insert  Found: two"
        );

        params.prompt = Some("FIND: ");
        params.capture = "tw";
        assert_eq!(View::status_line(&view_model, &params), "FIND: tw");
    }

    #[test]
    fn test_horizontal_scroll_follows_cursor() {
        let mut view = View::new();
        view.adjust_horizontal_scroll(100, 80);
        assert_eq!(view.horizontal_scroll, 21);
        view.adjust_horizontal_scroll(5, 80);
        assert_eq!(view.horizontal_scroll, 5);
    }
}
