use super::error::{EditorError, EditorResult};
use super::format::FormatSettings;
use super::line_store::{Line, LineChain, LineId, LineStore};
use super::markers::{Marker, MarkerTable};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_FILENAME: &str = "UNTITLED.TXT";
const DEFAULT_PAGE_HEIGHT: usize = 23;

/// The window of lines the renderer shows. The document keeps it so that
/// paging and scrolling stay consistent with the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top_line: usize,
    pub height: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            top_line: 0,
            height: DEFAULT_PAGE_HEIGHT,
        }
    }
}

pub struct Document {
    lines: LineStore,
    current_line: LineId,
    cursor_x: usize,
    line_count: usize,
    pub modified: bool,
    pub filename: PathBuf,
    pub markers: MarkerTable,
    pub insert_mode: bool,
    pub auto_indent: bool,
    pub format: FormatSettings,
    pub viewport: Viewport,
}

impl Document {
    pub fn new() -> Self {
        let mut lines = LineStore::new();
        let current_line = lines.push_back(Line::new());
        Self {
            lines,
            current_line,
            cursor_x: 0,
            line_count: 1,
            modified: false,
            filename: PathBuf::from(DEFAULT_FILENAME),
            markers: MarkerTable::new(),
            insert_mode: true,
            auto_indent: false,
            format: FormatSettings::default(),
            viewport: Viewport::default(),
        }
    }

    /// Open `filename`. A missing file is not an error: the result is an
    /// empty document bound to that name.
    pub fn open(filename: impl Into<PathBuf>) -> EditorResult<Self> {
        let filename = filename.into();
        let mut doc = Self::new();
        match fs::read(&filename) {
            Ok(bytes) => {
                let chain = parse_lines(&bytes)?;
                doc.replace_contents(chain);
                info!(path = %filename.display(), lines = doc.line_count, "loaded file");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %filename.display(), "new file");
            }
            Err(e) => return Err(EditorError::io(filename, e)),
        }
        doc.filename = filename;
        doc.modified = false;
        Ok(doc)
    }

    fn replace_contents(&mut self, chain: LineChain) {
        self.lines.clear();
        let count = chain.len();
        for line in chain.into_lines() {
            self.lines.push_back(line);
        }
        if count == 0 {
            self.lines.push_back(Line::new());
        }
        self.line_count = self.lines.len();
        self.current_line = self.head();
        self.cursor_x = 0;
        self.markers.clear_all();
        self.viewport.top_line = 0;
    }

    /// Write every line separated by CRLF, with no terminator after the
    /// last one. On failure `modified` is left as it was.
    pub fn save(&mut self) -> EditorResult<()> {
        let path = self.filename.clone();
        self.write_to(&path)?;
        self.modified = false;
        info!(path = %path.display(), lines = self.line_count, "saved file");
        Ok(())
    }

    pub fn save_as(&mut self, filename: impl Into<PathBuf>) -> EditorResult<()> {
        let filename = filename.into();
        self.write_to(&filename)?;
        self.filename = filename;
        self.modified = false;
        info!(path = %self.filename.display(), "saved file under new name");
        Ok(())
    }

    fn write_to(&self, path: &Path) -> EditorResult<()> {
        let file = File::create(path).map_err(|e| EditorError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        for (i, (_, line)) in self.lines.iter().enumerate() {
            if i > 0 {
                writer.write_all(b"\r\n").map_err(|e| EditorError::io(path, e))?;
            }
            writer
                .write_all(line.text())
                .map_err(|e| EditorError::io(path, e))?;
        }
        writer.flush().map_err(|e| EditorError::io(path, e))
    }

    pub fn lines(&self) -> &LineStore {
        &self.lines
    }

    pub(crate) fn lines_mut(&mut self) -> &mut LineStore {
        &mut self.lines
    }

    pub fn head(&self) -> LineId {
        // A document always holds at least one line.
        self.lines.head().unwrap_or(self.current_line)
    }

    pub fn current_line_id(&self) -> LineId {
        self.current_line
    }

    pub fn current_line(&self) -> EditorResult<&Line> {
        self.lines.get(self.current_line)
    }

    pub(crate) fn current_line_mut(&mut self) -> EditorResult<&mut Line> {
        self.lines.get_mut(self.current_line)
    }

    pub fn cursor_x(&self) -> usize {
        self.cursor_x
    }

    pub(crate) fn set_cursor_x(&mut self, column: usize) -> EditorResult<()> {
        let len = self.current_line()?.len();
        self.cursor_x = column.min(len);
        Ok(())
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub(crate) fn adjust_line_count(&mut self, added: usize, removed: usize) {
        self.line_count = self.line_count + added - removed;
        debug_assert_eq!(self.line_count, self.lines.len());
    }

    /// Zero-based index of the current line.
    pub fn current_index(&self) -> EditorResult<usize> {
        self.lines.index_of(self.current_line)
    }

    /// Move to `id`, clamping the column to that line's length.
    pub fn set_position(&mut self, id: LineId, column: usize) -> EditorResult<()> {
        let len = self.lines.get(id)?.len();
        self.current_line = id;
        self.cursor_x = column.min(len);
        Ok(())
    }

    pub fn insert_char(&mut self, byte: u8) -> EditorResult<()> {
        let x = self.cursor_x;
        let insert_mode = self.insert_mode;
        let line = self.current_line_mut()?;
        if insert_mode {
            line.insert(x, byte)?;
        } else {
            line.overwrite(x, byte)?;
        }
        self.cursor_x += 1;
        self.modified = true;
        if self.format.word_wrap {
            self.wrap_check()?;
        }
        Ok(())
    }

    /// Insert an inert print-control byte. It never triggers word wrap.
    pub fn insert_marker_byte(&mut self, byte: u8) -> EditorResult<()> {
        let x = self.cursor_x;
        self.current_line_mut()?.insert(x, byte)?;
        self.cursor_x += 1;
        self.modified = true;
        Ok(())
    }

    /// Spaces up to the next tab stop.
    pub fn insert_tab(&mut self) -> EditorResult<()> {
        let width = self.format.tab_width.max(1);
        let count = width - self.cursor_x % width;
        for _ in 0..count {
            self.insert_char(b' ')?;
        }
        Ok(())
    }

    /// Forward delete; at end of line the next line is joined in.
    pub fn delete_char(&mut self) -> EditorResult<()> {
        let x = self.cursor_x;
        let id = self.current_line;
        let line = self.lines.get_mut(id)?;
        if x < line.len() {
            line.remove(x);
            self.modified = true;
        } else if self.lines.join(id)? {
            self.adjust_line_count(0, 1);
            self.modified = true;
        }
        Ok(())
    }

    /// Move left, then forward delete. No-op at the very start.
    pub fn backspace(&mut self) -> EditorResult<()> {
        if self.move_left()? {
            self.delete_char()?;
        }
        Ok(())
    }

    /// Split at the cursor and move to the new line. With auto-indent on, a
    /// split at column 0 repeats the line's leading whitespace in front of
    /// the moved text.
    pub fn new_line(&mut self) -> EditorResult<()> {
        let id = self.current_line;
        let x = self.cursor_x;
        let indent: Vec<u8> = if self.auto_indent && x == 0 {
            self.current_line()?
                .text()
                .iter()
                .take_while(|b| **b == b' ' || **b == b'\t')
                .copied()
                .collect()
        } else {
            Vec::new()
        };

        let new_id = self.lines.split(id, x)?;
        if !indent.is_empty() {
            self.lines.get_mut(new_id)?.insert_bytes(0, &indent)?;
        }
        self.adjust_line_count(1, 0);
        self.current_line = new_id;
        self.cursor_x = indent.len();
        self.modified = true;
        Ok(())
    }

    /// Break the line at the cursor without moving it.
    pub fn split_line(&mut self) -> EditorResult<()> {
        self.lines.split(self.current_line, self.cursor_x)?;
        self.adjust_line_count(1, 0);
        self.modified = true;
        Ok(())
    }

    pub fn delete_line(&mut self) -> EditorResult<()> {
        if self.line_count == 1 {
            self.current_line_mut()?.clear();
            self.cursor_x = 0;
        } else {
            let id = self.current_line;
            let next = self.lines.next(id)?;
            let prev = self.lines.prev(id)?;
            self.lines.remove(id)?;
            self.adjust_line_count(0, 1);
            self.current_line = next.or(prev).ok_or(EditorError::StaleReference)?;
            self.set_cursor_x(self.cursor_x)?;
        }
        self.modified = true;
        Ok(())
    }

    pub fn delete_word_right(&mut self) -> EditorResult<()> {
        let x = self.cursor_x;
        let line = self.current_line_mut()?;
        let end = super::movement::word_end_right(line.text(), x);
        if end > x {
            line.remove_range(x..end);
            self.modified = true;
        }
        Ok(())
    }

    pub fn delete_to_eol(&mut self) -> EditorResult<()> {
        let x = self.cursor_x;
        let line = self.current_line_mut()?;
        if x < line.len() {
            let len = line.len();
            line.remove_range(x..len);
            self.modified = true;
        }
        Ok(())
    }

    /// Jump to a 1-based line number; numbers past the end land on the
    /// last line.
    pub fn goto_line(&mut self, input: &str) -> EditorResult<()> {
        let number: usize = input
            .trim()
            .parse()
            .map_err(|_| EditorError::InvalidLineNumber(input.to_string()))?;
        if number == 0 {
            return Err(EditorError::InvalidLineNumber(input.to_string()));
        }
        let index = (number - 1).min(self.line_count - 1);
        let id = self.lines.nth(index).ok_or(EditorError::StaleReference)?;
        self.set_position(id, 0)
    }

    /// Link `chain` in after the current line and put the cursor on its
    /// first line.
    pub fn insert_lines(&mut self, chain: LineChain) -> EditorResult<usize> {
        let count = chain.len();
        if let Some((first, _)) = self.lines.splice_in(Some(self.current_line), chain)? {
            self.adjust_line_count(count, 0);
            self.current_line = first;
            self.cursor_x = 0;
            self.modified = true;
        }
        debug!(count, "inserted lines");
        Ok(count)
    }

    /// Remove `start..=end` (start must precede end). The cursor moves to
    /// the line after the range, else the one before it, else a fresh
    /// empty line when nothing is left.
    pub fn remove_range(&mut self, start: LineId, end: LineId) -> EditorResult<usize> {
        let before = self.lines.prev(start)?;
        let after = self.lines.next(end)?;
        let removed = self.lines.splice_out(start, end)?;
        let count = removed.len();
        self.adjust_line_count(0, count);

        let landing = [after, before]
            .into_iter()
            .flatten()
            .find(|id| self.lines.contains(*id));
        self.current_line = match landing {
            Some(id) => id,
            None => {
                let id = self.lines.push_back(Line::new());
                self.adjust_line_count(1, 0);
                id
            }
        };
        self.cursor_x = 0;
        self.modified = true;
        debug!(count, "removed lines");
        Ok(count)
    }

    pub fn set_marker(&mut self, slot: usize) -> EditorResult<()> {
        self.markers.set(
            slot,
            Marker {
                line: self.current_line,
                column: self.cursor_x,
            },
        )
    }

    /// Restore a saved position. A marker whose line has since been
    /// destroyed is cleared and reported as stale.
    pub fn goto_marker(&mut self, slot: usize) -> EditorResult<()> {
        let marker = self.markers.get(slot)?;
        if !self.lines.contains(marker.line) {
            self.markers.clear(slot);
            return Err(EditorError::StaleReference);
        }
        self.set_position(marker.line, marker.column)
    }

    pub fn set_page_height(&mut self, height: usize) {
        self.viewport.height = height.max(1);
    }

    /// Shift the viewport so the current line is inside it.
    pub fn scroll_into_view(&mut self) -> EditorResult<()> {
        let index = self.current_index()?;
        let height = self.viewport.height.max(1);
        if index < self.viewport.top_line {
            self.viewport.top_line = index;
        } else if index >= self.viewport.top_line + height {
            self.viewport.top_line = index + 1 - height;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn from_text(lines: &[&str]) -> Self {
        let mut doc = Self::new();
        let chain = LineChain::from_lines(
            lines
                .iter()
                .map(|text| Line::from_bytes(text.as_bytes()).unwrap())
                .collect(),
        );
        doc.replace_contents(chain);
        doc
    }

    #[cfg(test)]
    pub fn texts(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|(_, line)| String::from_utf8_lossy(line.text()).into_owned())
            .collect()
    }

    #[cfg(test)]
    pub fn current_text(&self) -> String {
        String::from_utf8_lossy(self.current_line().unwrap().text()).into_owned()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Split raw file bytes on LF, dropping one trailing CR per line.
pub fn parse_lines(bytes: &[u8]) -> EditorResult<LineChain> {
    let mut chain = LineChain::new();
    for raw in bytes.split(|b| *b == b'\n') {
        let text = raw.strip_suffix(b"\r").unwrap_or(raw);
        chain.push(Line::from_bytes(text)?);
    }
    Ok(chain)
}

/// Read a file into a detached chain; unlike `Document::open` a missing
/// file is an error here.
pub fn read_chain(path: &Path) -> EditorResult<LineChain> {
    let bytes = fs::read(path).map_err(|e| EditorError::io(path, e))?;
    parse_lines(&bytes)
}
