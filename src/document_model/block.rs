use super::document::{Document, read_chain};
use super::error::{EditorError, EditorResult};
use super::line_store::{LineChain, LineId};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEnd {
    pub line: LineId,
    pub column: usize,
}

/// The marked selection. Endpoints are handles into the document's store;
/// block operations act on whole lines, columns are kept for display.
#[derive(Debug, Default)]
pub struct Block {
    start: Option<BlockEnd>,
    end: Option<BlockEnd>,
    active: bool,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&self) -> Option<BlockEnd> {
        self.start
    }

    pub fn end(&self) -> Option<BlockEnd> {
        self.end
    }

    fn cursor_end(doc: &Document) -> BlockEnd {
        BlockEnd {
            line: doc.current_line_id(),
            column: doc.cursor_x(),
        }
    }

    pub fn mark_begin(&mut self, doc: &Document) {
        let here = Self::cursor_end(doc);
        self.start = Some(here);
        if self.end.is_none() {
            self.end = Some(here);
        }
        self.active = true;
    }

    pub fn mark_end(&mut self, doc: &Document) {
        let here = Self::cursor_end(doc);
        self.end = Some(here);
        if self.start.is_none() {
            self.start = Some(here);
        }
        self.active = true;
    }

    pub fn hide(&mut self) {
        self.active = false;
    }

    /// Endpoints in chain order. Inverted endpoints are swapped; a stale
    /// endpoint deactivates the block.
    fn ordered(&mut self, doc: &Document) -> EditorResult<(BlockEnd, BlockEnd)> {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Err(EditorError::NoBlock);
        };
        if !self.active {
            return Err(EditorError::NoBlock);
        }
        let lines = doc.lines();
        if !lines.contains(start.line) || !lines.contains(end.line) {
            self.active = false;
            self.start = None;
            self.end = None;
            return Err(EditorError::StaleReference);
        }
        if lines.precedes_or_equal(start.line, end.line)? {
            Ok((start, end))
        } else {
            self.start = Some(end);
            self.end = Some(start);
            Ok((end, start))
        }
    }

    /// Duplicate the marked lines into the clipboard. The document is not
    /// touched.
    pub fn copy(&mut self, doc: &Document, clipboard: &mut Clipboard) -> EditorResult<usize> {
        let (start, end) = self.ordered(doc)?;
        let chain = doc.lines().duplicate_range(start.line, end.line)?;
        let count = chain.len();
        clipboard.replace(chain);
        debug!(count, "copied block");
        Ok(count)
    }

    pub fn delete(&mut self, doc: &mut Document) -> EditorResult<usize> {
        let (start, end) = self.ordered(doc)?;
        let count = doc.remove_range(start.line, end.line)?;
        self.active = false;
        self.start = None;
        self.end = None;
        debug!(count, "deleted block");
        Ok(count)
    }

    /// Copy, delete, then insert a second duplicate of the clipboard after
    /// the line the cursor landed on. The clipboard keeps its own copy.
    pub fn move_to_cursor(
        &mut self,
        doc: &mut Document,
        clipboard: &mut Clipboard,
    ) -> EditorResult<usize> {
        self.copy(doc, clipboard)?;
        self.delete(doc)?;
        clipboard.paste(doc)
    }

    /// Write the marked lines, each followed by CRLF.
    pub fn write(&mut self, doc: &Document, path: &Path) -> EditorResult<usize> {
        let (start, end) = self.ordered(doc)?;
        let file = File::create(path).map_err(|e| EditorError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;
        for (id, line) in doc.lines().iter_from(start.line)? {
            writer
                .write_all(line.text())
                .and_then(|_| writer.write_all(b"\r\n"))
                .map_err(|e| EditorError::io(path, e))?;
            count += 1;
            if id == end.line {
                break;
            }
        }
        writer.flush().map_err(|e| EditorError::io(path, e))?;
        info!(path = %path.display(), count, "wrote block");
        Ok(count)
    }

    /// Membership walk from the earlier endpoint; used for display only.
    /// Stored endpoints are left as marked.
    pub fn is_in_block(&self, doc: &Document, line: LineId) -> bool {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return false;
        };
        if !self.active {
            return false;
        }
        let lines = doc.lines();
        let (first, last) = match lines.precedes_or_equal(start.line, end.line) {
            Ok(true) => (start.line, end.line),
            Ok(false) => (end.line, start.line),
            Err(_) => return false,
        };
        let Ok(iter) = lines.iter_from(first) else {
            return false;
        };
        for (id, _) in iter {
            if id == line {
                return true;
            }
            if id == last {
                return false;
            }
        }
        false
    }

    pub fn goto_begin(&mut self, doc: &mut Document) -> EditorResult<()> {
        let start = self.start.ok_or(EditorError::NoBlock)?;
        doc.set_position(start.line, start.column)
    }

    pub fn goto_end(&mut self, doc: &mut Document) -> EditorResult<()> {
        let end = self.end.ok_or(EditorError::NoBlock)?;
        doc.set_position(end.line, end.column)
    }
}

/// Read `path` and insert its lines after the current line.
pub fn read_file_into(doc: &mut Document, path: &Path) -> EditorResult<usize> {
    let chain = read_chain(path)?;
    let count = doc.insert_lines(chain)?;
    info!(path = %path.display(), count, "read file into document");
    Ok(count)
}

/// The most recently copied lines, owned apart from any document.
#[derive(Debug, Default)]
pub struct Clipboard {
    chain: LineChain,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous contents and take `chain`.
    pub fn replace(&mut self, chain: LineChain) {
        self.chain = chain;
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn chain(&self) -> &LineChain {
        &self.chain
    }

    /// Insert a fresh duplicate after the current line.
    pub fn paste(&self, doc: &mut Document) -> EditorResult<usize> {
        doc.insert_lines(self.chain.duplicate()?)
    }

    pub fn read_from(&mut self, path: &Path) -> EditorResult<usize> {
        self.replace(read_chain(path)?);
        Ok(self.len())
    }
}
