use crate::document_model::{Block, Document};

/// View Model - Abstracts document data for the view layer
/// This keeps the renderer away from the line store and its handles

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    /// Byte column within the line.
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub text: Vec<u8>,
    pub in_block: bool,
}

/// The ViewModel trait provides everything the view needs to render
/// without depending on Document internals
pub trait ViewModel {
    fn get_cursor_position(&self) -> CursorPosition;

    fn get_line_count(&self) -> usize;

    /// First document line shown in the text area.
    fn top_line(&self) -> usize;

    /// Up to `count` lines starting at `top_line`.
    fn visible_lines(&self, count: usize) -> Vec<DisplayLine>;

    fn filename(&self) -> String;

    fn is_modified(&self) -> bool;

    fn insert_mode(&self) -> bool;

    fn tab_width(&self) -> usize;
}

/// Concrete implementation that adapts Document and Block to ViewModel
pub struct DocumentViewModel<'a> {
    document: &'a Document,
    block: &'a Block,
}

impl<'a> DocumentViewModel<'a> {
    pub fn new(document: &'a Document, block: &'a Block) -> Self {
        Self { document, block }
    }
}

impl ViewModel for DocumentViewModel<'_> {
    fn get_cursor_position(&self) -> CursorPosition {
        CursorPosition {
            line: self.document.current_index().unwrap_or(0),
            column: self.document.cursor_x(),
        }
    }

    fn get_line_count(&self) -> usize {
        self.document.line_count()
    }

    fn top_line(&self) -> usize {
        self.document.viewport.top_line
    }

    fn visible_lines(&self, count: usize) -> Vec<DisplayLine> {
        let lines = self.document.lines();
        let Some(first) = lines.nth(self.top_line()) else {
            return Vec::new();
        };
        let Ok(iter) = lines.iter_from(first) else {
            return Vec::new();
        };
        iter.take(count)
            .map(|(id, line)| DisplayLine {
                text: line.text().to_vec(),
                in_block: self.block.is_in_block(self.document, id),
            })
            .collect()
    }

    fn filename(&self) -> String {
        self.document.filename.display().to_string()
    }

    fn is_modified(&self) -> bool {
        self.document.modified
    }

    fn insert_mode(&self) -> bool {
        self.document.insert_mode
    }

    fn tab_width(&self) -> usize {
        self.document.format.tab_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_window_and_block_flags() {
        let mut doc = Document::from_text(&["a", "b", "c", "d"]);
        let mut block = Block::new();
        doc.goto_line("2").unwrap();
        block.mark_begin(&doc);
        block.mark_end(&doc);
        doc.viewport.top_line = 1;

        let model = DocumentViewModel::new(&doc, &block);
        let lines = model.visible_lines(2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, b"b");
        assert!(lines[0].in_block);
        assert!(!lines[1].in_block);
        assert_eq!(model.get_cursor_position(), CursorPosition { line: 1, column: 0 });
    }
}
