use super::document::Document;
use super::error::EditorResult;

/// The fixed whitespace predicate used for word motion and reflow.
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Column reached by skipping a run of non-space bytes then a run of spaces.
pub fn word_end_right(text: &[u8], from: usize) -> usize {
    let mut x = from.min(text.len());
    while x < text.len() && !is_space(text[x]) {
        x += 1;
    }
    while x < text.len() && is_space(text[x]) {
        x += 1;
    }
    x
}

/// Column reached by skipping spaces leftward, then the word before them.
pub fn word_start_left(text: &[u8], from: usize) -> usize {
    let mut x = from.min(text.len());
    while x > 0 && is_space(text[x - 1]) {
        x -= 1;
    }
    while x > 0 && !is_space(text[x - 1]) {
        x -= 1;
    }
    x
}

impl Document {
    /// Returns false when already at the start of the document.
    pub fn move_left(&mut self) -> EditorResult<bool> {
        if self.cursor_x() > 0 {
            self.set_cursor_x(self.cursor_x() - 1)?;
            return Ok(true);
        }
        match self.lines().prev(self.current_line_id())? {
            Some(prev) => {
                let len = self.lines().get(prev)?.len();
                self.set_position(prev, len)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn move_right(&mut self) -> EditorResult<bool> {
        if self.cursor_x() < self.current_line()?.len() {
            self.set_cursor_x(self.cursor_x() + 1)?;
            return Ok(true);
        }
        match self.lines().next(self.current_line_id())? {
            Some(next) => {
                self.set_position(next, 0)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn move_up(&mut self) -> EditorResult<bool> {
        match self.lines().prev(self.current_line_id())? {
            Some(prev) => {
                self.set_position(prev, self.cursor_x())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn move_down(&mut self) -> EditorResult<bool> {
        match self.lines().next(self.current_line_id())? {
            Some(next) => {
                self.set_position(next, self.cursor_x())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn move_word_left(&mut self) -> EditorResult<()> {
        let x = word_start_left(self.current_line()?.text(), self.cursor_x());
        self.set_cursor_x(x)
    }

    pub fn move_word_right(&mut self) -> EditorResult<()> {
        let x = word_end_right(self.current_line()?.text(), self.cursor_x());
        self.set_cursor_x(x)
    }

    pub fn move_line_start(&mut self) -> EditorResult<()> {
        self.set_cursor_x(0)
    }

    pub fn move_line_end(&mut self) -> EditorResult<()> {
        let len = self.current_line()?.len();
        self.set_cursor_x(len)
    }

    fn page_lines(&self) -> usize {
        self.viewport.height.saturating_sub(1).max(1)
    }

    pub fn move_page_up(&mut self) -> EditorResult<()> {
        let lines = self.page_lines();
        for _ in 0..lines {
            if !self.move_up()? {
                break;
            }
        }
        self.viewport.top_line = self.viewport.top_line.saturating_sub(lines);
        Ok(())
    }

    pub fn move_page_down(&mut self) -> EditorResult<()> {
        let lines = self.page_lines();
        for _ in 0..lines {
            if !self.move_down()? {
                break;
            }
        }
        let last = self.line_count() - 1;
        self.viewport.top_line = (self.viewport.top_line + lines).min(last);
        Ok(())
    }

    pub fn move_doc_start(&mut self) -> EditorResult<()> {
        let head = self.head();
        self.set_position(head, 0)?;
        self.viewport.top_line = 0;
        Ok(())
    }

    pub fn move_doc_end(&mut self) -> EditorResult<()> {
        if let Some(tail) = self.lines().tail() {
            let len = self.lines().get(tail)?.len();
            self.set_position(tail, len)?;
        }
        Ok(())
    }

    /// Shift the window up one line; the cursor follows only if it would
    /// fall off the bottom.
    pub fn scroll_up(&mut self) -> EditorResult<()> {
        if self.viewport.top_line == 0 {
            return Ok(());
        }
        self.viewport.top_line -= 1;
        let bottom = self.viewport.top_line + self.viewport.height.max(1);
        if self.current_index()? >= bottom {
            self.move_up()?;
        }
        Ok(())
    }

    pub fn scroll_down(&mut self) -> EditorResult<()> {
        if self.viewport.top_line + 1 >= self.line_count() {
            return Ok(());
        }
        self.viewport.top_line += 1;
        if self.current_index()? < self.viewport.top_line {
            self.move_down()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_right_cross_lines() {
        let mut doc = Document::from_text(&["ab", "cd"]);
        assert!(!doc.move_left().unwrap());
        doc.move_line_end().unwrap();
        assert!(doc.move_right().unwrap());
        assert_eq!(doc.current_text(), "cd");
        assert_eq!(doc.cursor_x(), 0);

        assert!(doc.move_left().unwrap());
        assert_eq!(doc.current_text(), "ab");
        assert_eq!(doc.cursor_x(), 2);
    }

    #[test]
    fn test_up_down_clamp_column() {
        let mut doc = Document::from_text(&["long line", "ab", "another long"]);
        doc.move_line_end().unwrap();
        doc.move_down().unwrap();
        assert_eq!(doc.cursor_x(), 2);
        doc.move_down().unwrap();
        // Clamping does not remember the wider column.
        assert_eq!(doc.cursor_x(), 2);
        assert!(!doc.move_down().unwrap());
        doc.move_up().unwrap();
        doc.move_up().unwrap();
        assert!(!doc.move_up().unwrap());
    }

    #[test]
    fn test_word_motion() {
        let mut doc = Document::from_text(&["foo  bar baz"]);
        doc.move_word_right().unwrap();
        assert_eq!(doc.cursor_x(), 5);
        doc.move_word_right().unwrap();
        assert_eq!(doc.cursor_x(), 9);
        doc.move_word_right().unwrap();
        assert_eq!(doc.cursor_x(), 12);
        doc.move_word_right().unwrap();
        assert_eq!(doc.cursor_x(), 12);

        doc.move_word_left().unwrap();
        assert_eq!(doc.cursor_x(), 9);
        doc.move_word_left().unwrap();
        assert_eq!(doc.cursor_x(), 5);
        doc.move_word_left().unwrap();
        assert_eq!(doc.cursor_x(), 0);
    }

    #[test]
    fn test_word_helpers() {
        assert_eq!(word_end_right(b"ab\tcd", 0), 3);
        assert_eq!(word_start_left(b"ab  ", 4), 0);
        assert_eq!(word_end_right(b"", 0), 0);
    }

    #[test]
    fn test_doc_start_end() {
        let mut doc = Document::from_text(&["first", "last line"]);
        doc.move_doc_end().unwrap();
        assert_eq!(doc.current_text(), "last line");
        assert_eq!(doc.cursor_x(), 9);
        doc.move_doc_start().unwrap();
        assert_eq!(doc.current_index().unwrap(), 0);
        assert_eq!(doc.cursor_x(), 0);
    }

    #[test]
    fn test_paging() {
        let lines: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let mut doc = Document::from_text(&refs);
        doc.set_page_height(5);

        doc.move_page_down().unwrap();
        assert_eq!(doc.current_index().unwrap(), 4);
        assert_eq!(doc.viewport.top_line, 4);
        doc.move_page_up().unwrap();
        assert_eq!(doc.current_index().unwrap(), 0);
        assert_eq!(doc.viewport.top_line, 0);
    }

    #[test]
    fn test_scrolling_drags_cursor_only_at_edge() {
        let lines: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let mut doc = Document::from_text(&refs);
        doc.set_page_height(3);

        doc.scroll_down().unwrap();
        assert_eq!(doc.viewport.top_line, 1);
        assert_eq!(doc.current_index().unwrap(), 1);

        doc.move_down().unwrap();
        doc.scroll_up().unwrap();
        assert_eq!(doc.viewport.top_line, 0);
        assert_eq!(doc.current_index().unwrap(), 2);
        doc.scroll_up().unwrap();
        assert_eq!(doc.viewport.top_line, 0);
    }
}
