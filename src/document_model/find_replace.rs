use super::document::Document;
use super::error::{EditorError, EditorResult};
use super::line_store::LineId;
use regex::bytes::Regex;
use tracing::debug;

/// Longest pattern or replacement accepted from the prompt.
pub const MAX_PATTERN_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub backward: bool,
    pub global: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            backward: false,
            global: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindOutcome {
    Found,
    FoundAfterWrap,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// One match replaced, followed by a search for the next one.
    Replaced(FindOutcome),
    /// The cursor was not on a match; only the search ran.
    NotAtMatch(FindOutcome),
    /// Global mode: every match in the document replaced.
    ReplacedAll(usize),
}

#[derive(Debug, Default)]
pub struct FindReplace {
    pattern: String,
    replacement: String,
    pub options: FindOptions,
}

impl FindReplace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn set_pattern(&mut self, pattern: &str) {
        self.pattern = truncate(pattern);
    }

    pub fn set_replacement(&mut self, replacement: &str) {
        self.replacement = truncate(replacement);
    }

    fn matcher(&self) -> EditorResult<Regex> {
        if self.pattern.is_empty() {
            return Err(EditorError::EmptyPattern);
        }
        let mut expr = regex::escape(&self.pattern);
        if self.options.whole_word {
            expr = format!(r"(?-u:\b){expr}(?-u:\b)");
        }
        if !self.options.case_sensitive {
            expr = format!("(?i){expr}");
        }
        Regex::new(&expr).map_err(|e| EditorError::InvalidPattern(e.to_string()))
    }

    /// Search from just past the cursor (or just before it when searching
    /// backward), wrapping around once. The line the search started on is
    /// not revisited after the wrap.
    pub fn find(&self, doc: &mut Document) -> EditorResult<FindOutcome> {
        let regex = self.matcher()?;
        let start = doc.current_line_id();
        let x = doc.cursor_x();

        let hit = if self.options.backward {
            find_backward(&regex, doc, start, x)?
        } else {
            find_forward(&regex, doc, start, x)?
        };
        let outcome = match hit {
            Some((id, column, wrapped)) => {
                doc.set_position(id, column)?;
                if wrapped {
                    FindOutcome::FoundAfterWrap
                } else {
                    FindOutcome::Found
                }
            }
            None => FindOutcome::NotFound,
        };
        debug!(pattern = %self.pattern, ?outcome, "find");
        Ok(outcome)
    }

    /// Replace the match under the cursor and search for the next one.
    pub fn replace(&self, doc: &mut Document) -> EditorResult<ReplaceOutcome> {
        let regex = self.matcher()?;
        if self.options.global {
            return self.replace_all(&regex, doc).map(ReplaceOutcome::ReplacedAll);
        }

        let x = doc.cursor_x();
        let span = regex
            .find_at(doc.current_line()?.text(), x)
            .filter(|m| m.start() == x)
            .map(|m| m.range());
        let Some(span) = span else {
            return self.find(doc).map(ReplaceOutcome::NotAtMatch);
        };

        let replacement = self.replacement.as_bytes();
        let line = doc.current_line_mut()?;
        line.remove_range(span.clone());
        line.insert_bytes(span.start, replacement)?;
        doc.modified = true;
        // Backward searches resume from the start of the replaced text.
        let resume = if self.options.backward {
            span.start
        } else {
            span.start + replacement.len()
        };
        doc.set_cursor_x(resume)?;
        self.find(doc).map(ReplaceOutcome::Replaced)
    }

    fn replace_all(&self, regex: &Regex, doc: &mut Document) -> EditorResult<usize> {
        let replacement = self.replacement.as_bytes();
        let ids: Vec<LineId> = doc.lines().iter().map(|(id, _)| id).collect();
        let mut total = 0;
        let mut last_hit = None;

        for id in ids {
            let text = doc.lines().get(id)?.text();
            let mut rebuilt = Vec::new();
            let mut copied = 0;
            let mut end_of_last = None;
            for m in regex.find_iter(text) {
                rebuilt.extend_from_slice(&text[copied..m.start()]);
                rebuilt.extend_from_slice(replacement);
                copied = m.end();
                end_of_last = Some(rebuilt.len());
                total += 1;
            }
            if let Some(column) = end_of_last {
                rebuilt.extend_from_slice(&text[copied..]);
                doc.lines_mut().get_mut(id)?.set_text(&rebuilt)?;
                last_hit = Some((id, column));
            }
        }

        if let Some((id, column)) = last_hit {
            doc.set_position(id, column)?;
            doc.modified = true;
        }
        debug!(pattern = %self.pattern, total, "replace all");
        Ok(total)
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_PATTERN_LEN).collect()
}

fn find_forward(
    regex: &Regex,
    doc: &Document,
    start: LineId,
    x: usize,
) -> EditorResult<Option<(LineId, usize, bool)>> {
    let lines = doc.lines();
    let text = lines.get(start)?.text();
    let from = x + 1;
    if from <= text.len() {
        if let Some(m) = regex.find_at(text, from) {
            return Ok(Some((start, m.start(), false)));
        }
    }

    for (id, line) in lines.iter_from(start)?.skip(1) {
        if let Some(m) = regex.find(line.text()) {
            return Ok(Some((id, m.start(), false)));
        }
    }

    for (id, line) in lines.iter() {
        if id == start {
            break;
        }
        if let Some(m) = regex.find(line.text()) {
            return Ok(Some((id, m.start(), true)));
        }
    }
    Ok(None)
}

fn last_match_before(regex: &Regex, text: &[u8], limit: usize) -> Option<usize> {
    regex
        .find_iter(text)
        .map(|m| m.start())
        .take_while(|start| *start < limit)
        .last()
}

fn find_backward(
    regex: &Regex,
    doc: &Document,
    start: LineId,
    x: usize,
) -> EditorResult<Option<(LineId, usize, bool)>> {
    let lines = doc.lines();
    if let Some(column) = last_match_before(regex, lines.get(start)?.text(), x) {
        return Ok(Some((start, column, false)));
    }

    let mut cursor = lines.prev(start)?;
    while let Some(id) = cursor {
        let text = lines.get(id)?.text();
        if let Some(column) = last_match_before(regex, text, text.len() + 1) {
            return Ok(Some((id, column, false)));
        }
        cursor = lines.prev(id)?;
    }

    let mut cursor = lines.tail();
    while let Some(id) = cursor {
        if id == start {
            break;
        }
        let text = lines.get(id)?.text();
        if let Some(column) = last_match_before(regex, text, text.len() + 1) {
            return Ok(Some((id, column, true)));
        }
        cursor = lines.prev(id)?;
    }
    Ok(None)
}
