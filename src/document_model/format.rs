use super::document::Document;
use super::error::EditorResult;
use super::line_store::{Line, LineChain};
use super::movement::is_space;
use tracing::debug;

/// Margin and layout settings. Margins are 1-based columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSettings {
    pub left_margin: usize,
    pub right_margin: usize,
    pub paragraph_margin: usize,
    pub tab_width: usize,
    pub word_wrap: bool,
    pub justify: bool,
    pub line_spacing: usize,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            left_margin: 1,
            right_margin: 65,
            paragraph_margin: 1,
            tab_width: 8,
            word_wrap: true,
            justify: false,
            line_spacing: 1,
        }
    }
}

impl FormatSettings {
    fn indent(margin: usize) -> Vec<u8> {
        vec![b' '; margin.saturating_sub(1)]
    }
}

/// Pad the gaps of `words` so the packed line reaches `width` bytes.
fn justify_line(prefix: &[u8], words: &[&[u8]], width: usize) -> Vec<u8> {
    let mut out = prefix.to_vec();
    let gaps = words.len().saturating_sub(1);
    let text_len: usize = words.iter().map(|w| w.len()).sum();
    let used = prefix.len() + text_len;
    if gaps == 0 || used + gaps >= width {
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                out.push(b' ');
            }
            out.extend_from_slice(word);
        }
        return out;
    }
    let spaces = width - used;
    let (base, extra) = (spaces / gaps, spaces % gaps);
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            let pad = base + usize::from(i <= extra);
            out.extend(std::iter::repeat_n(b' ', pad));
        }
        out.extend_from_slice(word);
    }
    out
}

/// Greedily pack `words` into lines no wider than `settings.right_margin`.
/// A word that does not fit even on an empty line gets a line of its own.
fn pack_words(words: &[&[u8]], settings: &FormatSettings) -> Vec<Vec<u8>> {
    let width = settings.right_margin;
    let mut packed: Vec<Vec<&[u8]>> = Vec::new();
    let mut prefixes: Vec<Vec<u8>> = Vec::new();
    let mut current: Vec<&[u8]> = Vec::new();
    let mut prefix = FormatSettings::indent(settings.paragraph_margin);
    let mut len = prefix.len();

    for word in words {
        let needed = if current.is_empty() {
            word.len()
        } else {
            word.len() + 1
        };
        if !current.is_empty() && len + needed > width {
            packed.push(std::mem::take(&mut current));
            prefixes.push(std::mem::replace(
                &mut prefix,
                FormatSettings::indent(settings.left_margin),
            ));
            len = prefix.len();
            current.push(word);
            len += word.len();
        } else {
            current.push(word);
            len += needed;
        }
    }
    packed.push(current);
    prefixes.push(prefix);

    let last = packed.len() - 1;
    packed
        .iter()
        .zip(prefixes.iter())
        .enumerate()
        .map(|(i, (words, prefix))| {
            if settings.justify && i < last {
                justify_line(prefix, words, width)
            } else {
                let mut out = prefix.clone();
                for (j, word) in words.iter().enumerate() {
                    if j > 0 {
                        out.push(b' ');
                    }
                    out.extend_from_slice(word);
                }
                out
            }
        })
        .collect()
}

impl Document {
    /// Wrap the current line once an insertion made it longer than the right
    /// margin. Breaks at the rightmost space that keeps the head inside the
    /// margin, or just after an overlong word when there is none. The moved
    /// text is checked again, so one insertion can wrap several times. The
    /// cursor follows its character to whichever side of a break it lands.
    pub(crate) fn wrap_check(&mut self) -> EditorResult<bool> {
        let settings = self.format;
        let lowest = settings.left_margin.saturating_sub(1).max(1);
        let indent = FormatSettings::indent(settings.left_margin);
        let mut id = self.current_line_id();
        let mut wrapped = false;

        loop {
            let text = self.lines().get(id)?.text();
            if text.len() <= settings.right_margin {
                break;
            }
            let highest = settings.right_margin.min(text.len() - 1);
            let break_at = (lowest..=highest)
                .rev()
                .find(|&i| text[i] == b' ')
                .or_else(|| (lowest.max(highest + 1)..text.len()).find(|&i| text[i] == b' '));
            let Some(break_at) = break_at else {
                break;
            };

            let tail = self.lines_mut().split(id, break_at)?;
            let moved = self.lines_mut().get_mut(tail)?;
            // Drop the space the line was broken at.
            moved.remove(0);
            moved.insert_bytes(0, &indent)?;
            self.adjust_line_count(1, 0);
            let x = self.cursor_x();
            if self.current_line_id() == id && x > break_at {
                self.set_position(tail, indent.len() + x - (break_at + 1))?;
            }
            debug!(column = break_at, "word wrap");
            wrapped = true;
            id = tail;
        }
        Ok(wrapped)
    }

    /// Rewrap the run of non-empty lines around the cursor between the
    /// margins. Interior runs of spaces collapse to one.
    pub fn reform_paragraph(&mut self) -> EditorResult<()> {
        if self.current_line()?.is_empty() {
            self.move_down()?;
            return Ok(());
        }

        let mut first = self.current_line_id();
        while let Some(prev) = self.lines().prev(first)? {
            if self.lines().get(prev)?.is_empty() {
                break;
            }
            first = prev;
        }
        let mut last = self.current_line_id();
        while let Some(next) = self.lines().next(last)? {
            if self.lines().get(next)?.is_empty() {
                break;
            }
            last = next;
        }

        let mut scratch: Vec<u8> = Vec::new();
        for (id, line) in self.lines().iter_from(first)? {
            if !scratch.is_empty() {
                scratch.push(b' ');
            }
            scratch.extend_from_slice(line.text());
            if id == last {
                break;
            }
        }
        let words: Vec<&[u8]> = scratch
            .split(|b| is_space(*b))
            .filter(|w| !w.is_empty())
            .collect();
        let settings = self.format;
        let packed = if words.is_empty() {
            vec![Vec::new()]
        } else {
            pack_words(&words, &settings)
        };

        if let Some(second) = self.lines().next(first)?.filter(|_| first != last) {
            let removed = self.lines_mut().splice_out(second, last)?;
            self.adjust_line_count(0, removed.len());
        }

        let mut packed = packed.into_iter();
        if let Some(head) = packed.next() {
            self.lines_mut().get_mut(first)?.set_text(&head)?;
        }
        let mut rest = LineChain::new();
        for text in packed {
            for _ in 1..settings.line_spacing.max(1) {
                rest.push(Line::new());
            }
            rest.push(Line::from_bytes(&text)?);
        }
        let added = rest.len();
        let mut end = first;
        if let Some((_, tail)) = self.lines_mut().splice_in(Some(first), rest)? {
            end = tail;
        }
        self.adjust_line_count(added, 0);
        self.modified = true;

        match self.lines().next(end)? {
            Some(after) => self.set_position(after, 0)?,
            None => {
                let len = self.lines().get(end)?.len();
                self.set_position(end, len)?;
            }
        }
        debug!(lines = added + 1, "reformed paragraph");
        Ok(())
    }

    pub fn center_line(&mut self) -> EditorResult<()> {
        let settings = self.format;
        let text = self.current_line()?.text();
        let start = text.iter().position(|b| !is_space(*b)).unwrap_or(text.len());
        let end = text
            .iter()
            .rposition(|b| !is_space(*b))
            .map_or(start, |i| i + 1);
        let trimmed = text[start..end].to_vec();

        let room = settings.right_margin as isize
            - settings.left_margin as isize
            - trimmed.len() as isize;
        let padding = (room / 2).max(0) as usize;
        let mut centered = FormatSettings::indent(settings.left_margin);
        centered.extend(std::iter::repeat_n(b' ', padding));
        centered.extend_from_slice(&trimmed);

        self.current_line_mut()?.set_text(&centered)?;
        let x = self.cursor_x();
        self.set_cursor_x(x)?;
        self.modified = true;
        Ok(())
    }
}
