use super::error::{EditorError, EditorResult};
use slab::Slab;
use std::ops::Range;

const INITIAL_CAPACITY: usize = 16;

/// One editable text record. Text is kept as raw bytes: control bytes used
/// as print markers are inert content like any other byte.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Line {
    text: Vec<u8>,
}

impl Line {
    pub fn new() -> Self {
        Self {
            text: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> EditorResult<Self> {
        let mut line = Self { text: Vec::new() };
        line.reserve(bytes.len().max(INITIAL_CAPACITY))?;
        line.text.extend_from_slice(bytes);
        Ok(line)
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.text.capacity()
    }

    /// Deep copy; fails instead of aborting when memory runs out.
    pub fn duplicate(&self) -> EditorResult<Line> {
        Line::from_bytes(&self.text)
    }

    // Vec::try_reserve grows geometrically, so repeated single-byte inserts
    // stay amortized O(1).
    fn reserve(&mut self, additional: usize) -> EditorResult<()> {
        self.text.try_reserve(additional)?;
        Ok(())
    }

    pub fn insert(&mut self, column: usize, byte: u8) -> EditorResult<()> {
        let column = column.min(self.text.len());
        self.reserve(1)?;
        self.text.insert(column, byte);
        Ok(())
    }

    /// Replace the byte at `column`, or append when `column` is at the end.
    pub fn overwrite(&mut self, column: usize, byte: u8) -> EditorResult<()> {
        if column >= self.text.len() {
            self.reserve(1)?;
            self.text.push(byte);
        } else {
            self.text[column] = byte;
        }
        Ok(())
    }

    pub fn insert_bytes(&mut self, column: usize, bytes: &[u8]) -> EditorResult<()> {
        let column = column.min(self.text.len());
        self.reserve(bytes.len())?;
        self.text.splice(column..column, bytes.iter().copied());
        Ok(())
    }

    pub fn append(&mut self, bytes: &[u8]) -> EditorResult<()> {
        self.reserve(bytes.len())?;
        self.text.extend_from_slice(bytes);
        Ok(())
    }

    pub fn remove(&mut self, column: usize) -> Option<u8> {
        if column < self.text.len() {
            Some(self.text.remove(column))
        } else {
            None
        }
    }

    pub fn remove_range(&mut self, range: Range<usize>) {
        let end = range.end.min(self.text.len());
        let start = range.start.min(end);
        self.text.drain(start..end);
    }

    /// Cut the line at `column`, returning the tail.
    pub fn split_off(&mut self, column: usize) -> EditorResult<Line> {
        let column = column.min(self.text.len());
        let tail = Line::from_bytes(&self.text[column..])?;
        self.text.truncate(column);
        Ok(tail)
    }

    pub fn set_text(&mut self, bytes: &[u8]) -> EditorResult<()> {
        self.text.clear();
        self.reserve(bytes.len())?;
        self.text.extend_from_slice(bytes);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

/// An owned run of lines that is not linked into any store.
///
/// Produced by `duplicate_range` and `splice_out`, consumed by `splice_in`.
#[derive(Debug, Default)]
pub struct LineChain {
    lines: Vec<Line>,
}

impl LineChain {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    pub fn duplicate(&self) -> EditorResult<LineChain> {
        let mut lines = Vec::new();
        lines.try_reserve(self.lines.len())?;
        for line in &self.lines {
            lines.push(line.duplicate()?);
        }
        Ok(Self { lines })
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }
}

/// Handle to a node in a `LineStore`.
///
/// The generation stamp makes a handle to a freed (or freed and reused)
/// slot detectable instead of silently aliasing another line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId {
    key: usize,
    generation: u64,
}

#[derive(Debug)]
struct Node {
    line: Line,
    generation: u64,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Arena holding one doubly linked chain of lines.
///
/// Links are slab keys, so split/join/splice are index rewrites.
#[derive(Debug, Default)]
pub struct LineStore {
    nodes: Slab<Node>,
    head: Option<usize>,
    tail: Option<usize>,
    next_generation: u64,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn head(&self) -> Option<LineId> {
        self.head.map(|key| self.id_of(key))
    }

    pub fn tail(&self) -> Option<LineId> {
        self.tail.map(|key| self.id_of(key))
    }

    pub fn contains(&self, id: LineId) -> bool {
        self.resolve(id).is_ok()
    }

    pub fn get(&self, id: LineId) -> EditorResult<&Line> {
        let key = self.resolve(id)?;
        Ok(&self.nodes[key].line)
    }

    pub fn get_mut(&mut self, id: LineId) -> EditorResult<&mut Line> {
        let key = self.resolve(id)?;
        Ok(&mut self.nodes[key].line)
    }

    pub fn next(&self, id: LineId) -> EditorResult<Option<LineId>> {
        let key = self.resolve(id)?;
        Ok(self.nodes[key].next.map(|k| self.id_of(k)))
    }

    pub fn prev(&self, id: LineId) -> EditorResult<Option<LineId>> {
        let key = self.resolve(id)?;
        Ok(self.nodes[key].prev.map(|k| self.id_of(k)))
    }

    fn id_of(&self, key: usize) -> LineId {
        LineId {
            key,
            generation: self.nodes[key].generation,
        }
    }

    fn resolve(&self, id: LineId) -> EditorResult<usize> {
        match self.nodes.get(id.key) {
            Some(node) if node.generation == id.generation => Ok(id.key),
            _ => Err(EditorError::StaleReference),
        }
    }

    fn alloc(&mut self, line: Line) -> usize {
        self.next_generation += 1;
        self.nodes.insert(Node {
            line,
            generation: self.next_generation,
            prev: None,
            next: None,
        })
    }

    // Wire `key` in right after `after`, or in front of the head when `after`
    // is None.
    fn link_after(&mut self, after: Option<usize>, key: usize) {
        let next = match after {
            Some(a) => self.nodes[a].next,
            None => self.head,
        };
        self.nodes[key].prev = after;
        self.nodes[key].next = next;
        match after {
            Some(a) => self.nodes[a].next = Some(key),
            None => self.head = Some(key),
        }
        match next {
            Some(n) => self.nodes[n].prev = Some(key),
            None => self.tail = Some(key),
        }
    }

    fn unlink(&mut self, first: usize, last: usize) {
        let before = self.nodes[first].prev;
        let after = self.nodes[last].next;
        match before {
            Some(b) => self.nodes[b].next = after,
            None => self.head = after,
        }
        match after {
            Some(a) => self.nodes[a].prev = before,
            None => self.tail = before,
        }
        self.nodes[first].prev = None;
        self.nodes[last].next = None;
    }

    pub fn push_back(&mut self, line: Line) -> LineId {
        let key = self.alloc(line);
        let tail = self.tail;
        self.link_after(tail, key);
        self.id_of(key)
    }

    /// Break `id` at `column`; the tail becomes a new node right after it.
    pub fn split(&mut self, id: LineId, column: usize) -> EditorResult<LineId> {
        let key = self.resolve(id)?;
        let tail = self.nodes[key].line.split_off(column)?;
        let new_key = self.alloc(tail);
        self.link_after(Some(key), new_key);
        Ok(self.id_of(new_key))
    }

    /// Append the successor's text to `id` and destroy the successor.
    /// Returns false when `id` is the last line.
    pub fn join(&mut self, id: LineId) -> EditorResult<bool> {
        let key = self.resolve(id)?;
        let Some(next) = self.nodes[key].next else {
            return Ok(false);
        };
        // Grow first so a failed allocation leaves both lines intact.
        let extra = self.nodes[next].line.len();
        self.nodes[key].line.reserve(extra)?;
        self.unlink(next, next);
        let removed = self.nodes.remove(next);
        self.nodes[key].line.append(removed.line.text())?;
        Ok(true)
    }

    /// Unlink and destroy a single node, handing back its text.
    pub fn remove(&mut self, id: LineId) -> EditorResult<Line> {
        let key = self.resolve(id)?;
        self.unlink(key, key);
        Ok(self.nodes.remove(key).line)
    }

    /// Deep-copy `start..=end` into a new chain. Stops at the end of the
    /// store if `end` is never reached.
    pub fn duplicate_range(&self, start: LineId, end: LineId) -> EditorResult<LineChain> {
        let mut key = Some(self.resolve(start)?);
        let end = self.resolve(end)?;
        let mut chain = LineChain::new();
        while let Some(k) = key {
            chain.push(self.nodes[k].line.duplicate()?);
            if k == end {
                break;
            }
            key = self.nodes[k].next;
        }
        Ok(chain)
    }

    /// Link every line of `chain` in after `after` (or at the head when
    /// None). Returns the first and last inserted ids.
    pub fn splice_in(
        &mut self,
        after: Option<LineId>,
        chain: LineChain,
    ) -> EditorResult<Option<(LineId, LineId)>> {
        let mut cursor = match after {
            Some(id) => Some(self.resolve(id)?),
            None => None,
        };
        let mut first = None;
        for line in chain.into_lines() {
            let key = self.alloc(line);
            self.link_after(cursor, key);
            first.get_or_insert(key);
            cursor = Some(key);
        }
        Ok(match (first, cursor) {
            (Some(f), Some(l)) => Some((self.id_of(f), self.id_of(l))),
            _ => None,
        })
    }

    /// Remove `start..=end` from the chain and return it detached. Runs to
    /// the tail if `end` is never reached.
    pub fn splice_out(&mut self, start: LineId, end: LineId) -> EditorResult<LineChain> {
        let first = self.resolve(start)?;
        let end = self.resolve(end)?;
        let mut keys = Vec::new();
        let mut key = Some(first);
        while let Some(k) = key {
            keys.push(k);
            if k == end {
                break;
            }
            key = self.nodes[k].next;
        }
        let last = keys[keys.len() - 1];
        self.unlink(first, last);
        let lines = keys.into_iter().map(|k| self.nodes.remove(k).line).collect();
        Ok(LineChain::from_lines(lines))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            store: self,
            key: self.head,
        }
    }

    pub fn iter_from(&self, id: LineId) -> EditorResult<Iter<'_>> {
        Ok(Iter {
            store: self,
            key: Some(self.resolve(id)?),
        })
    }

    /// Zero-based ordinal of `id` in the chain.
    pub fn index_of(&self, id: LineId) -> EditorResult<usize> {
        let target = self.resolve(id)?;
        self.iter()
            .position(|(candidate, _)| candidate.key == target)
            .ok_or(EditorError::StaleReference)
    }

    pub fn nth(&self, index: usize) -> Option<LineId> {
        self.iter().nth(index).map(|(id, _)| id)
    }

    /// True when `b` is reachable from `a` by following next links.
    pub fn precedes_or_equal(&self, a: LineId, b: LineId) -> EditorResult<bool> {
        let target = self.resolve(b)?;
        Ok(self.iter_from(a)?.any(|(id, _)| id.key == target))
    }

    /// Walks the chain checking link symmetry and that the node count matches.
    #[cfg(test)]
    pub fn check_links(&self) -> bool {
        let mut prev: Option<usize> = None;
        let mut key = self.head;
        let mut seen = 0;
        while let Some(k) = key {
            if self.nodes[k].prev != prev || seen > self.nodes.len() {
                return false;
            }
            seen += 1;
            prev = Some(k);
            key = self.nodes[k].next;
        }
        self.tail == prev && seen == self.nodes.len()
    }
}

pub struct Iter<'a> {
    store: &'a LineStore,
    key: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (LineId, &'a Line);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.key?;
        let node = &self.store.nodes[key];
        self.key = node.next;
        Some((self.store.id_of(key), &node.line))
    }
}
