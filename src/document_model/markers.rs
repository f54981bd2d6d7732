use super::error::{EditorError, EditorResult};
use super::line_store::LineId;

pub const MARKER_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub line: LineId,
    pub column: usize,
}

/// Ten numbered position slots (^K0-^K9 set, ^Q0-^Q9 jump).
///
/// Slots are not touched when their line is destroyed; a jump to such a
/// slot is detected through the stale line handle and clears it.
#[derive(Debug, Default)]
pub struct MarkerTable {
    slots: [Option<Marker>; MARKER_COUNT],
}

impl MarkerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, slot: usize, marker: Marker) -> EditorResult<()> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(EditorError::InvalidMarker(slot))?;
        *entry = Some(marker);
        Ok(())
    }

    pub fn get(&self, slot: usize) -> EditorResult<Marker> {
        match self.slots.get(slot) {
            Some(Some(marker)) => Ok(*marker),
            Some(None) => Err(EditorError::MarkerNotSet(slot)),
            None => Err(EditorError::InvalidMarker(slot)),
        }
    }

    pub fn clear(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = None;
        }
    }

    pub fn clear_all(&mut self) {
        self.slots = [None; MARKER_COUNT];
    }

    pub fn is_set(&self, slot: usize) -> bool {
        matches!(self.slots.get(slot), Some(Some(_)))
    }
}
