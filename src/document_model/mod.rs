/// Document model subsystem - line storage and text operations
///
/// Holds the line arena, the document with its cursor and markers, block
/// and clipboard handling, find/replace and paragraph formatting.

pub mod block;
pub mod document;
pub mod error;
pub mod find_replace;
pub mod format;
pub mod line_store;
pub mod markers;
pub mod movement;

#[cfg(test)]
mod properties;

// Re-export main types for convenience
pub use block::{Block, Clipboard, read_file_into};
pub use document::Document;
pub use error::{EditorError, EditorResult};
pub use find_replace::{FindOutcome, FindReplace, ReplaceOutcome};
pub use format::FormatSettings;
