use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the document model and the command engine.
///
/// Every variant is recoverable: the controller turns it into a one-line
/// status message and the document stays in its last good state.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A line handle points at an arena slot that was freed or reused.
    #[error("Reference to a deleted line")]
    StaleReference,

    #[error("Out of memory growing line buffer")]
    Allocation(#[from] TryReserveError),

    #[error("No block marked")]
    NoBlock,

    #[error("Empty search pattern")]
    EmptyPattern,

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("Marker {0} not set")]
    MarkerNotSet(usize),

    #[error("Invalid marker {0}")]
    InvalidMarker(usize),

    #[error("Invalid line number: {0}")]
    InvalidLineNumber(String),
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EditorError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
