/// Configuration subsystem - Editor settings and preferences
///
/// Loads margins, wrap and search defaults from a .wsrusrc file.

pub mod rc;

// Re-export public interface
pub use rc::{RcConfig, RcLoader};
