/// View subsystem - Independent rendering and display management
///
/// The renderer only sees the document through the ViewModel trait.

pub mod renderer;
pub mod view_model;

// Re-export public interface
pub use renderer::{RenderParams, View};
pub use view_model::DocumentViewModel;
