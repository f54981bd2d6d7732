/// Controller subsystem - Handles all user input and command execution
///
/// Keys go through the two-level state machine in `key_handler`; the
/// resulting actions are carried out by the command modules.

pub mod block_commands;
pub mod command_types;
pub mod edit_commands;
pub mod editor;
pub mod file_commands;
pub mod help;
pub mod key_handler;
pub mod search_commands;
pub mod shared_state;

// Re-export public interface
pub use editor::EditorController;
pub use shared_state::SharedEditorState;
