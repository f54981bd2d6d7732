use crate::controller::command_types::Action;
use crate::controller::shared_state::SharedEditorState;
use crate::document_model::{EditorError, EditorResult};

/// Block, clipboard and marker commands from the ^K and ^Q families
pub struct BlockCommands;

impl BlockCommands {
    /// Returns false when `action` is not a block or marker command.
    pub fn execute(action: Action, shared: &mut SharedEditorState) -> EditorResult<bool> {
        let SharedEditorState {
            document,
            block,
            clipboard,
            status_message,
            ..
        } = shared;

        match action {
            Action::BlockBegin => {
                block.mark_begin(document);
                *status_message = "Block begin marked".to_string();
            }
            Action::BlockEnd => {
                block.mark_end(document);
                *status_message = "Block end marked".to_string();
            }
            Action::BlockCopy => {
                let count = block.copy(document, clipboard)?;
                *status_message = format!("{count} line(s) copied");
            }
            Action::BlockMove => {
                let count = block.move_to_cursor(document, clipboard)?;
                *status_message = format!("{count} line(s) moved");
            }
            Action::BlockDelete => {
                let count = block.delete(document)?;
                *status_message = format!("{count} line(s) deleted");
            }
            Action::BlockPaste => {
                if clipboard.is_empty() {
                    *status_message = "Clipboard is empty".to_string();
                } else {
                    let count = clipboard.paste(document)?;
                    *status_message = format!("{count} line(s) pasted");
                }
            }
            Action::BlockHide => block.hide(),
            Action::GotoBlockBegin => block.goto_begin(document)?,
            Action::GotoBlockEnd => block.goto_end(document)?,
            Action::SetMarker(slot) => {
                document.set_marker(slot)?;
                *status_message = format!("Marker {slot} set");
            }
            Action::GotoMarker(slot) => match document.goto_marker(slot) {
                Err(EditorError::StaleReference) => {
                    *status_message = format!("Marker {slot} line was deleted");
                }
                other => other?,
            },
            _ => return Ok(false),
        }
        Ok(true)
    }
}
