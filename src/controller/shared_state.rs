use crate::document_model::{Block, Clipboard, Document, FindReplace};

/// State every command handler needs access to
pub struct SharedEditorState {
    pub document: Document,
    pub block: Block,
    pub clipboard: Clipboard,
    pub find_replace: FindReplace,
    pub status_message: String,
    pub capture: String,
}

impl SharedEditorState {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            block: Block::new(),
            clipboard: Clipboard::new(),
            find_replace: FindReplace::new(),
            status_message: String::new(),
            capture: String::new(),
        }
    }
}

/// Result of handling a key event
#[derive(Debug, PartialEq)]
pub enum ModeTransition {
    Stay,
    Quit,
}
