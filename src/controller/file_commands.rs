use crate::controller::command_types::FilePurpose;
use crate::controller::shared_state::{ModeTransition, SharedEditorState};
use crate::document_model::{EditorResult, read_file_into};
use std::path::Path;
use tracing::warn;

/// File command handlers for the ^K family
pub struct FileCommands;

impl FileCommands {
    pub fn save(shared: &mut SharedEditorState) -> EditorResult<()> {
        shared.document.save()?;
        shared.status_message = format!(
            "\"{}\" {} line(s) written",
            shared.document.filename.display(),
            shared.document.line_count()
        );
        Ok(())
    }

    /// ^KX: quit only once the save went through.
    pub fn save_and_exit(shared: &mut SharedEditorState) -> ModeTransition {
        match Self::save(shared) {
            Ok(()) => ModeTransition::Quit,
            Err(e) => {
                warn!(error = %e, "save before exit failed");
                shared.status_message = e.to_string();
                ModeTransition::Stay
            }
        }
    }

    /// Apply a filename typed at a file prompt.
    pub fn commit(
        shared: &mut SharedEditorState,
        purpose: FilePurpose,
        name: &str,
    ) -> EditorResult<()> {
        let name = name.trim();
        if name.is_empty() {
            shared.status_message = "No filename given".to_string();
            return Ok(());
        }
        let path = Path::new(name);
        match purpose {
            FilePurpose::SaveDocument => {
                shared.document.save_as(path)?;
                shared.status_message = format!("\"{name}\" written");
            }
            FilePurpose::WriteBlock => {
                let count = shared.block.write(&shared.document, path)?;
                shared.status_message = format!("{count} line(s) written to \"{name}\"");
            }
            FilePurpose::ReadBlock => {
                let count = read_file_into(&mut shared.document, path)?;
                shared.status_message = format!("{count} line(s) read from \"{name}\"");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::{Document, EditorError};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_save_as_then_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        let mut shared = SharedEditorState::new(Document::from_text(&["x", "y"]));
        FileCommands::commit(&mut shared, FilePurpose::SaveDocument, path.to_str().unwrap())
            .unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"x\r\ny");

        shared.document.insert_char(b'z').unwrap();
        FileCommands::save(&mut shared).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"zx\r\ny");
        assert!(!shared.document.modified);
    }

    #[test]
    fn test_save_and_exit_stays_on_failure() {
        let dir = tempdir().unwrap();
        let mut shared = SharedEditorState::new(Document::new());
        shared.document.filename = dir.path().join("missing").join("f.txt");
        assert_eq!(FileCommands::save_and_exit(&mut shared), ModeTransition::Stay);
        assert!(shared.status_message.starts_with("Cannot access"));

        shared.document.filename = dir.path().join("f.txt");
        assert_eq!(FileCommands::save_and_exit(&mut shared), ModeTransition::Quit);
    }

    #[test]
    fn test_write_block_requires_block() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("b.txt");
        let mut shared = SharedEditorState::new(Document::new());
        assert!(matches!(
            FileCommands::commit(&mut shared, FilePurpose::WriteBlock, path.to_str().unwrap()),
            Err(EditorError::NoBlock)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_read_block() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.txt");
        fs::write(&path, "p\r\nq").unwrap();
        let mut shared = SharedEditorState::new(Document::from_text(&["a"]));
        FileCommands::commit(&mut shared, FilePurpose::ReadBlock, path.to_str().unwrap())
            .unwrap();
        assert_eq!(shared.document.texts(), vec!["a", "p", "q"]);
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let mut shared = SharedEditorState::new(Document::new());
        FileCommands::commit(&mut shared, FilePurpose::SaveDocument, "  ").unwrap();
        assert_eq!(shared.status_message, "No filename given");
    }
}
