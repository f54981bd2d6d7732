use crate::controller::command_types::Action;
use crate::controller::shared_state::SharedEditorState;
use crate::document_model::EditorResult;

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

/// Text entry, cursor motion and formatting commands
pub struct EditCommands;

impl EditCommands {
    /// Returns false when `action` is not one of ours.
    pub fn execute(action: Action, shared: &mut SharedEditorState) -> EditorResult<bool> {
        let doc = &mut shared.document;
        match action {
            Action::InsertChar(c) => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    doc.insert_char(b)?;
                }
            }
            Action::InsertControl(b) => doc.insert_marker_byte(b)?,
            Action::NewLine => doc.new_line()?,
            Action::Tab => doc.insert_tab()?,
            Action::Backspace => doc.backspace()?,
            Action::DeleteChar => doc.delete_char()?,
            Action::DeleteWordRight => doc.delete_word_right()?,
            Action::DeleteLine => doc.delete_line()?,
            Action::DeleteToEol => doc.delete_to_eol()?,
            Action::SplitLine => doc.split_line()?,
            Action::ToggleInsert => {
                doc.insert_mode = !doc.insert_mode;
                shared.status_message = if doc.insert_mode {
                    "Insert mode".to_string()
                } else {
                    "Overwrite mode".to_string()
                };
            }

            Action::MoveLeft => {
                doc.move_left()?;
            }
            Action::MoveRight => {
                doc.move_right()?;
            }
            Action::MoveUp => {
                doc.move_up()?;
            }
            Action::MoveDown => {
                doc.move_down()?;
            }
            Action::WordLeft => doc.move_word_left()?,
            Action::WordRight => doc.move_word_right()?,
            Action::LineStart => doc.move_line_start()?,
            Action::LineEnd => doc.move_line_end()?,
            Action::PageUp => doc.move_page_up()?,
            Action::PageDown => doc.move_page_down()?,
            Action::ScrollUp => doc.scroll_up()?,
            Action::ScrollDown => doc.scroll_down()?,
            Action::DocStart => doc.move_doc_start()?,
            Action::DocEnd => doc.move_doc_end()?,

            Action::ReformParagraph => doc.reform_paragraph()?,
            Action::CenterLine => doc.center_line()?,
            Action::ToggleWordWrap => {
                doc.format.word_wrap = !doc.format.word_wrap;
                shared.status_message = format!("Word wrap {}", on_off(doc.format.word_wrap));
            }
            Action::ToggleAutoIndent => {
                doc.auto_indent = !doc.auto_indent;
                shared.status_message = format!("Auto-indent {}", on_off(doc.auto_indent));
            }
            Action::ToggleJustify => {
                doc.format.justify = !doc.format.justify;
                shared.status_message = format!("Justify {}", on_off(doc.format.justify));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::Document;

    fn shared_with(lines: &[&str]) -> SharedEditorState {
        SharedEditorState::new(Document::from_text(lines))
    }

    #[test]
    fn test_insert_multibyte_char() {
        let mut shared = shared_with(&[""]);
        EditCommands::execute(Action::InsertChar('é'), &mut shared).unwrap();
        assert_eq!(shared.document.current_line().unwrap().text(), "é".as_bytes());
        assert_eq!(shared.document.cursor_x(), 2);
    }

    #[test]
    fn test_toggles_report_status() {
        let mut shared = shared_with(&[""]);
        EditCommands::execute(Action::ToggleWordWrap, &mut shared).unwrap();
        assert!(!shared.document.format.word_wrap);
        assert_eq!(shared.status_message, "Word wrap OFF");

        EditCommands::execute(Action::ToggleInsert, &mut shared).unwrap();
        assert!(!shared.document.insert_mode);
        assert_eq!(shared.status_message, "Overwrite mode");
    }

    #[test]
    fn test_other_actions_are_declined() {
        let mut shared = shared_with(&["a"]);
        assert!(!EditCommands::execute(Action::BlockCopy, &mut shared).unwrap());
        assert!(EditCommands::execute(Action::LineEnd, &mut shared).unwrap());
        assert_eq!(shared.document.cursor_x(), 1);
    }
}
