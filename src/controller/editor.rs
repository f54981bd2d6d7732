use crate::config::{RcConfig, RcLoader};
use crate::controller::block_commands::BlockCommands;
use crate::controller::command_types::{Action, KeyInput, State};
use crate::controller::edit_commands::EditCommands;
use crate::controller::file_commands::FileCommands;
use crate::controller::help;
use crate::controller::key_handler::KeyHandler;
use crate::controller::search_commands::SearchCommands;
use crate::controller::shared_state::{ModeTransition, SharedEditorState};
use crate::document_model::find_replace::MAX_PATTERN_LEN;
use crate::document_model::{Document, EditorResult};
use crate::view::{DocumentViewModel, RenderParams, View};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io::stdout;
use std::path::PathBuf;
use tracing::{trace, warn};

pub struct EditorController {
    shared_state: SharedEditorState,
    state: State,
    view: View,
}

impl EditorController {
    pub fn new(document: Document) -> Self {
        Self {
            shared_state: SharedEditorState::new(document),
            state: State::Normal,
            view: View::new(),
        }
    }

    /// Start on `path`. A file that cannot be read still opens the editor:
    /// the document starts empty under that name and the error is shown on
    /// the status line.
    pub fn open(path: PathBuf) -> Self {
        match Document::open(&path) {
            Ok(document) => Self::new(document),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "open failed, starting empty");
                let mut document = Document::new();
                document.filename = path;
                let mut editor = Self::new(document);
                editor.shared_state.status_message = e.to_string();
                editor
            }
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn shared(&self) -> &SharedEditorState {
        &self.shared_state
    }

    /// Apply RC configuration to this editor controller
    pub fn apply_config(&mut self, config: &RcConfig) {
        RcLoader::apply_config_to_shared_state(&mut self.shared_state, config);
    }

    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;

        let result = self.run_loop();

        disable_raw_mode()?;
        execute!(stdout(), LeaveAlternateScreen)?;

        result
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            self.shared_state.document.set_page_height(View::text_rows());
            self.shared_state.document.scroll_into_view()?;

            let shared = &self.shared_state;
            let view_model = DocumentViewModel::new(&shared.document, &shared.block);
            let params = RenderParams {
                prompt: help::prompt(self.state),
                capture: &shared.capture,
                status_message: &shared.status_message,
                menu: help::menu_text(self.state),
            };
            self.view.render(&view_model, &params)?;

            match event::read()? {
                Event::Key(key_event) => {
                    let input = KeyHandler::from_crossterm(&key_event);
                    if self.handle_key(input) == ModeTransition::Quit {
                        break;
                    }
                }
                Event::Resize(_, _) => self.view.force_redraw(),
                _ => {}
            }
        }

        Ok(())
    }

    /// Feed one key through the state machine and run whatever it selects.
    /// Errors end up in the status line.
    pub fn handle_key(&mut self, input: KeyInput) -> ModeTransition {
        let transition = KeyHandler::transition(self.state, &input);
        if transition.next != self.state {
            trace!(from = ?self.state, to = ?transition.next, "state change");
        }
        if transition.next.is_capture() && !self.state.is_capture() {
            self.shared_state.capture.clear();
        }
        self.state = transition.next;

        let Some(action) = transition.action else {
            return ModeTransition::Stay;
        };
        if !matches!(action, Action::CaptureChar(_) | Action::CaptureBackspace) {
            self.shared_state.status_message.clear();
        }

        let flow = match self.execute(action) {
            Ok(flow) => flow,
            Err(e) => {
                warn!(?action, error = %e, "command failed");
                self.shared_state.status_message = e.to_string();
                ModeTransition::Stay
            }
        };
        if let Err(e) = self.shared_state.document.scroll_into_view() {
            self.shared_state.status_message = e.to_string();
        }
        flow
    }

    fn execute(&mut self, action: Action) -> EditorResult<ModeTransition> {
        let shared = &mut self.shared_state;
        match action {
            Action::CaptureChar(c) => {
                if shared.capture.chars().count() < MAX_PATTERN_LEN {
                    shared.capture.push(c);
                }
            }
            Action::CaptureBackspace => {
                shared.capture.pop();
            }
            Action::CancelCapture => {
                shared.capture.clear();
                shared.status_message = "Cancelled".to_string();
            }
            Action::CommitCapture(state) => {
                let text = std::mem::take(&mut shared.capture);
                match state {
                    State::Find => SearchCommands::find(shared, &text)?,
                    State::Replace => SearchCommands::replace(shared, &text)?,
                    State::GotoLine => SearchCommands::goto_line(shared, &text)?,
                    State::SaveAs(purpose) => FileCommands::commit(shared, purpose, &text)?,
                    _ => {}
                }
            }
            Action::FindNext => SearchCommands::find_next(shared)?,
            Action::Save => FileCommands::save(shared)?,
            Action::SaveAndExit => return Ok(FileCommands::save_and_exit(shared)),
            Action::Quit => return Ok(ModeTransition::Quit),
            action => {
                let handled = SearchCommands::toggle(action, shared)
                    || EditCommands::execute(action, shared)?
                    || BlockCommands::execute(action, shared)?;
                if !handled {
                    warn!(?action, "action has no handler");
                }
            }
        }
        Ok(ModeTransition::Stay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::command_types::VirtualKey;
    use std::fs;
    use tempfile::tempdir;

    fn editor(lines: &[&str]) -> EditorController {
        EditorController::new(Document::from_text(lines))
    }

    fn type_str(editor: &mut EditorController, text: &str) {
        for c in text.chars() {
            editor.handle_key(KeyInput::char(c));
        }
    }

    fn press(editor: &mut EditorController, key: VirtualKey) -> ModeTransition {
        editor.handle_key(KeyInput::key(key))
    }

    fn ctrl_seq(editor: &mut EditorController, prefix: char, second: char) -> ModeTransition {
        editor.handle_key(KeyInput::ctrl(prefix));
        editor.handle_key(KeyInput::char(second))
    }

    #[test]
    fn test_typing_and_backspace_through_keys() {
        let mut ed = editor(&[""]);
        type_str(&mut ed, "ABC");
        assert_eq!(ed.shared().document.current_text(), "ABC");
        press(&mut ed, VirtualKey::Backspace);
        press(&mut ed, VirtualKey::Backspace);
        assert_eq!(ed.shared().document.current_text(), "A");
        assert_eq!(ed.shared().document.cursor_x(), 1);
    }

    #[test]
    fn test_block_delete_through_keys() {
        let mut ed = editor(&["a", "b", "c", "d"]);
        press(&mut ed, VirtualKey::Down);
        ctrl_seq(&mut ed, 'k', 'b');
        press(&mut ed, VirtualKey::Down);
        press(&mut ed, VirtualKey::Right);
        ctrl_seq(&mut ed, 'k', 'k');
        ctrl_seq(&mut ed, 'k', 'y');
        assert_eq!(ed.shared().document.texts(), vec!["a", "d"]);
        assert_eq!(ed.shared().document.current_text(), "d");
        assert_eq!(ed.state(), State::Normal);
    }

    #[test]
    fn test_find_capture_commit() {
        let mut ed = editor(&["foo here", "x", "y", "bar"]);
        ed.handle_key(KeyInput::ctrl('q'));
        ed.handle_key(KeyInput::char('i'));
        assert_eq!(ed.state(), State::GotoLine);
        type_str(&mut ed, "3");
        press(&mut ed, VirtualKey::Enter);
        assert_eq!(ed.shared().document.current_text(), "y");

        ctrl_seq(&mut ed, 'q', 'f');
        assert_eq!(ed.state(), State::Find);
        type_str(&mut ed, "fox");
        press(&mut ed, VirtualKey::Backspace);
        type_str(&mut ed, "o");
        assert_eq!(ed.shared().capture, "foo");
        press(&mut ed, VirtualKey::Enter);
        assert_eq!(ed.state(), State::Normal);
        assert_eq!(ed.shared().capture, "");
        assert_eq!(ed.shared().document.current_index().unwrap(), 0);
        assert_eq!(ed.shared().status_message, "Found (wrapped): foo");
    }

    #[test]
    fn test_escape_cancels_capture() {
        let mut ed = editor(&["text"]);
        ctrl_seq(&mut ed, 'q', 'f');
        type_str(&mut ed, "te");
        press(&mut ed, VirtualKey::Escape);
        assert_eq!(ed.state(), State::Normal);
        assert_eq!(ed.shared().status_message, "Cancelled");
        assert_eq!(ed.shared().find_replace.pattern(), "");
        // The typed characters never reached the document.
        assert_eq!(ed.shared().document.texts(), vec!["text"]);
    }

    #[test]
    fn test_errors_become_status() {
        let mut ed = editor(&["a"]);
        ctrl_seq(&mut ed, 'q', '5');
        assert_eq!(ed.shared().status_message, "Marker 5 not set");
        ctrl_seq(&mut ed, 'k', 'c');
        assert_eq!(ed.shared().status_message, "No block marked");
        ed.handle_key(KeyInput::ctrl('l'));
        assert_eq!(ed.shared().status_message, "Empty search pattern");
    }

    #[test]
    fn test_quit_and_save_exit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut ed = EditorController::new(Document::open(&path).unwrap());
        type_str(&mut ed, "hi");
        assert_eq!(ctrl_seq(&mut ed, 'k', 'x'), ModeTransition::Quit);
        assert_eq!(fs::read(&path).unwrap(), b"hi");

        let mut ed = editor(&[""]);
        assert_eq!(ctrl_seq(&mut ed, 'k', 'q'), ModeTransition::Quit);
    }

    #[test]
    fn test_print_controls_and_toggles() {
        let mut ed = editor(&[""]);
        ctrl_seq(&mut ed, 'p', 'b');
        type_str(&mut ed, "x");
        assert_eq!(ed.shared().document.current_line().unwrap().text(), b"\x02x");

        ctrl_seq(&mut ed, 'o', 'u');
        assert!(!ed.shared().find_replace.options.case_sensitive);
    }

    #[test]
    fn test_unreadable_file_opens_empty_with_status() {
        let dir = tempdir().unwrap();
        let ed = EditorController::open(dir.path().to_path_buf());
        assert_eq!(ed.state(), State::Normal);
        assert_eq!(ed.shared().document.filename, dir.path().to_path_buf());
        assert_eq!(ed.shared().document.texts(), vec![""]);
        assert!(!ed.shared().document.modified);
        assert!(ed.shared().status_message.starts_with("Cannot access"));

        let path = dir.path().join("notes.txt");
        fs::write(&path, "one\r\ntwo").unwrap();
        let ed = EditorController::open(path);
        assert_eq!(ed.shared().document.texts(), vec!["one", "two"]);
        assert_eq!(ed.shared().status_message, "");
    }

    #[test]
    fn test_write_block_prompt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blk.txt");
        let mut ed = editor(&["one", "two"]);
        ctrl_seq(&mut ed, 'k', 'b');
        ctrl_seq(&mut ed, 'k', 'k');
        ctrl_seq(&mut ed, 'k', 'w');
        type_str(&mut ed, path.to_str().unwrap());
        press(&mut ed, VirtualKey::Enter);
        assert_eq!(fs::read(&path).unwrap(), b"one\r\n");
    }
}
