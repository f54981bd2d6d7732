use crate::controller::command_types::Action;
use crate::controller::shared_state::SharedEditorState;
use crate::document_model::{EditorResult, FindOutcome, ReplaceOutcome};

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

/// Search command handlers - controller logic for find, replace and goto
pub struct SearchCommands;

impl SearchCommands {
    fn report(shared: &mut SharedEditorState, outcome: FindOutcome) {
        let pattern = shared.find_replace.pattern();
        shared.status_message = match outcome {
            FindOutcome::Found => format!("Found: {pattern}"),
            FindOutcome::FoundAfterWrap => format!("Found (wrapped): {pattern}"),
            FindOutcome::NotFound => format!("Not found: {pattern}"),
        };
    }

    /// Set the pattern typed at the FIND prompt and search for it.
    pub fn find(shared: &mut SharedEditorState, pattern: &str) -> EditorResult<()> {
        shared.find_replace.set_pattern(pattern);
        Self::find_next(shared)
    }

    /// Repeat the last search (^L).
    pub fn find_next(shared: &mut SharedEditorState) -> EditorResult<()> {
        let outcome = shared.find_replace.find(&mut shared.document)?;
        Self::report(shared, outcome);
        Ok(())
    }

    /// Set the replacement typed at the REPLACE prompt and apply it.
    pub fn replace(shared: &mut SharedEditorState, replacement: &str) -> EditorResult<()> {
        shared.find_replace.set_replacement(replacement);
        match shared.find_replace.replace(&mut shared.document)? {
            ReplaceOutcome::ReplacedAll(count) => {
                shared.status_message = format!("{count} replacement(s)");
            }
            ReplaceOutcome::Replaced(outcome) | ReplaceOutcome::NotAtMatch(outcome) => {
                Self::report(shared, outcome);
            }
        }
        Ok(())
    }

    pub fn goto_line(shared: &mut SharedEditorState, input: &str) -> EditorResult<()> {
        shared.document.goto_line(input)
    }

    /// Flip one of the search options. Returns false for other actions.
    pub fn toggle(action: Action, shared: &mut SharedEditorState) -> bool {
        let options = &mut shared.find_replace.options;
        shared.status_message = match action {
            Action::ToggleIgnoreCase => {
                options.case_sensitive = !options.case_sensitive;
                format!("Ignore case {}", on_off(!options.case_sensitive))
            }
            Action::ToggleWholeWord => {
                options.whole_word = !options.whole_word;
                format!("Whole words {}", on_off(options.whole_word))
            }
            Action::ToggleBackward => {
                options.backward = !options.backward;
                format!("Search backward {}", on_off(options.backward))
            }
            Action::ToggleGlobal => {
                options.global = !options.global;
                format!("Global replace {}", on_off(options.global))
            }
            _ => return false,
        };
        true
    }
}
