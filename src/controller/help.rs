use crate::controller::command_types::{FilePurpose, State};

/// One-line menu shown at the bottom of the screen for `state`.
pub fn menu_text(state: State) -> &'static str {
    match state {
        State::Normal => {
            "^K Block/File  ^Q Quick  ^O Onscreen  ^P Print  ^B Reform  ^L Find next  ^V Ins/Ovr"
        }
        State::CtrlK => {
            "^K: B Begin  K End  C Copy  V Move  Y Delete  P Paste  H Hide  W Write  R Read  S/D Save  A Save as  X Exit  Q Quit  0-9 Mark"
        }
        State::CtrlQ => {
            "^Q: F Find  A Replace  R Top  C Bottom  S Line start  D Line end  Y Del EOL  B/K Block  I Goto line  0-9 Marker"
        }
        State::CtrlO => {
            "^O: W Wrap  I Auto-indent  J Justify  C Center  U Ignore case  H Whole word  K Backward  G Global"
        }
        State::CtrlP => "^P: B Bold  S Underline  Y Italic  D Double  X Strike  V Subscript  T Superscript",
        State::Find | State::Replace | State::GotoLine | State::SaveAs(_) => {
            "Enter accept  Esc cancel  Backspace erase"
        }
    }
}

/// Prompt shown in the status line while collecting text.
pub fn prompt(state: State) -> Option<&'static str> {
    match state {
        State::Find => Some("Find: "),
        State::Replace => Some("Replace with: "),
        State::GotoLine => Some("Go to line: "),
        State::SaveAs(FilePurpose::SaveDocument) => Some("Save as: "),
        State::SaveAs(FilePurpose::WriteBlock) => Some("Write block to: "),
        State::SaveAs(FilePurpose::ReadBlock) => Some("Read file: "),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_only_for_capture_states() {
        for state in [State::Find, State::Replace, State::GotoLine] {
            assert!(state.is_capture());
            assert!(prompt(state).is_some());
        }
        assert_eq!(prompt(State::CtrlK), None);
        assert!(menu_text(State::CtrlK).starts_with("^K:"));
    }
}
