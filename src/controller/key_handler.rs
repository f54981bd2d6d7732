use crate::controller::command_types::{
    Action, FilePurpose, KeyInput, State, Step, Transition, VirtualKey,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

// Control keys read in NORMAL.
const NORMAL_CTRL: &[(char, Step)] = &[
    ('k', Step::Enter(State::CtrlK)),
    ('q', Step::Enter(State::CtrlQ)),
    ('o', Step::Enter(State::CtrlO)),
    ('p', Step::Enter(State::CtrlP)),
    ('s', Step::Run(Action::MoveLeft)),
    ('d', Step::Run(Action::MoveRight)),
    ('e', Step::Run(Action::MoveUp)),
    ('x', Step::Run(Action::MoveDown)),
    ('a', Step::Run(Action::WordLeft)),
    ('f', Step::Run(Action::WordRight)),
    ('r', Step::Run(Action::PageUp)),
    ('c', Step::Run(Action::PageDown)),
    ('w', Step::Run(Action::ScrollUp)),
    ('z', Step::Run(Action::ScrollDown)),
    ('g', Step::Run(Action::DeleteChar)),
    ('h', Step::Run(Action::Backspace)),
    ('t', Step::Run(Action::DeleteWordRight)),
    ('y', Step::Run(Action::DeleteLine)),
    ('v', Step::Run(Action::ToggleInsert)),
    ('n', Step::Run(Action::SplitLine)),
    ('b', Step::Run(Action::ReformParagraph)),
    ('l', Step::Run(Action::FindNext)),
    ('i', Step::Run(Action::Tab)),
    ('m', Step::Run(Action::NewLine)),
];

const CTRL_K: &[(char, Step)] = &[
    ('b', Step::Run(Action::BlockBegin)),
    ('k', Step::Run(Action::BlockEnd)),
    ('c', Step::Run(Action::BlockCopy)),
    ('v', Step::Run(Action::BlockMove)),
    ('y', Step::Run(Action::BlockDelete)),
    ('p', Step::Run(Action::BlockPaste)),
    ('h', Step::Run(Action::BlockHide)),
    ('w', Step::Enter(State::SaveAs(FilePurpose::WriteBlock))),
    ('r', Step::Enter(State::SaveAs(FilePurpose::ReadBlock))),
    ('s', Step::Run(Action::Save)),
    ('d', Step::Run(Action::Save)),
    ('a', Step::Enter(State::SaveAs(FilePurpose::SaveDocument))),
    ('x', Step::Run(Action::SaveAndExit)),
    ('q', Step::Run(Action::Quit)),
];

const CTRL_Q: &[(char, Step)] = &[
    ('f', Step::Enter(State::Find)),
    ('a', Step::Enter(State::Replace)),
    ('r', Step::Run(Action::DocStart)),
    ('c', Step::Run(Action::DocEnd)),
    ('s', Step::Run(Action::LineStart)),
    ('d', Step::Run(Action::LineEnd)),
    ('y', Step::Run(Action::DeleteToEol)),
    ('b', Step::Run(Action::GotoBlockBegin)),
    ('k', Step::Run(Action::GotoBlockEnd)),
    ('i', Step::Enter(State::GotoLine)),
];

const CTRL_O: &[(char, Step)] = &[
    ('w', Step::Run(Action::ToggleWordWrap)),
    ('i', Step::Run(Action::ToggleAutoIndent)),
    ('j', Step::Run(Action::ToggleJustify)),
    ('c', Step::Run(Action::CenterLine)),
    ('u', Step::Run(Action::ToggleIgnoreCase)),
    ('h', Step::Run(Action::ToggleWholeWord)),
    ('k', Step::Run(Action::ToggleBackward)),
    ('g', Step::Run(Action::ToggleGlobal)),
];

// Print controls: bold, underline, italic, double strike, strikeout,
// subscript, superscript.
const CTRL_P: &[(char, Step)] = &[
    ('b', Step::Run(Action::InsertControl(0x02))),
    ('s', Step::Run(Action::InsertControl(0x13))),
    ('y', Step::Run(Action::InsertControl(0x19))),
    ('d', Step::Run(Action::InsertControl(0x04))),
    ('x', Step::Run(Action::InsertControl(0x18))),
    ('v', Step::Run(Action::InsertControl(0x16))),
    ('t', Step::Run(Action::InsertControl(0x14))),
];

pub struct KeyHandler;

impl KeyHandler {
    /// Convert a terminal event. Key releases come through with
    /// `pressed` cleared so the engine can drop them.
    pub fn from_crossterm(event: &KeyEvent) -> KeyInput {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let pressed = matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat);
        let (key, ch) = match event.code {
            KeyCode::Char(c) => (VirtualKey::Char, Some(c)),
            KeyCode::Enter => (VirtualKey::Enter, None),
            KeyCode::Backspace => (VirtualKey::Backspace, None),
            KeyCode::Delete => (VirtualKey::Delete, None),
            KeyCode::Esc => (VirtualKey::Escape, None),
            KeyCode::Tab => (VirtualKey::Tab, None),
            KeyCode::Left => (VirtualKey::Left, None),
            KeyCode::Right => (VirtualKey::Right, None),
            KeyCode::Up => (VirtualKey::Up, None),
            KeyCode::Down => (VirtualKey::Down, None),
            KeyCode::Home => (VirtualKey::Home, None),
            KeyCode::End => (VirtualKey::End, None),
            KeyCode::PageUp => (VirtualKey::PageUp, None),
            KeyCode::PageDown => (VirtualKey::PageDown, None),
            KeyCode::Insert => (VirtualKey::Insert, None),
            _ => (VirtualKey::Other, None),
        };
        KeyInput {
            key,
            ch,
            pressed,
            ctrl,
        }
    }

    /// One step of the two-level grammar: (state, key) -> next state plus
    /// an optional action.
    pub fn transition(state: State, input: &KeyInput) -> Transition {
        if !input.pressed {
            return Transition::to(state);
        }
        match state {
            State::Normal => Self::normal(input),
            State::CtrlK => Self::family(CTRL_K, input, Some(Action::SetMarker)),
            State::CtrlQ => Self::family(CTRL_Q, input, Some(Action::GotoMarker)),
            State::CtrlO => Self::family(CTRL_O, input, None),
            State::CtrlP => Self::family(CTRL_P, input, None),
            State::Find | State::Replace | State::GotoLine | State::SaveAs(_) => {
                Self::capture(state, input)
            }
        }
    }

    fn lookup(table: &[(char, Step)], c: char) -> Option<Step> {
        let c = c.to_ascii_lowercase();
        table.iter().find(|(key, _)| *key == c).map(|(_, step)| *step)
    }

    fn apply(step: Step) -> Transition {
        match step {
            Step::Run(action) => Transition::run(State::Normal, action),
            Step::Enter(next) => Transition::to(next),
        }
    }

    fn normal(input: &KeyInput) -> Transition {
        let normal = State::Normal;
        match (input.key, input.ch) {
            (VirtualKey::Char, Some(c)) if input.ctrl => Self::lookup(NORMAL_CTRL, c)
                .map(Self::apply)
                .unwrap_or(Transition::to(normal)),
            (VirtualKey::Char, Some(c)) if !c.is_control() => {
                Transition::run(normal, Action::InsertChar(c))
            }
            (VirtualKey::Enter, _) => Transition::run(normal, Action::NewLine),
            (VirtualKey::Backspace, _) => Transition::run(normal, Action::Backspace),
            (VirtualKey::Delete, _) => Transition::run(normal, Action::DeleteChar),
            (VirtualKey::Tab, _) => Transition::run(normal, Action::Tab),
            (VirtualKey::Left, _) => Transition::run(normal, Action::MoveLeft),
            (VirtualKey::Right, _) => Transition::run(normal, Action::MoveRight),
            (VirtualKey::Up, _) => Transition::run(normal, Action::MoveUp),
            (VirtualKey::Down, _) => Transition::run(normal, Action::MoveDown),
            (VirtualKey::Home, _) => Transition::run(normal, Action::LineStart),
            (VirtualKey::End, _) => Transition::run(normal, Action::LineEnd),
            (VirtualKey::PageUp, _) => Transition::run(normal, Action::PageUp),
            (VirtualKey::PageDown, _) => Transition::run(normal, Action::PageDown),
            (VirtualKey::Insert, _) => Transition::run(normal, Action::ToggleInsert),
            _ => Transition::to(normal),
        }
    }

    /// Second keystroke of a family. Anything unbound, Escape included,
    /// drops back to NORMAL without an action.
    fn family(
        table: &[(char, Step)],
        input: &KeyInput,
        digit: Option<fn(usize) -> Action>,
    ) -> Transition {
        let Some(c) = input.ch.filter(|_| input.key == VirtualKey::Char) else {
            return Transition::to(State::Normal);
        };
        if let (Some(slot), Some(make)) = (c.to_digit(10), digit) {
            return Transition::run(State::Normal, make(slot as usize));
        }
        Self::lookup(table, c)
            .map(Self::apply)
            .unwrap_or(Transition::to(State::Normal))
    }

    fn capture(state: State, input: &KeyInput) -> Transition {
        match (input.key, input.ch) {
            (VirtualKey::Char, Some(c)) if !input.ctrl && !c.is_control() => {
                Transition::run(state, Action::CaptureChar(c))
            }
            (VirtualKey::Backspace, _) => Transition::run(state, Action::CaptureBackspace),
            (VirtualKey::Enter, _) => Transition::run(State::Normal, Action::CommitCapture(state)),
            (VirtualKey::Escape, _) => Transition::run(State::Normal, Action::CancelCapture),
            _ => Transition::to(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(state: State, input: KeyInput) -> Transition {
        KeyHandler::transition(state, &input)
    }

    #[test]
    fn test_family_prefixes() {
        assert_eq!(step(State::Normal, KeyInput::ctrl('k')), Transition::to(State::CtrlK));
        assert_eq!(step(State::Normal, KeyInput::ctrl('Q')), Transition::to(State::CtrlQ));
        assert_eq!(step(State::Normal, KeyInput::ctrl('o')), Transition::to(State::CtrlO));
        assert_eq!(step(State::Normal, KeyInput::ctrl('p')), Transition::to(State::CtrlP));
    }

    #[test]
    fn test_normal_single_keys() {
        assert_eq!(
            step(State::Normal, KeyInput::char('a')),
            Transition::run(State::Normal, Action::InsertChar('a'))
        );
        assert_eq!(
            step(State::Normal, KeyInput::ctrl('s')),
            Transition::run(State::Normal, Action::MoveLeft)
        );
        assert_eq!(
            step(State::Normal, KeyInput::key(VirtualKey::Enter)),
            Transition::run(State::Normal, Action::NewLine)
        );
        assert_eq!(
            step(State::Normal, KeyInput::ctrl('j')),
            Transition::to(State::Normal)
        );
    }

    #[test]
    fn test_family_actions_return_to_normal() {
        assert_eq!(
            step(State::CtrlK, KeyInput::char('b')),
            Transition::run(State::Normal, Action::BlockBegin)
        );
        // WordStar accepts the second key with or without control held.
        assert_eq!(
            step(State::CtrlK, KeyInput::ctrl('K')),
            Transition::run(State::Normal, Action::BlockEnd)
        );
        assert_eq!(
            step(State::CtrlO, KeyInput::char('w')),
            Transition::run(State::Normal, Action::ToggleWordWrap)
        );
        assert_eq!(
            step(State::CtrlP, KeyInput::char('b')),
            Transition::run(State::Normal, Action::InsertControl(0x02))
        );
    }

    #[test]
    fn test_marker_digits() {
        assert_eq!(
            step(State::CtrlK, KeyInput::char('3')),
            Transition::run(State::Normal, Action::SetMarker(3))
        );
        assert_eq!(
            step(State::CtrlQ, KeyInput::char('0')),
            Transition::run(State::Normal, Action::GotoMarker(0))
        );
        assert_eq!(step(State::CtrlO, KeyInput::char('1')), Transition::to(State::Normal));
    }

    #[test]
    fn test_family_enters_capture() {
        assert_eq!(step(State::CtrlQ, KeyInput::char('f')), Transition::to(State::Find));
        assert_eq!(step(State::CtrlQ, KeyInput::char('a')), Transition::to(State::Replace));
        assert_eq!(step(State::CtrlQ, KeyInput::char('i')), Transition::to(State::GotoLine));
        assert_eq!(
            step(State::CtrlK, KeyInput::char('w')),
            Transition::to(State::SaveAs(FilePurpose::WriteBlock))
        );
        assert_eq!(
            step(State::CtrlK, KeyInput::char('a')),
            Transition::to(State::SaveAs(FilePurpose::SaveDocument))
        );
    }

    #[test]
    fn test_unknown_or_escape_in_family_cancels() {
        assert_eq!(step(State::CtrlK, KeyInput::char('z')), Transition::to(State::Normal));
        assert_eq!(
            step(State::CtrlQ, KeyInput::key(VirtualKey::Escape)),
            Transition::to(State::Normal)
        );
    }

    #[test]
    fn test_capture_editing() {
        let find = State::Find;
        assert_eq!(
            step(find, KeyInput::char('x')),
            Transition::run(find, Action::CaptureChar('x'))
        );
        assert_eq!(
            step(find, KeyInput::key(VirtualKey::Backspace)),
            Transition::run(find, Action::CaptureBackspace)
        );
        assert_eq!(
            step(find, KeyInput::key(VirtualKey::Enter)),
            Transition::run(State::Normal, Action::CommitCapture(find))
        );
        assert_eq!(
            step(find, KeyInput::key(VirtualKey::Escape)),
            Transition::run(State::Normal, Action::CancelCapture)
        );
        assert_eq!(step(find, KeyInput::key(VirtualKey::Left)), Transition::to(find));
    }

    #[test]
    fn test_released_keys_are_ignored() {
        let mut input = KeyInput::char('a');
        input.pressed = false;
        assert_eq!(step(State::Normal, input), Transition::to(State::Normal));
        assert_eq!(step(State::CtrlK, input), Transition::to(State::CtrlK));
    }

    #[test]
    fn test_from_crossterm() {
        let event = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        let input = KeyHandler::from_crossterm(&event);
        assert_eq!(input, KeyInput::ctrl('k'));

        let event = KeyEvent::new_with_kind(
            KeyCode::Enter,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        let input = KeyHandler::from_crossterm(&event);
        assert_eq!(input.key, VirtualKey::Enter);
        assert!(!input.pressed);
    }
}
