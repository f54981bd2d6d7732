/// Where the filename typed at a file prompt ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilePurpose {
    SaveDocument,
    WriteBlock,
    ReadBlock,
}

/// Command engine state. `Normal` reads single keys; the four `Ctrl*`
/// families wait for their second keystroke; the rest collect text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Normal,
    CtrlK,
    CtrlQ,
    CtrlO,
    CtrlP,
    Find,
    Replace,
    GotoLine,
    SaveAs(FilePurpose),
}

impl State {
    pub fn is_capture(&self) -> bool {
        matches!(
            self,
            State::Find | State::Replace | State::GotoLine | State::SaveAs(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Text entry
    InsertChar(char),
    InsertControl(u8),
    NewLine,
    Tab,
    Backspace,
    DeleteChar,
    DeleteWordRight,
    DeleteLine,
    DeleteToEol,
    SplitLine,
    ToggleInsert,

    // Cursor movement
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
    ScrollUp,
    ScrollDown,
    DocStart,
    DocEnd,

    // Formatting
    ReformParagraph,
    CenterLine,
    ToggleWordWrap,
    ToggleAutoIndent,
    ToggleJustify,

    // Search options
    FindNext,
    ToggleIgnoreCase,
    ToggleWholeWord,
    ToggleBackward,
    ToggleGlobal,

    // Blocks and markers
    BlockBegin,
    BlockEnd,
    BlockCopy,
    BlockMove,
    BlockDelete,
    BlockPaste,
    BlockHide,
    GotoBlockBegin,
    GotoBlockEnd,
    SetMarker(usize),
    GotoMarker(usize),

    // Files
    Save,
    SaveAndExit,
    Quit,

    // Prompt editing
    CaptureChar(char),
    CaptureBackspace,
    CommitCapture(State),
    CancelCapture,
}

/// What a table entry does with the keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Run(Action),
    Enter(State),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: State,
    pub action: Option<Action>,
}

impl Transition {
    pub fn to(next: State) -> Self {
        Self { next, action: None }
    }

    pub fn run(next: State, action: Action) -> Self {
        Self {
            next,
            action: Some(action),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VirtualKey {
    Char,
    Enter,
    Backspace,
    Delete,
    Escape,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Other,
}

/// A key event stripped down to what the command engine looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: VirtualKey,
    pub ch: Option<char>,
    pub pressed: bool,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn key(key: VirtualKey) -> Self {
        Self {
            key,
            ch: None,
            pressed: true,
            ctrl: false,
        }
    }

    pub fn char(c: char) -> Self {
        Self {
            key: VirtualKey::Char,
            ch: Some(c),
            pressed: true,
            ctrl: false,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            ctrl: true,
            ..Self::char(c)
        }
    }
}
