use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cursor::Movement;

/// 編輯器可執行的動作，名稱用於鍵位表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // 光標移動
    ForwardChar,
    BackwardChar,
    ForwardWord,
    BackwardWord,
    NextLine,
    PrevLine,
    MoveToStartOfLine,
    MoveToEndOfLine,
    MoveToStart,
    MoveToEnd,
    MoveToLineIndentation,
    ForwardPair,
    BackwardPair,

    // 捲動
    ScrollPageDown,
    ScrollPageUp,
    ScrollLineUp,
    ScrollLineDown,

    // 標記
    SetMark,
    UnsetMark,
    ExchangeMark,
    SelectAll,

    // 行操作
    Newline,
    OpenNewlineAbove,
    OpenNewlineBelow,
    DuplicateLine,
    SwapLineUp,
    SwapLineDown,
    JoinLines,
    KillLine,
    KillCurrentLine,
    KillBackwardWord,
    KillForwardWord,
    IndentLine,
    BackIndentLine,
    UpcaseWord,
    DowncaseWord,
    CapitalizeWord,
    TransposeChar,
    ToggleComment,

    // 剪貼簿
    Copy,
    Cut,
    Paste,
    CopyLines,
    CutLines,

    // 歷史
    Undo,
    Redo,

    // 搜索
    FindNext,
    FindPrev,

    ToggleReadOnlyMode,
    Escape,
}

impl Action {
    pub const ALL: &'static [Action] = &[
        Action::ForwardChar,
        Action::BackwardChar,
        Action::ForwardWord,
        Action::BackwardWord,
        Action::NextLine,
        Action::PrevLine,
        Action::MoveToStartOfLine,
        Action::MoveToEndOfLine,
        Action::MoveToStart,
        Action::MoveToEnd,
        Action::MoveToLineIndentation,
        Action::ForwardPair,
        Action::BackwardPair,
        Action::ScrollPageDown,
        Action::ScrollPageUp,
        Action::ScrollLineUp,
        Action::ScrollLineDown,
        Action::SetMark,
        Action::UnsetMark,
        Action::ExchangeMark,
        Action::SelectAll,
        Action::Newline,
        Action::OpenNewlineAbove,
        Action::OpenNewlineBelow,
        Action::DuplicateLine,
        Action::SwapLineUp,
        Action::SwapLineDown,
        Action::JoinLines,
        Action::KillLine,
        Action::KillCurrentLine,
        Action::KillBackwardWord,
        Action::KillForwardWord,
        Action::IndentLine,
        Action::BackIndentLine,
        Action::UpcaseWord,
        Action::DowncaseWord,
        Action::CapitalizeWord,
        Action::TransposeChar,
        Action::ToggleComment,
        Action::Copy,
        Action::Cut,
        Action::Paste,
        Action::CopyLines,
        Action::CutLines,
        Action::Undo,
        Action::Redo,
        Action::FindNext,
        Action::FindPrev,
        Action::ToggleReadOnlyMode,
        Action::Escape,
    ];

    /// 鍵位表中使用的名稱
    pub fn name(self) -> &'static str {
        match self {
            Action::ForwardChar => "forwardchar",
            Action::BackwardChar => "backwardchar",
            Action::ForwardWord => "forwardword",
            Action::BackwardWord => "backwardword",
            Action::NextLine => "nextline",
            Action::PrevLine => "prevline",
            Action::MoveToStartOfLine => "movetostartofline",
            Action::MoveToEndOfLine => "movetoendofline",
            Action::MoveToStart => "movetostart",
            Action::MoveToEnd => "movetoend",
            Action::MoveToLineIndentation => "movetolineindentation",
            Action::ForwardPair => "forwardpair",
            Action::BackwardPair => "backwardpair",
            Action::ScrollPageDown => "scrollpagedown",
            Action::ScrollPageUp => "scrollpageup",
            Action::ScrollLineUp => "scrolllineup",
            Action::ScrollLineDown => "scrolllinedown",
            Action::SetMark => "setmark",
            Action::UnsetMark => "unsetmark",
            Action::ExchangeMark => "exchangemark",
            Action::SelectAll => "selectall",
            Action::Newline => "newline",
            Action::OpenNewlineAbove => "opennewlineabove",
            Action::OpenNewlineBelow => "opennewlinebelow",
            Action::DuplicateLine => "duplicateline",
            Action::SwapLineUp => "swaplineup",
            Action::SwapLineDown => "swaplinedown",
            Action::JoinLines => "joinlines",
            Action::KillLine => "killline",
            Action::KillCurrentLine => "killcurrentline",
            Action::KillBackwardWord => "killbackwardword",
            Action::KillForwardWord => "killforwardword",
            Action::IndentLine => "indentline",
            Action::BackIndentLine => "backindentline",
            Action::UpcaseWord => "upcaseword",
            Action::DowncaseWord => "downcaseword",
            Action::CapitalizeWord => "capitalizeword",
            Action::TransposeChar => "transposechar",
            Action::ToggleComment => "togglecomment",
            Action::Copy => "copy",
            Action::Cut => "cut",
            Action::Paste => "paste",
            Action::CopyLines => "copylines",
            Action::CutLines => "cutlines",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::FindNext => "findnext",
            Action::FindPrev => "findprev",
            Action::ToggleReadOnlyMode => "togglereadonlymode",
            Action::Escape => "escape",
        }
    }

    pub fn from_name(name: &str) -> Option<Action> {
        Action::ALL.iter().copied().find(|action| action.name() == name)
    }

    /// 純移動動作對應的 `Movement`
    pub fn movement(self) -> Option<Movement> {
        let movement = match self {
            Action::ForwardChar => Movement::ForwardChar,
            Action::BackwardChar => Movement::BackwardChar,
            Action::ForwardWord => Movement::ForwardWord,
            Action::BackwardWord => Movement::BackwardWord,
            Action::NextLine => Movement::NextLine,
            Action::PrevLine => Movement::PrevLine,
            Action::MoveToStartOfLine => Movement::StartOfLine,
            Action::MoveToEndOfLine => Movement::EndOfLine,
            Action::MoveToStart => Movement::StartOfDocument,
            Action::MoveToEnd => Movement::EndOfDocument,
            Action::MoveToLineIndentation => Movement::LineIndentation,
            Action::ForwardPair => Movement::ForwardPair,
            Action::BackwardPair => Movement::BackwardPair,
            _ => return None,
        };
        Some(movement)
    }

    /// 是否會修改文件內容（唯讀模式下拒絕）
    pub fn is_editing(self) -> bool {
        matches!(
            self,
            Action::Newline
                | Action::OpenNewlineAbove
                | Action::OpenNewlineBelow
                | Action::DuplicateLine
                | Action::SwapLineUp
                | Action::SwapLineDown
                | Action::JoinLines
                | Action::KillLine
                | Action::KillCurrentLine
                | Action::KillBackwardWord
                | Action::KillForwardWord
                | Action::IndentLine
                | Action::BackIndentLine
                | Action::UpcaseWord
                | Action::DowncaseWord
                | Action::CapitalizeWord
                | Action::TransposeChar
                | Action::ToggleComment
                | Action::Cut
                | Action::Paste
                | Action::CutLines
                | Action::Undo
                | Action::Redo
        )
    }
}

/// 鍵位表沒有處理的按鍵交給預設的文字輸入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInput {
    Insert(char),
    Backspace,
    Delete,
    Move { movement: Movement, extend: bool },
}

pub fn text_input(event: &KeyEvent) -> Option<TextInput> {
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);
    let plain = event.modifiers.difference(KeyModifiers::SHIFT).is_empty();
    if !plain {
        return None;
    }

    let movement = |movement| Some(TextInput::Move { movement, extend: shift });
    match event.code {
        KeyCode::Char(c) => Some(TextInput::Insert(c)),
        KeyCode::Backspace => Some(TextInput::Backspace),
        KeyCode::Delete => Some(TextInput::Delete),
        KeyCode::Left => movement(Movement::BackwardChar),
        KeyCode::Right => movement(Movement::ForwardChar),
        KeyCode::Up => movement(Movement::PrevLine),
        KeyCode::Down => movement(Movement::NextLine),
        KeyCode::Home => movement(Movement::StartOfLine),
        KeyCode::End => movement(Movement::EndOfLine),
        _ => None,
    }
}
