use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::handler::Action;

/// 依 (情境, 動作) 查詢按鍵組合字串
pub trait KeymapResolver {
    fn resolve(&self, context: &str, action: Action) -> Option<String>;
}

/// 把按鍵事件轉成 "Ctrl+Alt+Meta+Shift+Key" 形式的字串
pub fn key_combo(event: &KeyEvent) -> String {
    let mut modifiers = event.modifiers;
    let key = match event.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) if c.is_alphabetic() => {
            // 大寫字母即使終端沒回報 Shift 也視為 Shift
            if c.is_uppercase() {
                modifiers |= KeyModifiers::SHIFT;
            }
            c.to_uppercase().collect()
        }
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Return".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => {
            modifiers |= KeyModifiers::SHIFT;
            "Tab".to_string()
        }
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Insert => "Insert".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => return String::new(),
    };

    let mut parts: Vec<&str> = Vec::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt");
    }
    if modifiers.contains(KeyModifiers::META) || modifiers.contains(KeyModifiers::SUPER) {
        parts.push("Meta");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift");
    }
    parts.push(&key);
    parts.join("+")
}

/// 預設鍵位表：情境 → 動作名稱 → 按鍵組合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keymap {
    contexts: HashMap<String, HashMap<String, String>>,
}

const DEFAULT_EDITOR_BINDINGS: &[(Action, &str)] = &[
    (Action::IndentLine, "Tab"),
    (Action::BackIndentLine, "Shift+Tab"),
    (Action::ForwardChar, "Ctrl+F"),
    (Action::BackwardChar, "Ctrl+B"),
    (Action::ForwardWord, "Alt+F"),
    (Action::BackwardWord, "Alt+B"),
    (Action::NextLine, "Ctrl+N"),
    (Action::PrevLine, "Ctrl+P"),
    (Action::MoveToStartOfLine, "Ctrl+A"),
    (Action::MoveToEndOfLine, "Ctrl+E"),
    (Action::MoveToStart, "Ctrl+Home"),
    (Action::MoveToEnd, "Ctrl+End"),
    (Action::MoveToLineIndentation, "Alt+M"),
    (Action::ForwardPair, "Alt+P"),
    (Action::BackwardPair, "Alt+N"),
    (Action::ScrollPageDown, "PgDown"),
    (Action::ScrollPageUp, "PgUp"),
    (Action::ScrollLineUp, "Alt+Up"),
    (Action::ScrollLineDown, "Alt+Down"),
    (Action::SetMark, "Ctrl+Space"),
    (Action::ExchangeMark, "Alt+X"),
    (Action::SelectAll, "Alt+A"),
    (Action::OpenNewlineAbove, "Ctrl+Shift+Return"),
    (Action::OpenNewlineBelow, "Ctrl+Return"),
    (Action::DuplicateLine, "Ctrl+Shift+D"),
    (Action::SwapLineUp, "Ctrl+Shift+Up"),
    (Action::SwapLineDown, "Ctrl+Shift+Down"),
    (Action::JoinLines, "Ctrl+Shift+J"),
    (Action::KillLine, "Ctrl+K"),
    (Action::KillCurrentLine, "Ctrl+Shift+K"),
    (Action::KillBackwardWord, "Alt+Backspace"),
    (Action::KillForwardWord, "Alt+D"),
    (Action::UpcaseWord, "Alt+U"),
    (Action::DowncaseWord, "Alt+L"),
    (Action::CapitalizeWord, "Alt+C"),
    (Action::TransposeChar, "Ctrl+T"),
    (Action::ToggleComment, "Ctrl+/"),
    (Action::Copy, "Ctrl+C"),
    (Action::Cut, "Ctrl+X"),
    (Action::Paste, "Ctrl+V"),
    (Action::CopyLines, "Ctrl+Shift+C"),
    (Action::CutLines, "Ctrl+Shift+X"),
    (Action::Undo, "Ctrl+Z"),
    (Action::Redo, "Ctrl+Y"),
    (Action::FindNext, "F3"),
    (Action::FindPrev, "Shift+F3"),
    (Action::ToggleReadOnlyMode, "Alt+Q"),
];

/// 視窗層級的快捷鍵（存檔、離開、搜索對話框等），編輯器不處理
const DEFAULT_WINDOW_BINDINGS: &[(&str, &str)] = &[
    ("save", "Ctrl+S"),
    ("quit", "Ctrl+Q"),
    ("find", "Ctrl+G"),
    ("replace", "Ctrl+R"),
    ("jumptoline", "Ctrl+L"),
    ("togglelinenumbers", "Alt+Shift+L"),
];

impl Keymap {
    pub const EDITOR: &'static str = "editor";
    pub const WINDOW: &'static str = "window";

    pub fn empty() -> Self {
        Self {
            contexts: HashMap::new(),
        }
    }

    pub fn bind(&mut self, context: &str, name: &str, combo: &str) {
        self.contexts
            .entry(context.to_string())
            .or_default()
            .insert(name.to_string(), combo.to_string());
    }

    pub fn unbind(&mut self, context: &str, name: &str) {
        if let Some(bindings) = self.contexts.get_mut(context) {
            bindings.remove(name);
        }
    }

    /// 某情境下所有已綁定的按鍵組合
    pub fn combos(&self, context: &str) -> Vec<String> {
        self.contexts
            .get(context)
            .map(|bindings| bindings.values().cloned().collect())
            .unwrap_or_default()
    }

    /// 視窗快捷鍵的名稱
    pub fn window_action(&self, combo: &str) -> Option<&str> {
        self.contexts.get(Self::WINDOW).and_then(|bindings| {
            bindings
                .iter()
                .find(|(_, bound)| bound.as_str() == combo)
                .map(|(name, _)| name.as_str())
        })
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::empty();
        for (action, combo) in DEFAULT_EDITOR_BINDINGS {
            keymap.bind(Self::EDITOR, action.name(), combo);
        }
        for (name, combo) in DEFAULT_WINDOW_BINDINGS {
            keymap.bind(Self::WINDOW, name, combo);
        }
        keymap
    }
}

impl KeymapResolver for Keymap {
    fn resolve(&self, context: &str, action: Action) -> Option<String> {
        self.contexts.get(context)?.get(action.name()).cloned()
    }
}
