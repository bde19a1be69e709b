// 按鍵分派：依編輯模式把按鍵組合轉成動作

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::handler::Action;
use super::keymap::{Keymap, KeymapResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingMode {
    /// 唯讀瀏覽模式：單鍵移動
    Navigation,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled(Action),
    /// 交給外層視窗處理
    Propagate,
    /// 交給預設文字輸入
    Fallthrough,
    Ignored,
}

/// 唯讀模式的固定鍵位
static NAVIGATION_KEYS: Lazy<HashMap<&'static str, Action>> = Lazy::new(|| {
    HashMap::from([
        ("J", Action::NextLine),
        ("K", Action::PrevLine),
        (",", Action::MoveToEnd),
        (".", Action::MoveToStart),
        ("H", Action::BackwardChar),
        ("L", Action::ForwardChar),
        ("Space", Action::ScrollPageDown),
        ("V", Action::ScrollPageUp),
        ("F", Action::ForwardWord),
        ("B", Action::BackwardWord),
        ("A", Action::MoveToStartOfLine),
        ("E", Action::MoveToEndOfLine),
        ("M", Action::MoveToLineIndentation),
        ("Q", Action::ToggleReadOnlyMode),
        ("Shift+J", Action::ScrollLineUp),
        ("Shift+K", Action::ScrollLineDown),
        ("P", Action::ForwardPair),
        ("N", Action::BackwardPair),
        ("Shift+:", Action::CopyLines),
    ])
});

pub struct Dispatcher {
    resolver: Box<dyn KeymapResolver>,
    window_shortcuts: Vec<String>,
}

impl Dispatcher {
    pub fn new(resolver: Box<dyn KeymapResolver>, window_shortcuts: Vec<String>) -> Self {
        Self {
            resolver,
            window_shortcuts,
        }
    }

    pub fn from_keymap(keymap: Keymap) -> Self {
        let window_shortcuts = keymap.combos(Keymap::WINDOW);
        Self::new(Box::new(keymap), window_shortcuts)
    }

    fn resolves_to(&self, combo: &str, action: Action) -> bool {
        self.resolver
            .resolve(Keymap::EDITOR, action)
            .is_some_and(|bound| bound == combo)
    }

    pub fn dispatch(&self, combo: &str, mode: EditingMode) -> Dispatch {
        if combo.is_empty() {
            return Dispatch::Ignored;
        }

        match mode {
            EditingMode::Navigation => {
                if self.resolves_to(combo, Action::ToggleReadOnlyMode) {
                    return Dispatch::Handled(Action::ToggleReadOnlyMode);
                }
                if let Some(action) = NAVIGATION_KEYS.get(combo) {
                    return Dispatch::Handled(*action);
                }
                if self.is_window_shortcut(combo) {
                    return Dispatch::Propagate;
                }
                Dispatch::Ignored
            }
            EditingMode::Insert => {
                match combo {
                    "Return" => return Dispatch::Handled(Action::Newline),
                    "Esc" => return Dispatch::Handled(Action::Escape),
                    _ => {}
                }
                if let Some(action) = Action::ALL
                    .iter()
                    .copied()
                    .find(|action| self.resolves_to(combo, *action))
                {
                    return Dispatch::Handled(action);
                }
                if self.is_window_shortcut(combo) {
                    return Dispatch::Propagate;
                }
                Dispatch::Fallthrough
            }
        }
    }

    /// 視窗快捷鍵或 Alt+數字
    fn is_window_shortcut(&self, combo: &str) -> bool {
        if self.window_shortcuts.iter().any(|shortcut| shortcut == combo) {
            return true;
        }
        combo
            .strip_prefix("Alt+")
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_digit())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::from_keymap(Keymap::default())
    }
}
