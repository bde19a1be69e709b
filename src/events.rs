use std::time::Duration;

/// 編輯器對外發出的通知，由宿主透過 `Editor::take_events` 取走
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// 標記狀態改變；`cursor` 是當時的活動點
    MarkChanged { active: bool, cursor: usize },
    ContentChanged,
    ModifiedChanged(bool),
    /// 給使用者看的短訊息
    Notify(String),
    EscapePressed,
    /// 光標閃爍週期改變（`Duration::ZERO` 表示暫停閃爍）
    CursorFlash(Duration),
}
