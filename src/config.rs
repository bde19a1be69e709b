// 編輯器設定

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 預設的單字分隔字元
pub const DEFAULT_WORD_SEPARATORS: &str = "./\\()\"'-:,;<>~!@#$%^&*|+=[]{}`?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// 縮排寬度（空格數）
    pub tab_width: usize,
    /// 單字邊界的分隔字元
    pub word_separators: String,
    /// 搜索是否區分大小寫
    pub case_sensitive: bool,
    /// 光標閃爍週期（毫秒）
    pub cursor_flash_time_ms: u64,
    /// 捲動動畫長度（毫秒）
    pub scroll_duration_ms: u64,
    pub line_numbers: bool,
    /// 撤銷歷史上限（群組數）
    pub history_size: usize,
}

impl EditorConfig {
    pub fn new() -> Self {
        Self {
            tab_width: 4,
            word_separators: DEFAULT_WORD_SEPARATORS.to_string(),
            case_sensitive: true,
            cursor_flash_time_ms: 1000,
            scroll_duration_ms: 300,
            line_numbers: true,
            history_size: 1000,
        }
    }

    pub fn cursor_flash_time(&self) -> Duration {
        Duration::from_millis(self.cursor_flash_time_ms)
    }

    pub fn scroll_duration(&self) -> Duration {
        Duration::from_millis(self.scroll_duration_ms)
    }

    pub fn is_word_separator(&self, ch: char) -> bool {
        self.word_separators.contains(ch)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}
