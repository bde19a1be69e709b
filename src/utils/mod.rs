mod logger;

pub use logger::init_logger;

use unicode_width::UnicodeWidthChar;

/// 計算單個字符的視覺寬度
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// 計算字符串的視覺寬度（考慮寬字元）
/// 中文字元等寬字元會正確計算為 2，ASCII 字元計算為 1
pub fn visual_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// 第 `column` 個字元之前的顯示寬度，Tab 展開為 `tab_width` 格
pub fn visual_column(line: &str, column: usize, tab_width: usize) -> usize {
    line.chars()
        .take(column)
        .map(|ch| if ch == '\t' { tab_width } else { char_width(ch) })
        .sum()
}

/// 截斷到不超過 `max_width` 的顯示寬度
pub fn truncate_to_width(s: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (idx, ch) in s.char_indices() {
        width += char_width(ch);
        if width > max_width {
            return &s[..idx];
        }
    }
    s
}
