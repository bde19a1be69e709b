// 行號欄

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GutterLine {
    pub number: usize, // 1-based
    pub is_mark_origin: bool,
}

/// 行號所需的位數
pub fn gutter_width(line_count: usize) -> usize {
    line_count.max(1).to_string().len()
}

/// 產生可見範圍內每一行的行號資訊，範圍會夾在文件行數內
pub fn gutter_lines(
    visible: Range<usize>,
    line_count: usize,
    mark_origin_line: Option<usize>,
) -> Vec<GutterLine> {
    let end = visible.end.min(line_count);
    (visible.start.min(end)..end)
        .map(|line| GutterLine {
            number: line + 1,
            is_mark_origin: mark_origin_line == Some(line),
        })
        .collect()
}
