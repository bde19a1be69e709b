use crate::buffer::TextBuffer;
use crate::word;

/// 向前配對跳轉時尋找的結束符號
pub const FORWARD_PAIR_DELIMITERS: &[char] = &['"', '\'', ')', '}', '>'];
/// 向後配對跳轉時尋找的開始符號
pub const BACKWARD_PAIR_DELIMITERS: &[char] = &['"', '\'', '(', '{', '<'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    ForwardChar,
    BackwardChar,
    ForwardWord,
    BackwardWord,
    NextLine,
    PrevLine,
    PageDown(usize),
    PageUp(usize),
    StartOfLine,
    EndOfLine,
    StartOfDocument,
    EndOfDocument,
    LineIndentation,
    ForwardPair,
    BackwardPair,
}

impl Movement {
    fn is_vertical(self) -> bool {
        matches!(
            self,
            Movement::NextLine | Movement::PrevLine | Movement::PageDown(_) | Movement::PageUp(_)
        )
    }
}

/// 光標：錨點與活動點。兩者相等代表沒有選擇
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub anchor: usize,
    pub position: usize,
    pub preferred_column: usize, // 上下移動時保持的列
}

impl Cursor {
    pub fn new() -> Self {
        Self::at(0)
    }

    pub fn at(position: usize) -> Self {
        Self {
            anchor: position,
            position,
            preferred_column: 0,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.anchor != self.position
    }

    /// 有選擇時回傳 (起點, 終點)
    pub fn selection(&self) -> Option<(usize, usize)> {
        if self.has_selection() {
            Some(self.range())
        } else {
            None
        }
    }

    pub fn range(&self) -> (usize, usize) {
        (
            self.anchor.min(self.position),
            self.anchor.max(self.position),
        )
    }

    pub fn selection_start(&self) -> usize {
        self.range().0
    }

    pub fn selection_end(&self) -> usize {
        self.range().1
    }

    /// 活動點是否在選擇的開頭
    pub fn at_selection_start(&self) -> bool {
        self.position < self.anchor
    }

    pub fn clear_selection(&mut self) {
        self.anchor = self.position;
    }

    pub fn select(&mut self, buffer: &TextBuffer, anchor: usize, position: usize) {
        self.anchor = buffer.clamp(anchor);
        self.set_position(buffer, position, true);
    }

    /// 設定活動點；`extend` 為 false 時選擇收合
    pub fn set_position(&mut self, buffer: &TextBuffer, position: usize, extend: bool) {
        self.position = buffer.clamp(position);
        if !extend {
            self.anchor = self.position;
        }
        self.preferred_column = buffer.column_of(self.position);
    }

    /// 文件變動後把兩端夾回合法範圍
    pub fn clamp(&mut self, buffer: &TextBuffer) {
        self.anchor = buffer.clamp(self.anchor);
        self.position = buffer.clamp(self.position);
    }

    pub fn line(&self, buffer: &TextBuffer) -> usize {
        buffer.line_of(self.position)
    }

    pub fn column(&self, buffer: &TextBuffer) -> usize {
        buffer.column_of(self.position)
    }

    /// 計算移動目標，不改變光標
    pub fn target(&self, buffer: &TextBuffer, movement: Movement, separators: &str) -> usize {
        let pos = buffer.clamp(self.position);
        let line = buffer.line_of(pos);
        let last_line = buffer.line_count().saturating_sub(1);

        match movement {
            Movement::ForwardChar => buffer.next_char_boundary(pos),
            Movement::BackwardChar => buffer.prev_char_boundary(pos),
            Movement::ForwardWord => word::next_boundary(buffer, pos, separators),
            Movement::BackwardWord => word::prev_boundary(buffer, pos, separators),
            Movement::NextLine => self.vertical_target(buffer, pos, (line + 1).min(last_line)),
            Movement::PrevLine => self.vertical_target(buffer, pos, line.saturating_sub(1)),
            Movement::PageDown(rows) => {
                self.vertical_target(buffer, pos, (line + rows.max(1)).min(last_line))
            }
            Movement::PageUp(rows) => {
                self.vertical_target(buffer, pos, line.saturating_sub(rows.max(1)))
            }
            Movement::StartOfLine => buffer.line_start(line),
            Movement::EndOfLine => buffer.line_end(line),
            Movement::StartOfDocument => 0,
            Movement::EndOfDocument => buffer.len_chars(),
            Movement::LineIndentation => indentation_position(buffer, line),
            Movement::ForwardPair => find_forward_pair(buffer, pos).unwrap_or(pos),
            Movement::BackwardPair => find_backward_pair(buffer, pos).unwrap_or(pos),
        }
    }

    fn vertical_target(&self, buffer: &TextBuffer, pos: usize, target_line: usize) -> usize {
        if target_line == buffer.line_of(pos) {
            return pos;
        }
        buffer.position_of(target_line, self.preferred_column)
    }

    /// 執行移動，回傳新位置
    pub fn move_by(
        &mut self,
        buffer: &TextBuffer,
        movement: Movement,
        extend: bool,
        separators: &str,
    ) -> usize {
        let target = self.target(buffer, movement, separators);
        if movement.is_vertical() {
            // 上下移動保留期望列
            self.position = target;
            if !extend {
                self.anchor = target;
            }
        } else {
            self.set_position(buffer, target, extend);
        }
        self.position
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// 第一個非空白字元的位置；全空白的行回傳行尾
pub fn indentation_position(buffer: &TextBuffer, line: usize) -> usize {
    let start = buffer.line_start(line);
    let indent = buffer
        .line_text(line)
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();
    start + indent
}

/// 從 `pos` 起找第一個結束符號，回傳它之後的位置
fn find_forward_pair(buffer: &TextBuffer, pos: usize) -> Option<usize> {
    (pos..buffer.len_chars())
        .find(|&i| {
            buffer
                .char_at(i)
                .is_some_and(|c| FORWARD_PAIR_DELIMITERS.contains(&c))
        })
        .map(|i| i + 1)
}

/// 從 `pos` 往回找最近的開始符號，回傳它之前的位置
fn find_backward_pair(buffer: &TextBuffer, pos: usize) -> Option<usize> {
    (0..pos).rev().find(|&i| {
        buffer
            .char_at(i)
            .is_some_and(|c| BACKWARD_PAIR_DELIMITERS.contains(&c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_WORD_SEPARATORS;

    fn step(cursor: &mut Cursor, buffer: &TextBuffer, movement: Movement, extend: bool) -> usize {
        cursor.move_by(buffer, movement, extend, DEFAULT_WORD_SEPARATORS)
    }

    #[test]
    fn test_char_moves_are_inverse() {
        let buffer = TextBuffer::from_text("ab\ncd");
        for p in 0..buffer.len_chars() {
            let mut cursor = Cursor::at(p);
            step(&mut cursor, &buffer, Movement::ForwardChar, false);
            step(&mut cursor, &buffer, Movement::BackwardChar, false);
            assert_eq!(cursor.position, p);
        }

        let mut cursor = Cursor::at(5);
        assert_eq!(step(&mut cursor, &buffer, Movement::ForwardChar, false), 5);
        let mut cursor = Cursor::at(0);
        assert_eq!(step(&mut cursor, &buffer, Movement::BackwardChar, false), 0);
    }

    #[test]
    fn test_char_moves_skip_crlf_as_one_break() {
        let buffer = TextBuffer::from_text("ab\r\ncd");
        let mut cursor = Cursor::at(2);
        assert_eq!(step(&mut cursor, &buffer, Movement::ForwardChar, false), 4);
        assert_eq!(buffer.column_of(cursor.position), 0);
        assert_eq!(step(&mut cursor, &buffer, Movement::BackwardChar, false), 2);

        for p in [0, 1, 2, 4, 5] {
            let mut cursor = Cursor::at(p);
            step(&mut cursor, &buffer, Movement::ForwardChar, false);
            step(&mut cursor, &buffer, Movement::BackwardChar, false);
            assert_eq!(cursor.position, p);
        }
    }

    #[test]
    fn test_extend_holds_anchor() {
        let buffer = TextBuffer::from_text("hello world");
        let mut cursor = Cursor::at(2);
        step(&mut cursor, &buffer, Movement::ForwardWord, true);
        step(&mut cursor, &buffer, Movement::ForwardWord, true);
        assert_eq!(cursor.anchor, 2);
        assert_eq!(cursor.selection(), Some((2, 11)));

        step(&mut cursor, &buffer, Movement::StartOfLine, false);
        assert!(!cursor.has_selection());
        assert_eq!(cursor.position, 0);
    }

    #[test]
    fn test_vertical_moves_keep_preferred_column() {
        let buffer = TextBuffer::from_text("abcdef\nab\nabcdef");
        let mut cursor = Cursor::new();
        cursor.set_position(&buffer, 5, false);
        step(&mut cursor, &buffer, Movement::NextLine, false);
        assert_eq!(cursor.position, 9);
        step(&mut cursor, &buffer, Movement::NextLine, false);
        assert_eq!(buffer.column_of(cursor.position), 5);

        // 最後一行再往下不動
        let pos = cursor.position;
        step(&mut cursor, &buffer, Movement::NextLine, false);
        assert_eq!(cursor.position, pos);
    }

    #[test]
    fn test_page_moves_clamp() {
        let buffer = TextBuffer::from_text("a\nb\nc\nd");
        let mut cursor = Cursor::new();
        step(&mut cursor, &buffer, Movement::PageDown(10), false);
        assert_eq!(cursor.line(&buffer), 3);
        step(&mut cursor, &buffer, Movement::PageUp(2), false);
        assert_eq!(cursor.line(&buffer), 1);
    }

    #[test]
    fn test_line_indentation() {
        let buffer = TextBuffer::from_text("    let x;\n   \nfoo");
        let mut cursor = Cursor::at(10);
        assert_eq!(step(&mut cursor, &buffer, Movement::LineIndentation, false), 4);

        let mut cursor = Cursor::at(11);
        assert_eq!(step(&mut cursor, &buffer, Movement::LineIndentation, false), 14);
    }

    #[test]
    fn test_pair_jumps() {
        let buffer = TextBuffer::from_text("call(a, b) + x");
        let mut cursor = Cursor::at(5);
        assert_eq!(step(&mut cursor, &buffer, Movement::ForwardPair, false), 10);
        assert_eq!(step(&mut cursor, &buffer, Movement::BackwardPair, false), 4);

        // 找不到時不動
        let mut cursor = Cursor::at(11);
        assert_eq!(step(&mut cursor, &buffer, Movement::ForwardPair, false), 11);
    }

    #[test]
    fn test_pair_jump_extends_from_anchor() {
        let buffer = TextBuffer::from_text("f(\"abc\")");
        let mut cursor = Cursor::at(3);
        step(&mut cursor, &buffer, Movement::ForwardPair, true);
        assert_eq!(cursor.selection(), Some((3, 7)));
    }

    #[test]
    fn test_empty_document_moves_are_noops() {
        let buffer = TextBuffer::new();
        let movements = [
            Movement::ForwardChar,
            Movement::BackwardChar,
            Movement::ForwardWord,
            Movement::BackwardWord,
            Movement::NextLine,
            Movement::PrevLine,
            Movement::EndOfDocument,
            Movement::LineIndentation,
            Movement::ForwardPair,
            Movement::BackwardPair,
        ];
        for movement in movements {
            let mut cursor = Cursor::new();
            assert_eq!(step(&mut cursor, &buffer, movement, false), 0);
        }
    }
}
