// 單字邊界掃描
//
// 單字是一段連續的「非空白、非分隔字元」；分隔字元連續出現時同樣視為一段。

use crate::buffer::TextBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Separator,
    Word,
}

fn classify(ch: char, separators: &str) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Space
    } else if separators.contains(ch) {
        CharClass::Separator
    } else {
        CharClass::Word
    }
}

pub fn is_word_char(ch: char, separators: &str) -> bool {
    classify(ch, separators) == CharClass::Word
}

/// 下一個單字邊界：先跳過空白，再吃掉一段分隔字元或一段單字
pub fn next_boundary(buffer: &TextBuffer, pos: usize, separators: &str) -> usize {
    let class_at = |p: usize| buffer.char_at(p).map(|c| classify(c, separators));
    let mut pos = buffer.clamp(pos);

    while class_at(pos) == Some(CharClass::Space) {
        pos += 1;
    }
    if let Some(class) = class_at(pos) {
        while class_at(pos) == Some(class) {
            pos += 1;
        }
    }
    pos
}

/// 上一個單字邊界，與 `next_boundary` 對稱
pub fn prev_boundary(buffer: &TextBuffer, pos: usize, separators: &str) -> usize {
    let class_before = |p: usize| {
        if p == 0 {
            None
        } else {
            buffer.char_at(p - 1).map(|c| classify(c, separators))
        }
    };
    let mut pos = buffer.clamp(pos);

    while class_before(pos) == Some(CharClass::Space) {
        pos -= 1;
    }
    if let Some(class) = class_before(pos) {
        while class_before(pos) == Some(class) {
            pos -= 1;
        }
    }
    pos
}

/// `pos` 所在單字的開頭；不在單字上時原樣回傳
pub fn word_start_at(buffer: &TextBuffer, pos: usize, separators: &str) -> usize {
    let mut pos = buffer.clamp(pos);
    if !buffer
        .char_at(pos)
        .is_some_and(|c| is_word_char(c, separators))
    {
        return pos;
    }
    while pos > 0
        && buffer
            .char_at(pos - 1)
            .is_some_and(|c| is_word_char(c, separators))
    {
        pos -= 1;
    }
    pos
}

/// 從 `pos` 往後到單字結尾的位置；`pos` 不在單字上時原樣回傳
pub fn word_end_at(buffer: &TextBuffer, pos: usize, separators: &str) -> usize {
    let mut pos = buffer.clamp(pos);
    while buffer
        .char_at(pos)
        .is_some_and(|c| is_word_char(c, separators))
    {
        pos += 1;
    }
    pos
}

/// 游標前方的單字前綴（用於自動完成）
pub fn word_prefix_before(buffer: &TextBuffer, pos: usize, separators: &str) -> String {
    let end = buffer.clamp(pos);
    let mut start = end;
    while start > 0
        && buffer
            .char_at(start - 1)
            .is_some_and(|c| is_word_char(c, separators))
    {
        start -= 1;
    }
    buffer.slice(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_WORD_SEPARATORS;

    const SEPS: &str = DEFAULT_WORD_SEPARATORS;

    #[test]
    fn test_next_boundary_skips_space_then_word() {
        let buffer = TextBuffer::from_text("foo  bar.baz");
        assert_eq!(next_boundary(&buffer, 0, SEPS), 3);
        assert_eq!(next_boundary(&buffer, 3, SEPS), 8);
        assert_eq!(next_boundary(&buffer, 8, SEPS), 9);
        assert_eq!(next_boundary(&buffer, 9, SEPS), 12);
        assert_eq!(next_boundary(&buffer, 12, SEPS), 12);
    }

    #[test]
    fn test_separator_runs_are_one_step() {
        let buffer = TextBuffer::from_text("a->b");
        assert_eq!(next_boundary(&buffer, 1, SEPS), 3);
        assert_eq!(prev_boundary(&buffer, 3, SEPS), 1);
    }

    #[test]
    fn test_prev_boundary_mirrors_forward() {
        let buffer = TextBuffer::from_text("foo  bar.baz");
        assert_eq!(prev_boundary(&buffer, 12, SEPS), 9);
        assert_eq!(prev_boundary(&buffer, 9, SEPS), 8);
        assert_eq!(prev_boundary(&buffer, 8, SEPS), 5);
        assert_eq!(prev_boundary(&buffer, 5, SEPS), 0);
        assert_eq!(prev_boundary(&buffer, 0, SEPS), 0);
    }

    #[test]
    fn test_boundaries_cross_lines() {
        let buffer = TextBuffer::from_text("ab\n  cd");
        assert_eq!(next_boundary(&buffer, 2, SEPS), 7);
        assert_eq!(prev_boundary(&buffer, 5, SEPS), 0);
    }

    #[test]
    fn test_forward_moves_never_decrease() {
        let buffer = TextBuffer::from_text("x = foo(bar, \"baz\") // done\n\tnext");
        let mut pos = 0;
        loop {
            let next = next_boundary(&buffer, pos, SEPS);
            assert!(next >= pos);
            if next == pos {
                break;
            }
            pos = next;
        }
        assert_eq!(pos, buffer.len_chars());
    }

    #[test]
    fn test_word_start_and_prefix() {
        let buffer = TextBuffer::from_text("let value");
        assert_eq!(word_start_at(&buffer, 7, SEPS), 4);
        assert_eq!(word_start_at(&buffer, 3, SEPS), 3);
        assert_eq!(word_prefix_before(&buffer, 7, SEPS), "val");
        assert_eq!(word_prefix_before(&buffer, 4, SEPS), "");
    }
}
