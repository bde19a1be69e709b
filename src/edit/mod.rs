// 以行為單位的編輯操作，每個操作都是一個撤銷群組

mod case;
mod comment;
mod indent;
mod kill;
mod lines;

use crate::editor::Editor;
use crate::word;

impl Editor {
    /// 選擇涉及的行 (起始行, 結束行)；沒有選擇時是目前行
    ///
    /// `exclude_trailing` 為 true 時，結束在後一行第 0 列的選擇不算那一行。
    pub(crate) fn touched_lines(&self, exclude_trailing: bool) -> (usize, usize) {
        let (start, end) = self.cursor.range();
        let first = self.buffer.line_of(start);
        let mut last = self.buffer.line_of(end);
        if exclude_trailing && last > first && self.buffer.column_of(end) == 0 {
            last -= 1;
        }
        (first, last)
    }

    /// 行尾換行符的範圍；最後一行回傳 None
    pub(crate) fn line_break_after(&self, line: usize) -> Option<(usize, usize)> {
        if line + 1 >= self.buffer.line_count() {
            return None;
        }
        Some((self.buffer.line_end(line), self.buffer.line_start(line + 1)))
    }

    /// 在光標前補上候選詞剩下的部分
    pub fn complete_word(&mut self, word: &str) {
        if self.is_read_only() {
            return;
        }
        let prefix = word::word_prefix_before(
            &self.buffer,
            self.cursor.position,
            &self.config.word_separators,
        );
        let rest: String = word.chars().skip(prefix.chars().count()).collect();
        if rest.is_empty() {
            return;
        }
        self.edit_group(|editor| {
            let at = editor.cursor.position;
            let len = editor.insert_at(at, &rest);
            editor.cursor.set_position(&editor.buffer, at + len, false);
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::test_support::{editor_at, state};

    #[test]
    fn test_touched_lines_excludes_column_zero_end() {
        let mut editor = editor_at("aa\nbb\ncc");
        editor.select(1, 6);
        assert_eq!(editor.touched_lines(true), (0, 1));
        assert_eq!(editor.touched_lines(false), (0, 2));

        editor.select(3, 3);
        assert_eq!(editor.touched_lines(true), (1, 1));
    }

    #[test]
    fn test_complete_word() {
        let mut editor = editor_at("let val|");
        editor.complete_word("value");
        assert_eq!(state(&editor), "let value|");

        // 前綴已完整時不插入
        editor.complete_word("value");
        assert_eq!(state(&editor), "let value|");
    }
}
