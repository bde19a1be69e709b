use crate::editor::Editor;
use crate::word;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordCase {
    Upper,
    Lower,
    Capitalize,
}

fn convert_case(text: &str, case: WordCase, separators: &str) -> String {
    match case {
        WordCase::Upper => text.to_uppercase(),
        WordCase::Lower => text.to_lowercase(),
        WordCase::Capitalize => {
            let lower = text.to_lowercase();
            let mut result = String::with_capacity(lower.len());
            let mut capitalized = false;
            for ch in lower.chars() {
                if !capitalized && !ch.is_whitespace() && !separators.contains(ch) {
                    result.extend(ch.to_uppercase());
                    capitalized = true;
                } else {
                    result.push(ch);
                }
            }
            result
        }
    }
}

impl Editor {
    pub fn upcase_word(&mut self) {
        self.convert_word_case(WordCase::Upper);
    }

    pub fn downcase_word(&mut self) {
        self.convert_word_case(WordCase::Lower);
    }

    pub fn capitalize_word(&mut self) {
        self.convert_word_case(WordCase::Capitalize);
    }

    /// 有選擇時轉換整段選擇，否則從懸停單字開頭（或光標）轉換到下一個單字邊界
    fn convert_word_case(&mut self, case: WordCase) {
        let hover = self.hover.take();
        if self.buffer.is_empty() {
            return;
        }

        self.edit_group(|editor| {
            let separators = editor.config.word_separators.clone();

            if let Some((start, end)) = editor.cursor.selection() {
                let forward = !editor.cursor.at_selection_start();
                let converted = convert_case(&editor.buffer.slice(start, end), case, &separators);
                let len = editor.replace_range(start, end, &converted);
                // 轉換後仍選住結果，保持原本方向
                if forward {
                    editor.cursor.select(&editor.buffer, start, start + len);
                } else {
                    editor.cursor.select(&editor.buffer, start + len, start);
                }
            } else {
                let start = hover.unwrap_or(editor.cursor.position);
                let end = word::next_boundary(&editor.buffer, start, &separators);
                if start == end {
                    return;
                }
                let converted = convert_case(&editor.buffer.slice(start, end), case, &separators);
                let len = editor.replace_range(start, end, &converted);
                editor.cursor.set_position(&editor.buffer, start + len, false);
            }
        });
        self.unset_mark();
    }

    /// 交換光標前後的字元
    pub fn transpose_char(&mut self) {
        self.try_unset_mark();
        self.cursor.clear_selection();
        if self.buffer.is_empty() {
            return;
        }

        self.edit_group(|editor| {
            let pos = editor.cursor.position;
            let next = editor.buffer.char_at(pos);
            let prev = pos.checked_sub(1).and_then(|p| editor.buffer.char_at(p));

            let start = if prev.is_some() { pos - 1 } else { pos };
            let end = if next.is_some() { pos + 1 } else { pos };
            let swapped: String = next.into_iter().chain(prev).collect();
            let len = editor.replace_range(start, end, &swapped);

            let target = if next.is_some() {
                start + len - 1
            } else {
                start + len
            };
            editor.cursor.set_position(&editor.buffer, target, false);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_WORD_SEPARATORS;
    use crate::editor::test_support::{editor_at, state};

    #[test]
    fn test_convert_case() {
        let seps = DEFAULT_WORD_SEPARATORS;
        assert_eq!(convert_case("hello World", WordCase::Upper, seps), "HELLO WORLD");
        assert_eq!(convert_case("HeLLo", WordCase::Lower, seps), "hello");
        assert_eq!(convert_case("hELLO wORLD", WordCase::Capitalize, seps), "Hello world");
        assert_eq!(convert_case("  (abc", WordCase::Capitalize, seps), "  (Abc");
    }

    #[test]
    fn test_capitalize_word_at_cursor() {
        let mut editor = editor_at("|hello world");
        editor.capitalize_word();
        assert_eq!(state(&editor), "Hello| world");

        editor.upcase_word();
        assert_eq!(state(&editor), "Hello WORLD|");
    }

    #[test]
    fn test_case_on_selection_keeps_selection() {
        let mut editor = editor_at("hello world");
        editor.select(5, 0);
        editor.upcase_word();
        assert_eq!(editor.buffer().text(), "HELLO world");
        assert_eq!((editor.cursor().anchor, editor.cursor().position), (5, 0));
    }

    #[test]
    fn test_case_from_hovered_word() {
        let mut editor = editor_at("hello wor|ld");
        editor.set_hover_position(Some(8));
        editor.upcase_word();
        assert_eq!(state(&editor), "hello WORLD|");
    }

    #[test]
    fn test_transpose_char() {
        let mut editor = editor_at("ab|cd");
        editor.transpose_char();
        assert_eq!(state(&editor), "ac|bd");

        let mut editor = editor_at("ab|");
        editor.transpose_char();
        assert_eq!(state(&editor), "ab|");

        editor.undo();
        assert_eq!(editor.buffer().text(), "ab");
    }
}
