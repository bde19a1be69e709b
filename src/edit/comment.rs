use crate::comment::{comment_span, indent_columns, is_blank, is_commented, toggle_block_comment};
use crate::cursor::indentation_position;
use crate::editor::Editor;

impl Editor {
    /// 依語法定義切換註解
    pub fn toggle_comment(&mut self) {
        let Some(tokens) = self.syntax.as_ref().map(|def| def.comment_tokens.clone()) else {
            log::debug!("no syntax definition for {}", self.buffer.file_name());
            return;
        };
        if tokens.is_empty() || self.buffer.is_empty() {
            return;
        }

        let has_selection = self.cursor.has_selection();
        let current_line = self.cursor.line(&self.buffer);
        if !has_selection && is_blank(&self.buffer.line_text(current_line)) {
            return;
        }

        let (first, last) = self.touched_lines(true);

        // 選擇從行中間開始或結束時使用塊註解
        if has_selection {
            let (start, end) = self.cursor.range();
            let partial = start > indentation_position(&self.buffer, first)
                || end < self.buffer.line_end(last);
            if let (true, Some((open, close))) = (partial, &tokens.block) {
                self.toggle_block(start, end, open, close);
                return;
            }
        }

        match (&tokens.line, &tokens.block) {
            (Some(token), _) => self.toggle_line_comments(first, last, token),
            (None, Some((open, close))) => {
                let start = self.buffer.line_start(first);
                let end = self.buffer.line_end(last);
                self.toggle_block(start, end, open, close);
            }
            (None, None) => {}
        }
    }

    fn toggle_line_comments(&mut self, first: usize, last: usize, token: &str) {
        let lines: Vec<usize> = (first..=last)
            .filter(|&line| !is_blank(&self.buffer.line_text(line)))
            .collect();
        if lines.is_empty() {
            return;
        }
        let uncomment = lines
            .iter()
            .all(|&line| is_commented(&self.buffer.line_text(line), token));

        self.edit_group(|editor| {
            // 由下往上，前面行的位置不受影響
            for &line in lines.iter().rev() {
                let text = editor.buffer.line_text(line);
                let start = editor.buffer.line_start(line);
                if uncomment {
                    if let Some((from, to)) = comment_span(&text, token) {
                        editor.remove_range(start + from, start + to);
                    }
                } else {
                    let at = start + indent_columns(&text);
                    editor.insert_at(at, &format!("{} ", token));
                }
            }
        });
    }

    fn toggle_block(&mut self, start: usize, end: usize, open: &str, close: &str) {
        let had_selection = self.cursor.has_selection();
        let forward = !self.cursor.at_selection_start();
        let position = self.cursor.position;
        let text = self.buffer.slice(start, end);
        let toggled = toggle_block_comment(&text, open, close);
        let wrapped = toggled.chars().count() > text.chars().count();
        let open_len = open.chars().count();

        self.edit_group(|editor| {
            let len = editor.replace_range(start, end, &toggled);
            if had_selection {
                if forward {
                    editor.cursor.select(&editor.buffer, start, start + len);
                } else {
                    editor.cursor.select(&editor.buffer, start + len, start);
                }
            } else {
                let target = if wrapped {
                    position + open_len
                } else {
                    position.saturating_sub(open_len).max(start)
                };
                editor
                    .cursor
                    .set_position(&editor.buffer, target.min(start + len), false);
            }
        });
    }
}
