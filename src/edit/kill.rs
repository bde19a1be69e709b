use crate::comment::is_blank;
use crate::editor::Editor;
use crate::word;

impl Editor {
    /// 刪除選擇；有刪除時回傳 true
    fn kill_selection(&mut self) -> bool {
        let Some((start, end)) = self.cursor.selection() else {
            return false;
        };
        self.remove_range(start, end);
        self.cursor.set_position(&self.buffer, start, false);
        true
    }

    /// Emacs 的 kill-line
    pub fn kill_line(&mut self) {
        if self.buffer.is_empty() {
            self.unset_mark();
            return;
        }

        self.edit_group(|editor| {
            if editor.kill_selection() {
                return;
            }

            let pos = editor.cursor.position;
            let line = editor.buffer.line_of(pos);
            let text = editor.buffer.line_text(line);
            let line_start = editor.buffer.line_start(line);
            let line_end = editor.buffer.line_end(line);

            if text.is_empty() || pos == line_end {
                // 接上下一行
                if let Some((start, end)) = editor.line_break_after(line) {
                    editor.remove_range(start, end);
                }
            } else if is_blank(&text) && pos == line_start {
                let end = editor
                    .line_break_after(line)
                    .map_or(line_end, |(_, end)| end);
                editor.remove_range(line_start, end);
            } else {
                editor.remove_range(pos, line_end);
            }
        });
        self.unset_mark();
    }

    /// 刪除整行內容，空白行連同換行符一起刪除
    pub fn kill_current_line(&mut self) {
        if self.buffer.is_empty() {
            self.unset_mark();
            return;
        }

        self.edit_group(|editor| {
            let line = editor.cursor.line(&editor.buffer);
            let text = editor.buffer.line_text(line);
            let start = editor.buffer.line_start(line);
            let mut end = editor.buffer.line_end(line);
            if is_blank(&text) {
                if let Some((_, break_end)) = editor.line_break_after(line) {
                    end = break_end;
                }
            }
            editor.remove_range(start, end);
            editor.cursor.set_position(&editor.buffer, start, false);
        });
        self.unset_mark();
    }

    pub fn kill_word(&mut self, forward: bool) {
        self.edit_group(|editor| {
            if editor.kill_selection() {
                return;
            }
            let pos = editor.cursor.position;
            let separators = &editor.config.word_separators;
            let target = if forward {
                word::next_boundary(&editor.buffer, pos, separators)
            } else {
                word::prev_boundary(&editor.buffer, pos, separators)
            };
            let (start, end) = (pos.min(target), pos.max(target));
            editor.remove_range(start, end);
            editor.cursor.set_position(&editor.buffer, start, false);
        });
        self.unset_mark();
    }
}
