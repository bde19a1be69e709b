use crate::editor::Editor;

impl Editor {
    pub fn newline(&mut self) {
        if self.is_read_only() {
            return;
        }
        self.try_unset_mark();
        self.edit_group(|editor| {
            let (start, end) = editor.cursor.range();
            let line_break = editor.buffer.line_break();
            let len = editor.replace_range(start, end, line_break);
            editor.cursor.set_position(&editor.buffer, start + len, false);
        });
    }

    /// 在目前行上方開一個空行，光標移到新行
    pub fn open_newline_above(&mut self) {
        self.try_unset_mark();
        self.edit_group(|editor| {
            let line = editor.cursor.line(&editor.buffer);
            let start = editor.buffer.line_start(line);
            let line_break = editor.buffer.line_break();
            editor.insert_at(start, line_break);
            editor.cursor.set_position(&editor.buffer, start, false);
        });
    }

    pub fn open_newline_below(&mut self) {
        self.try_unset_mark();
        self.edit_group(|editor| {
            let line = editor.cursor.line(&editor.buffer);
            let end = editor.buffer.line_end(line);
            let line_break = editor.buffer.line_break();
            editor.insert_at(end, line_break);
            editor.cursor.set_position(&editor.buffer, end + line_break.len(), false);
        });
    }

    /// 複製目前行或選擇涉及的行
    pub fn duplicate_line(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let column = self.cursor.column(&self.buffer);
        let line_break = self.buffer.line_break();

        self.edit_group(|editor| {
            if editor.cursor.has_selection() {
                let (first, last) = editor.touched_lines(true);
                let block_start = editor.buffer.line_start(first);
                let block_end = editor.buffer.line_end(last);
                let block = editor.buffer.slice(block_start, block_end);

                if editor.cursor.at_selection_start() {
                    // 複本放在上方，光標留在複本的第一行
                    editor.insert_at(block_start, &format!("{}{}", block, line_break));
                    let target = editor.buffer.position_of(first, column);
                    editor.cursor.set_position(&editor.buffer, target, false);
                } else {
                    editor.insert_at(block_end, &format!("{}{}", line_break, block));
                    let copy_last = last + (last - first) + 1;
                    let target = editor.buffer.position_of(copy_last, column);
                    editor.cursor.set_position(&editor.buffer, target, false);
                }
            } else {
                let line = editor.cursor.line(&editor.buffer);
                let end = editor.buffer.line_end(line);
                let text = editor.buffer.line_text(line);
                editor.insert_at(end, &format!("{}{}", line_break, text));
                let target = editor.buffer.position_of(line + 1, column);
                editor.cursor.set_position(&editor.buffer, target, false);
            }
        });
        self.unset_mark();
    }

    /// 把目前行（或選擇涉及的行）與上一行/下一行交換
    pub fn move_lines(&mut self, up: bool) {
        if self.buffer.is_empty() {
            return;
        }
        let (first, last) = self.touched_lines(true);
        let last_line = self.buffer.line_count().saturating_sub(1);
        if (up && first == 0) || (!up && last >= last_line) {
            return;
        }

        self.edit_group(|editor| {
            let block_start = editor.buffer.line_start(first);
            let block_end = editor.buffer.line_end(last);
            let block = editor.buffer.slice(block_start, block_end);
            let (anchor, position) = (editor.cursor.anchor, editor.cursor.position);

            if up {
                let neighbor_start = editor.buffer.line_start(first - 1);
                let neighbor = editor.buffer.line_text(first - 1);
                // 保留原本夾在兩者之間的換行符
                let separator = editor
                    .buffer
                    .slice(editor.buffer.line_end(first - 1), block_start);
                editor.buffer.remove(neighbor_start, block_end);
                editor
                    .buffer
                    .insert(neighbor_start, &format!("{}{}{}", block, separator, neighbor));

                let shift = block_start - neighbor_start;
                editor.cursor.anchor = anchor - shift;
                editor.cursor.position = position - shift;
            } else {
                let neighbor_end = editor.buffer.line_end(last + 1);
                let neighbor = editor.buffer.line_text(last + 1);
                let separator = editor
                    .buffer
                    .slice(block_end, editor.buffer.line_start(last + 1));
                editor.buffer.remove(block_start, neighbor_end);
                editor
                    .buffer
                    .insert(block_start, &format!("{}{}{}", neighbor, separator, block));

                let shift = neighbor.chars().count() + separator.chars().count();
                editor.cursor.anchor = anchor + shift;
                editor.cursor.position = position + shift;
            }
        });
    }

    /// 合併行：選擇涉及的行全部合成一行，沒有選擇時接上下一行
    pub fn join_lines(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        if self.cursor.has_selection() {
            let (first, last) = self.touched_lines(false);
            self.edit_group(|editor| {
                for line in (first..last).rev() {
                    if let Some((start, end)) = editor.line_break_after(line) {
                        editor.replace_range(start, end, " ");
                    }
                }
                let end = editor.buffer.line_end(first);
                editor.cursor.set_position(&editor.buffer, end, false);
            });
        } else {
            let line = self.cursor.line(&self.buffer);
            let Some((start, end)) = self.line_break_after(line) else {
                self.unset_mark();
                return;
            };
            self.edit_group(|editor| {
                editor.replace_range(start, end, " ");
                editor.cursor.set_position(&editor.buffer, start, false);
            });
        }
        self.unset_mark();
    }

    fn touched_lines_range(&self) -> (usize, usize) {
        let (first, last) = self.touched_lines(false);
        (self.buffer.line_start(first), self.buffer.line_end(last))
    }

    /// 把涉及的行複製到剪貼簿，光標回到原位
    pub fn copy_lines(&mut self) {
        let (start, end) = self.touched_lines_range();
        let text = self.buffer.slice(start, end);
        self.set_clipboard(&text);

        let position = self.cursor.position;
        self.cursor.set_position(&self.buffer, position, false);
    }

    pub fn cut_lines(&mut self) {
        let (start, end) = self.touched_lines_range();
        let text = self.buffer.slice(start, end);
        self.set_clipboard(&text);

        self.edit_group(|editor| {
            editor.remove_range(start, end);
            editor.cursor.clear_selection();
        });
        self.unset_mark();
    }
}
