use crate::editor::Editor;

impl Editor {
    /// 有選擇時每行前加一層縮排，否則把光標補到下一個縮排位置
    pub fn indent(&mut self) {
        let tab_width = self.config.tab_width.max(1);
        self.suspend_cursor_flash();

        self.edit_group(|editor| {
            if editor.cursor.has_selection() {
                let (first, last) = editor.touched_lines(false);
                let spaces = " ".repeat(tab_width);
                for line in (first..=last).rev() {
                    let start = editor.buffer.line_start(line);
                    editor.insert_at(start, &spaces);
                }
            } else {
                let at = editor.cursor.position;
                let column = editor.buffer.column_of(at);
                let spaces = " ".repeat(tab_width - column % tab_width);
                let len = editor.insert_at(at, &spaces);
                editor.cursor.set_position(&editor.buffer, at + len, false);
            }
        });

        self.unset_mark();
        self.resume_cursor_flash();
    }

    /// 每行移除一個 tab 或最多 `tab_width` 個前導空格
    pub fn unindent(&mut self) {
        let tab_width = self.config.tab_width.max(1);
        self.suspend_cursor_flash();

        self.edit_group(|editor| {
            let (first, last) = editor.touched_lines(false);
            for line in (first..=last).rev() {
                let text = editor.buffer.line_text(line);
                let count = if text.starts_with('\t') {
                    1
                } else {
                    text.chars().take(tab_width).take_while(|c| *c == ' ').count()
                };
                let start = editor.buffer.line_start(line);
                editor.remove_range(start, start + count);
            }
        });

        self.unset_mark();
        self.resume_cursor_flash();
    }
}
