use crate::editor::Editor;
use crate::gutter::gutter_width;
use crate::search::Span;
use crate::terminal::Terminal;
use crate::utils::{char_width, truncate_to_width, visual_column};
use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

/// 單一字元的顯示樣式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellStyle {
    Plain,
    Selected,
    Match,
    CurrentMatch,
}

pub struct View {
    pub show_line_numbers: bool,
    pub screen_rows: usize,
    pub screen_cols: usize,
    pub cursor_blink: bool,
}

impl View {
    pub fn new(terminal: &Terminal, show_line_numbers: bool) -> Self {
        let (cols, rows) = terminal.size();
        Self {
            show_line_numbers,
            screen_rows: rows.saturating_sub(1) as usize, // 減去狀態欄
            screen_cols: cols as usize,
            cursor_blink: true,
        }
    }

    pub fn update_size(&mut self, terminal: &Terminal) {
        let (cols, rows) = terminal.size();
        self.screen_rows = rows.saturating_sub(1) as usize;
        self.screen_cols = cols as usize;
    }

    pub fn toggle_line_numbers(&mut self) {
        self.show_line_numbers = !self.show_line_numbers;
    }

    /// 行號欄寬度（含右側一格空白）
    fn gutter_columns(&self, editor: &Editor) -> usize {
        if self.show_line_numbers {
            gutter_width(editor.buffer().line_count()) + 1
        } else {
            0
        }
    }

    pub fn render(&self, editor: &Editor, message: Option<&str>) -> Result<()> {
        let mut stdout = io::stdout();
        queue!(stdout, cursor::Hide, cursor::MoveTo(0, 0))?;

        let buffer = editor.buffer();
        let tab_width = editor.config().tab_width.max(1);
        let first_line = editor.scroll_offset();
        let gutter_cols = self.gutter_columns(editor);
        let available_width = self.screen_cols.saturating_sub(gutter_cols);
        let gutter = editor.gutter(first_line..first_line + self.screen_rows);

        let selection = editor.cursor().selection();
        // 過期的匹配不畫
        let search = editor.search();
        let matches: &[Span] = if search.is_stale(buffer) {
            &[]
        } else {
            search.matches()
        };
        let current_match = search.current();

        for screen_row in 0..self.screen_rows {
            let line = first_line + screen_row;
            queue!(stdout, cursor::MoveTo(0, screen_row as u16))?;

            if line < buffer.line_count() {
                if let Some(info) = gutter.get(screen_row).filter(|_| self.show_line_numbers) {
                    let color = if info.is_mark_origin {
                        Color::Yellow
                    } else {
                        Color::DarkGrey
                    };
                    let label = format!("{:>width$} ", info.number, width = gutter_cols - 1);
                    queue!(
                        stdout,
                        style::SetForegroundColor(color),
                        style::Print(label),
                        style::ResetColor
                    )?;
                }

                let line_start = buffer.line_start(line);
                let line_matches: Vec<Span> = matches
                    .iter()
                    .copied()
                    .filter(|&(start, end)| end > line_start && start <= buffer.line_end(line))
                    .collect();

                let mut width = 0;
                let mut current_style = CellStyle::Plain;
                for (idx, ch) in buffer.line_text(line).chars().enumerate() {
                    let pos = line_start + idx;
                    let style = if selection.is_some_and(|(s, e)| pos >= s && pos < e) {
                        CellStyle::Selected
                    } else if current_match.is_some_and(|(s, e)| pos >= s && pos < e) {
                        CellStyle::CurrentMatch
                    } else if line_matches.iter().any(|&(s, e)| pos >= s && pos < e) {
                        CellStyle::Match
                    } else {
                        CellStyle::Plain
                    };

                    let (text, cell_width) = if ch == '\t' {
                        (" ".repeat(tab_width), tab_width)
                    } else {
                        (ch.to_string(), char_width(ch))
                    };
                    if width + cell_width > available_width {
                        break;
                    }
                    if style != current_style {
                        Self::apply_style(&mut stdout, style)?;
                        current_style = style;
                    }
                    queue!(stdout, style::Print(text))?;
                    width += cell_width;
                }
                Self::apply_style(&mut stdout, CellStyle::Plain)?;
            } else {
                // 空行顯示波浪號
                queue!(
                    stdout,
                    style::SetForegroundColor(Color::DarkGrey),
                    style::Print("~"),
                    style::ResetColor
                )?;
            }

            queue!(stdout, Clear(ClearType::UntilNewLine))?;
        }

        self.render_status_bar(editor, message)?;

        // 光標的視覺位置（考慮 Tab 展開與寬字元）
        let line = editor.current_line() - 1;
        if line >= first_line && line < first_line + self.screen_rows {
            let text = buffer.line_text(line);
            let x = gutter_cols + visual_column(&text, editor.current_column(), tab_width);
            let y = line - first_line;
            if self.cursor_blink {
                queue!(stdout, cursor::EnableBlinking)?;
            } else {
                queue!(stdout, cursor::DisableBlinking)?;
            }
            queue!(
                stdout,
                cursor::MoveTo(x.min(self.screen_cols.saturating_sub(1)) as u16, y as u16),
                cursor::Show
            )?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn apply_style(stdout: &mut io::Stdout, style: CellStyle) -> Result<()> {
        queue!(stdout, style::SetAttribute(Attribute::Reset), style::ResetColor)?;
        match style {
            CellStyle::Plain => {}
            CellStyle::Selected => queue!(stdout, style::SetAttribute(Attribute::Reverse))?,
            CellStyle::Match => queue!(
                stdout,
                style::SetBackgroundColor(Color::DarkYellow),
                style::SetForegroundColor(Color::Black)
            )?,
            CellStyle::CurrentMatch => queue!(
                stdout,
                style::SetBackgroundColor(Color::Yellow),
                style::SetForegroundColor(Color::Black)
            )?,
        }
        Ok(())
    }

    fn render_status_bar(&self, editor: &Editor, message: Option<&str>) -> Result<()> {
        let mut stdout = io::stdout();
        queue!(
            stdout,
            cursor::MoveTo(0, self.screen_rows as u16),
            style::SetBackgroundColor(Color::DarkGrey),
            style::SetForegroundColor(Color::White)
        )?;

        let status = status_line(editor, message);
        let status = truncate_to_width(&status, self.screen_cols);
        queue!(
            stdout,
            style::Print(format!("{:width$}", status, width = self.screen_cols)),
            style::ResetColor
        )?;
        Ok(())
    }
}

/// 狀態欄文字
pub fn status_line(editor: &Editor, message: Option<&str>) -> String {
    let buffer = editor.buffer();
    let modified = if editor.is_modified() { " [modified]" } else { "" };
    let read_only = if editor.is_read_only() { " [RO]" } else { "" };
    let mark = if editor.is_mark_active() { " [mark]" } else { "" };
    let header = format!("{}{}{}{}", buffer.file_name(), modified, read_only, mark);

    if let Some(msg) = message {
        // 如果有消息，優先顯示消息
        return format!(" {} - {}", header, msg);
    }

    let search = editor.search();
    let matches = match search.current_index() {
        Some(index) => format!("  Match {}/{}", index + 1, search.match_count()),
        None => String::new(),
    };
    format!(
        " {}  Ln {}/{}, Col {}{}",
        header,
        editor.current_line(),
        buffer.line_count(),
        editor.current_column() + 1,
        matches
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::test_support::editor_at;

    #[test]
    fn test_status_line() {
        let mut editor = editor_at("cat\ndog c|at");
        assert_eq!(status_line(&editor, None), " [No Name]  Ln 2/2, Col 6");

        editor.highlight_keyword("cat", 0);
        assert!(status_line(&editor, None).ends_with("Match 1/2"));

        editor.set_mark();
        assert_eq!(
            status_line(&editor, Some("Mark set")),
            " [No Name] [mark] - Mark set"
        );
    }
}
