// 對話框模組 - 狀態欄上方的輸入框、確認框

use crate::utils::{truncate_to_width, visual_width};
use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    queue,
    style::{self, Color},
    terminal::{self, ClearType},
};
use std::io::{self, Write};

/// 畫出對話框那一行，回傳文字結尾的顯示寬度
fn draw_line(text: &str, background: Color, foreground: Color, size: (u16, u16)) -> Result<usize> {
    let (cols, rows) = size;
    let dialog_row = rows.saturating_sub(2);
    let mut stdout = io::stdout();

    let display = truncate_to_width(text, cols as usize);
    let width = visual_width(display);
    queue!(
        stdout,
        cursor::MoveTo(0, dialog_row),
        terminal::Clear(ClearType::CurrentLine),
        style::SetBackgroundColor(background),
        style::SetForegroundColor(foreground),
        style::Print(display),
        // 填滿剩餘空間
        style::Print(" ".repeat((cols as usize).saturating_sub(width))),
        style::ResetColor
    )?;
    Ok(width)
}

/// 讀下一個按下的鍵，忽略 Release 事件
fn read_key_code() -> Result<KeyCode> {
    loop {
        if let Event::Key(key_event) = event::read()? {
            if key_event.kind == KeyEventKind::Press || key_event.kind == KeyEventKind::Repeat {
                return Ok(key_event.code);
            }
        }
    }
}

/// 顯示輸入對話框，Enter 確認、Esc 取消
pub fn prompt(prompt_text: &str, terminal_size: (u16, u16)) -> Result<Option<String>> {
    let mut input = String::new();
    let (cols, rows) = terminal_size;

    loop {
        let text = format!(" {} {}", prompt_text, input);
        let width = draw_line(&text, Color::DarkBlue, Color::White, terminal_size)?;
        let cursor_x = width.min((cols as usize).saturating_sub(1)) as u16;
        queue!(
            io::stdout(),
            cursor::MoveTo(cursor_x, rows.saturating_sub(2)),
            cursor::Show
        )?;
        io::stdout().flush()?;

        match read_key_code()? {
            KeyCode::Enter => return Ok(Some(input)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            _ => {}
        }
    }
}

/// 顯示確認對話框
pub fn confirm(message: &str, terminal_size: (u16, u16)) -> Result<bool> {
    let text = format!(" {} (y/n)", message);
    draw_line(&text, Color::DarkYellow, Color::Black, terminal_size)?;
    io::stdout().flush()?;

    loop {
        match read_key_code()? {
            KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return Ok(false),
            _ => {}
        }
    }
}
