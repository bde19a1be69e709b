use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::Duration;

/// 宿主關心的終端事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Paste(String),
}

pub struct Terminal {
    size: (u16, u16),
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let size = terminal::size()?;
        Ok(Self { size })
    }

    pub fn enter_raw_mode() -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen)?;
        Ok(())
    }

    pub fn exit_raw_mode() -> Result<()> {
        execute!(io::stdout(), terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn clear_screen() -> Result<()> {
        execute!(io::stdout(), terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn update_size(&mut self) -> Result<()> {
        self.size = terminal::size()?;
        Ok(())
    }

    /// 等待最多 `timeout`，逾時回傳 None（用於推進捲動動畫）
    pub fn poll_event(timeout: Duration) -> Result<Option<TerminalEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let event = match event::read()? {
            // 只處理 Press 和 Repeat，避免 Windows 上重複輸入
            Event::Key(key_event)
                if key_event.kind == KeyEventKind::Press
                    || key_event.kind == KeyEventKind::Repeat =>
            {
                Some(TerminalEvent::Key(key_event))
            }
            Event::Resize(cols, rows) => Some(TerminalEvent::Resize(cols, rows)),
            Event::Paste(text) => Some(TerminalEvent::Paste(text)),
            _ => None,
        };
        Ok(event)
    }

    pub fn flush() -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    pub fn show_cursor() -> Result<()> {
        execute!(io::stdout(), cursor::Show)?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = Self::exit_raw_mode();
        let _ = Self::show_cursor();
    }
}
