// 終端宿主：把按鍵交給編輯器，處理視窗層級的快捷鍵與對話框

use anyhow::Result;
use crossterm::event::KeyEvent;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::buffer::TextBuffer;
use crate::clipboard::SystemClipboard;
use crate::config::EditorConfig;
use crate::dialog;
use crate::editor::{Editor, KeyOutcome};
use crate::events::EditorEvent;
use crate::input::{key_combo, Dispatcher, EditingMode, Keymap};
use crate::terminal::{Terminal, TerminalEvent};
use crate::view::View;

/// 捲動動畫進行中的畫面間隔
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// 閒置時的輪詢間隔
const IDLE_INTERVAL: Duration = Duration::from_millis(500);

pub struct App {
    editor: Editor,
    view: View,
    terminal: Terminal,
    keymap: Keymap,
    message: Option<String>,
    should_quit: bool,
    quit_times: u8, // 追蹤連續按離開鍵的次數
    last_keyword: String,
}

impl App {
    pub fn new(file: Option<&Path>, config: EditorConfig, read_only: bool) -> Result<Self> {
        let buffer = match file {
            Some(path) => TextBuffer::from_file_with_history_size(path, config.history_size)?,
            None => TextBuffer::with_history_size(config.history_size),
        };
        let keymap = Keymap::default();
        let mode = if read_only {
            EditingMode::Navigation
        } else {
            EditingMode::Insert
        };
        let show_line_numbers = config.line_numbers;

        let editor = Editor::new(buffer, config)
            .with_clipboard(Box::new(SystemClipboard::new()))
            .with_dispatcher(Dispatcher::from_keymap(keymap.clone()))
            .with_mode(mode);

        let terminal = Terminal::new()?;
        let view = View::new(&terminal, show_line_numbers);

        Ok(Self {
            editor,
            view,
            terminal,
            keymap,
            message: None,
            should_quit: false,
            quit_times: 0,
            last_keyword: String::new(),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        Terminal::enter_raw_mode()?;
        Terminal::clear_screen()?;

        while !self.should_quit {
            self.editor.set_viewport_height(self.view.screen_rows);
            self.drain_events();
            self.view.render(&self.editor, self.message.as_deref())?;

            let timeout = if self.editor.is_scrolling() {
                FRAME_INTERVAL
            } else {
                IDLE_INTERVAL
            };
            match Terminal::poll_event(timeout)? {
                Some(TerminalEvent::Key(key_event)) => self.handle_key(key_event)?,
                Some(TerminalEvent::Resize(_, _)) => {
                    self.terminal.update_size()?;
                    self.view.update_size(&self.terminal);
                }
                Some(TerminalEvent::Paste(text)) => self.editor.insert_text(&text),
                None => {}
            }
            self.editor.tick(Instant::now());
        }

        Terminal::exit_raw_mode()?;
        Ok(())
    }

    /// 把編輯器事件轉成狀態欄訊息
    fn drain_events(&mut self) {
        for event in self.editor.take_events() {
            match event {
                EditorEvent::Notify(message) => self.message = Some(message),
                EditorEvent::EscapePressed => self.message = None,
                EditorEvent::MarkChanged { active, .. } => {
                    let text = if active { "Mark set" } else { "Mark deactivated" };
                    self.message = Some(text.to_string());
                }
                EditorEvent::CursorFlash(period) => self.view.cursor_blink = !period.is_zero(),
                EditorEvent::ContentChanged | EditorEvent::ModifiedChanged(_) => {
                    log::debug!("{:?}", event);
                }
            }
        }
    }

    fn handle_key(&mut self, key_event: KeyEvent) -> Result<()> {
        let combo = key_combo(&key_event);
        // 任何非離開的按鍵都重置 quit_times
        if self.keymap.window_action(&combo) != Some("quit") {
            self.quit_times = 0;
        }

        match self.editor.handle_key(&key_event) {
            KeyOutcome::Propagate(combo) => self.handle_window_shortcut(&combo)?,
            KeyOutcome::Consumed => {
                if matches!(combo.as_str(), "F3" | "Shift+F3") {
                    self.report_match();
                }
            }
            KeyOutcome::Ignored => {}
        }
        Ok(())
    }

    fn handle_window_shortcut(&mut self, combo: &str) -> Result<()> {
        let action = self.keymap.window_action(combo).map(str::to_string);
        match action.as_deref() {
            Some("save") => self.save()?,
            Some("quit") => self.quit(),
            Some("find") => self.find()?,
            Some("replace") => self.replace()?,
            Some("jumptoline") => self.jump_to_line()?,
            Some("togglelinenumbers") => self.view.toggle_line_numbers(),
            _ => log::debug!("unhandled window shortcut {}", combo),
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let result = if self.editor.buffer().file_path().is_some() {
            self.editor.save()
        } else {
            match dialog::prompt("Save as:", self.terminal.size())? {
                Some(name) if !name.trim().is_empty() => {
                    self.editor.save_as(&PathBuf::from(name.trim()))
                }
                _ => return Ok(()),
            }
        };

        self.message = Some(match result {
            Ok(()) => "File saved".to_string(),
            Err(e) => format!("Save failed: {}", e),
        });
        Ok(())
    }

    fn quit(&mut self) {
        if !self.editor.is_modified() || self.quit_times > 0 {
            self.should_quit = true;
            return;
        }
        // 第一次按離開鍵，顯示警告
        self.quit_times = 1;
        self.message =
            Some("Unsaved changes! Press Ctrl+Q again to force quit, or Ctrl+S to save".to_string());
    }

    fn find(&mut self) -> Result<()> {
        let Some(query) = dialog::prompt("Search:", self.terminal.size())? else {
            return Ok(());
        };
        if query.is_empty() {
            self.editor.remove_keywords();
            return Ok(());
        }

        let position = self.editor.position();
        self.message = Some(match self.editor.highlight_keyword(&query, position) {
            Some(_) => format!(
                "Found {} matches (F3: next, Shift+F3: prev)",
                self.editor.search().match_count()
            ),
            None => format!("No matches found for '{}'", query),
        });
        self.last_keyword = query;
        Ok(())
    }

    fn replace(&mut self) -> Result<()> {
        if self.editor.is_read_only() {
            self.message = Some("Read-Only mode is on".to_string());
            return Ok(());
        }
        let Some(keyword) = dialog::prompt("Replace:", self.terminal.size())? else {
            return Ok(());
        };
        if keyword.is_empty() || !self.editor.find_keyword_forward(&keyword) {
            self.message = Some(format!("No matches found for '{}'", keyword));
            return Ok(());
        }
        let Some(replacement) = dialog::prompt("With:", self.terminal.size())? else {
            return Ok(());
        };

        if dialog::confirm("Replace all occurrences?", self.terminal.size())? {
            let count = self.editor.replace_all(&keyword, &replacement);
            self.message = Some(format!("Replaced {} occurrences", count));
        } else if self.editor.replace_next(&keyword, &replacement) {
            self.message = Some("Replaced 1 occurrence".to_string());
        } else {
            self.report_match();
        }
        self.last_keyword = keyword;
        Ok(())
    }

    fn jump_to_line(&mut self) -> Result<()> {
        let Some(input) = dialog::prompt("Go to line:", self.terminal.size())? else {
            return Ok(());
        };
        let line_count = self.editor.buffer().line_count();
        self.message = Some(match input.trim().parse::<usize>() {
            Ok(line) if line > 0 && line <= line_count => {
                // 目標行捲到畫面中央
                let offset = (line - 1).saturating_sub(self.view.screen_rows / 2);
                self.editor
                    .scroll_to_line(offset, line - 1, 0, Instant::now());
                format!("Jumped to line {}", line)
            }
            Ok(line) => format!("Invalid line number: {}", line),
            Err(_) => "Please enter a valid number".to_string(),
        });
        Ok(())
    }

    fn report_match(&mut self) {
        let search = self.editor.search();
        self.message = Some(match search.current_index() {
            Some(index) => format!("Match {}/{}", index + 1, search.match_count()),
            None if self.last_keyword.is_empty() => "No active search".to_string(),
            None => format!("No matches found for '{}'", self.last_keyword),
        });
    }
}
