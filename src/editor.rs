use anyhow::Result;
use crossterm::event::KeyEvent;
use std::ops::Range;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::buffer::TextBuffer;
use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::comment::{BuiltinDefinitions, SyntaxDefinition, SyntaxDefinitions};
use crate::config::EditorConfig;
use crate::cursor::{Cursor, Movement};
use crate::events::EditorEvent;
use crate::gutter::{self, GutterLine};
use crate::input::{key_combo, text_input, Action, Dispatch, Dispatcher, EditingMode, TextInput};
use crate::mark::Mark;
use crate::scroll::{ScrollAnimation, ScrollTick};
use crate::search::{KeywordSearch, Span};
use crate::word;

/// 跳到搜索結果時，讓匹配行上方保留的行數
const SEARCH_CONTEXT_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub first_line: usize,
    pub height: usize, // 0 表示不限制
}

/// `handle_key` 的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    /// 未處理的視窗快捷鍵，交給宿主
    Propagate(String),
    Ignored,
}

/// 一個開啟中文件的編輯狀態
pub struct Editor {
    pub(crate) buffer: TextBuffer,
    pub(crate) cursor: Cursor,
    pub(crate) mark: Mark,
    mode: EditingMode,
    pub(crate) config: EditorConfig,
    search: KeywordSearch,
    viewport: Viewport,
    scroll: Option<ScrollAnimation>,
    pub(crate) hover: Option<usize>, // 滑鼠停留的單字開頭
    pub(crate) clipboard: Box<dyn Clipboard>,
    pub(crate) syntax: Option<SyntaxDefinition>,
    dispatcher: Dispatcher,
    events: Vec<EditorEvent>,
    mark_line: Option<usize>,
    last_modified: bool,
}

impl Editor {
    pub fn new(buffer: TextBuffer, config: EditorConfig) -> Self {
        let search = KeywordSearch::new(config.case_sensitive);
        let syntax = BuiltinDefinitions.definition_for_filename(&buffer.file_name());
        let last_modified = buffer.is_modified();
        Self {
            buffer,
            cursor: Cursor::new(),
            mark: Mark::new(),
            mode: EditingMode::Insert,
            config,
            search,
            viewport: Viewport::default(),
            scroll: None,
            hover: None,
            clipboard: Box::new(MemoryClipboard::new()),
            syntax,
            dispatcher: Dispatcher::default(),
            events: Vec::new(),
            mark_line: None,
            last_modified,
        }
    }

    pub fn open(path: &Path, config: EditorConfig) -> Result<Self> {
        let buffer = TextBuffer::from_file_with_history_size(path, config.history_size)?;
        Ok(Self::new(buffer, config))
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// 以外部提供的語法定義重新查詢註解符號
    pub fn with_syntax_definitions(mut self, definitions: &dyn SyntaxDefinitions) -> Self {
        self.syntax = definitions.definition_for_filename(&self.buffer.file_name());
        self
    }

    pub fn with_mode(mut self, mode: EditingMode) -> Self {
        self.mode = mode;
        self
    }

    // ---- 查詢 ----

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> EditingMode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == EditingMode::Navigation
    }

    pub fn is_mark_active(&self) -> bool {
        self.mark.is_active()
    }

    pub fn syntax_definition(&self) -> Option<&SyntaxDefinition> {
        self.syntax.as_ref()
    }

    /// 目前行號（1-based）
    pub fn current_line(&self) -> usize {
        self.cursor.line(&self.buffer) + 1
    }

    pub fn current_column(&self) -> usize {
        self.cursor.column(&self.buffer)
    }

    pub fn position(&self) -> usize {
        self.cursor.position
    }

    pub fn scroll_offset(&self) -> usize {
        self.viewport.first_line
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn search(&self) -> &KeywordSearch {
        &self.search
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    pub fn selected_text(&self) -> Option<String> {
        self.cursor
            .selection()
            .map(|(start, end)| self.buffer.slice(start, end))
    }

    /// 標記起點所在的行（0-based）
    pub fn mark_origin_line(&self) -> Option<usize> {
        self.mark_line
    }

    pub fn gutter(&self, visible: Range<usize>) -> Vec<GutterLine> {
        gutter::gutter_lines(visible, self.buffer.line_count(), self.mark_line)
    }

    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    pub(crate) fn notify(&mut self, message: impl Into<String>) {
        self.emit(EditorEvent::Notify(message.into()));
    }

    // ---- 按鍵與動作 ----

    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        let combo = key_combo(event);
        match self.dispatcher.dispatch(&combo, self.mode) {
            Dispatch::Handled(action) => {
                self.execute(action);
                KeyOutcome::Consumed
            }
            Dispatch::Propagate => KeyOutcome::Propagate(combo),
            Dispatch::Fallthrough => match text_input(event) {
                Some(input) => {
                    self.apply_input(input);
                    KeyOutcome::Consumed
                }
                None => KeyOutcome::Ignored,
            },
            Dispatch::Ignored => KeyOutcome::Ignored,
        }
    }

    /// 執行一個動作；唯讀模式下的編輯動作會被拒絕並回傳 false
    pub fn execute(&mut self, action: Action) -> bool {
        if action.is_editing() && self.is_read_only() {
            log::debug!("refused {:?} in read-only mode", action);
            return false;
        }
        log::debug!("execute {:?}", action);

        if let Some(movement) = action.movement() {
            self.move_cursor(movement);
            return true;
        }

        match action {
            Action::ScrollPageDown => self.scroll_page(true),
            Action::ScrollPageUp => self.scroll_page(false),
            Action::ScrollLineUp => self.scroll_line_up(),
            Action::ScrollLineDown => self.scroll_line_down(),
            Action::SetMark => self.set_mark(),
            Action::UnsetMark => self.unset_mark(),
            Action::ExchangeMark => self.exchange_mark(),
            Action::SelectAll => self.select_all(),
            Action::Newline => self.newline(),
            Action::OpenNewlineAbove => self.open_newline_above(),
            Action::OpenNewlineBelow => self.open_newline_below(),
            Action::DuplicateLine => self.duplicate_line(),
            Action::SwapLineUp => self.move_lines(true),
            Action::SwapLineDown => self.move_lines(false),
            Action::JoinLines => self.join_lines(),
            Action::KillLine => self.kill_line(),
            Action::KillCurrentLine => self.kill_current_line(),
            Action::KillBackwardWord => self.kill_word(false),
            Action::KillForwardWord => self.kill_word(true),
            Action::IndentLine => self.indent(),
            Action::BackIndentLine => self.unindent(),
            Action::UpcaseWord => self.upcase_word(),
            Action::DowncaseWord => self.downcase_word(),
            Action::CapitalizeWord => self.capitalize_word(),
            Action::TransposeChar => self.transpose_char(),
            Action::ToggleComment => self.toggle_comment(),
            Action::Copy => self.copy(),
            Action::Cut => self.cut(),
            Action::Paste => self.paste(),
            Action::CopyLines => self.copy_lines(),
            Action::CutLines => self.cut_lines(),
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
            Action::FindNext => {
                self.find_next();
            }
            Action::FindPrev => {
                self.find_prev();
            }
            Action::ToggleReadOnlyMode => self.toggle_read_only_mode(),
            Action::Escape => self.escape(),
            _ => {}
        }
        true
    }

    /// 預設文字輸入：插入字元、刪除與方向鍵
    pub fn apply_input(&mut self, input: TextInput) {
        match input {
            TextInput::Move { movement, extend } => {
                let extend = extend || self.mark.is_active();
                self.cursor
                    .move_by(&self.buffer, movement, extend, &self.config.word_separators);
                self.ensure_visible();
            }
            _ if self.is_read_only() => {}
            TextInput::Insert(ch) => self.insert_text(&ch.to_string()),
            TextInput::Backspace => self.delete_char(false),
            TextInput::Delete => self.delete_char(true),
        }
    }

    // ---- 光標 ----

    pub fn move_cursor(&mut self, movement: Movement) {
        let extend = self.mark.is_active();
        self.cursor
            .move_by(&self.buffer, movement, extend, &self.config.word_separators);
        self.ensure_visible();
    }

    /// 移動活動點；標記啟用時延伸選擇
    pub fn set_cursor_position(&mut self, position: usize) {
        let extend = self.mark.is_active();
        self.cursor.set_position(&self.buffer, position, extend);
        self.ensure_visible();
    }

    pub fn select(&mut self, anchor: usize, position: usize) {
        self.cursor.select(&self.buffer, anchor, position);
        self.ensure_visible();
    }

    pub fn select_all(&mut self) {
        let end = self.buffer.len_chars();
        self.cursor.select(&self.buffer, 0, end);
    }

    /// 記錄滑鼠停留的位置，大小寫轉換會從該單字開頭開始
    pub fn set_hover_position(&mut self, position: Option<usize>) {
        self.hover = position.map(|pos| {
            word::word_start_at(&self.buffer, pos, &self.config.word_separators)
        });
    }

    /// 跳到指定行（1-based）
    pub fn jump_to_line(&mut self, line: usize, keep_at_center: bool) {
        let target = self.buffer.line_start(line.saturating_sub(1));
        self.cursor.set_position(&self.buffer, target, false);
        if keep_at_center {
            self.keep_current_line_at_center();
        } else {
            self.ensure_visible();
        }
    }

    // ---- 標記 ----

    fn emit_mark_changed(&mut self) {
        let active = self.mark.is_active();
        self.mark_line = active.then(|| self.cursor.line(&self.buffer));
        self.emit(EditorEvent::MarkChanged {
            active,
            cursor: self.cursor.position,
        });
    }

    pub fn set_mark(&mut self) {
        let transition = self.mark.set_mark(&mut self.cursor);
        log::debug!("mark {:?}", transition);
        self.emit_mark_changed();
    }

    pub fn unset_mark(&mut self) {
        if self.mark.unset() {
            self.emit_mark_changed();
        }
    }

    /// 破壞性操作前取消標記，並先清除選擇
    pub(crate) fn try_unset_mark(&mut self) -> bool {
        if !self.mark.is_active() {
            return false;
        }
        self.cursor.clear_selection();
        self.unset_mark();
        true
    }

    pub fn exchange_mark(&mut self) {
        self.mark.exchange(&self.buffer, &mut self.cursor);
        self.ensure_visible();
    }

    pub fn save_mark_status(&mut self) {
        self.mark.save_status(&self.cursor);
    }

    pub fn restore_mark_status(&mut self) {
        let was_active = self.mark.is_active();
        if self.mark.restore_status(&self.buffer, &mut self.cursor)
            && self.mark.is_active() != was_active
        {
            self.emit_mark_changed();
        }
    }

    pub fn escape(&mut self) {
        self.try_unset_mark();
        self.hover = None;
        self.emit(EditorEvent::EscapePressed);
    }

    pub fn toggle_read_only_mode(&mut self) {
        self.mode = match self.mode {
            EditingMode::Navigation => {
                self.notify("Read-Only mode is off");
                EditingMode::Insert
            }
            EditingMode::Insert => {
                self.notify("Read-Only mode is on");
                EditingMode::Navigation
            }
        };
    }

    // ---- 修改的基本單位 ----

    /// 在一個編輯群組內執行修改，結束後發出內容/修改狀態事件
    pub(crate) fn edit_group<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let revision = self.buffer.revision();
        self.buffer.begin_edit_group();
        let result = f(self);
        self.buffer.end_edit_group();

        self.cursor.clamp(&self.buffer);
        self.cursor.preferred_column = self.buffer.column_of(self.cursor.position);
        self.sync_after_edit(revision);
        self.ensure_visible();
        result
    }

    fn sync_after_edit(&mut self, revision: u64) {
        if self.buffer.revision() != revision {
            self.emit(EditorEvent::ContentChanged);
        }
        let modified = self.buffer.is_modified();
        if modified != self.last_modified {
            self.last_modified = modified;
            self.emit(EditorEvent::ModifiedChanged(modified));
        }
    }

    /// 插入文字，位於插入點之後的錨點/活動點跟著移動
    pub(crate) fn insert_at(&mut self, at: usize, text: &str) -> usize {
        let at = self.buffer.clamp(at);
        let len = text.chars().count();
        self.buffer.insert(at, text);

        let shift = |p: usize| if p > at { p + len } else { p };
        self.cursor.anchor = shift(self.cursor.anchor);
        self.cursor.position = shift(self.cursor.position);
        len
    }

    /// 刪除範圍，範圍內的錨點/活動點收到範圍起點
    pub(crate) fn remove_range(&mut self, start: usize, end: usize) {
        let end = self.buffer.clamp(end);
        let start = start.min(end);
        if start == end {
            return;
        }
        self.buffer.remove(start, end);

        let len = end - start;
        let shift = |p: usize| {
            if p >= end {
                p - len
            } else if p > start {
                start
            } else {
                p
            }
        };
        self.cursor.anchor = shift(self.cursor.anchor);
        self.cursor.position = shift(self.cursor.position);
    }

    /// 取代範圍；原本在範圍之後（含結尾）的點移到新文字之後
    pub(crate) fn replace_range(&mut self, start: usize, end: usize, text: &str) -> usize {
        let end = self.buffer.clamp(end);
        let start = start.min(end);
        if start == end {
            return self.insert_at(start, text);
        }
        let len = text.chars().count();
        self.buffer.remove(start, end);
        self.buffer.insert(start, text);

        let shift = |p: usize| {
            if p >= end {
                p - (end - start) + len
            } else if p > start {
                start
            } else {
                p
            }
        };
        self.cursor.anchor = shift(self.cursor.anchor);
        self.cursor.position = shift(self.cursor.position);
        len
    }

    /// 取代選擇（沒有選擇時在光標處插入），光標移到插入文字之後
    pub fn insert_text(&mut self, text: &str) {
        if self.is_read_only() {
            return;
        }
        self.try_unset_mark();
        self.edit_group(|editor| {
            let (start, end) = editor.cursor.range();
            let len = editor.replace_range(start, end, text);
            editor.cursor.set_position(&editor.buffer, start + len, false);
        });
    }

    fn delete_char(&mut self, forward: bool) {
        self.unset_mark();
        self.edit_group(|editor| {
            let (start, end) = match editor.cursor.selection() {
                Some(range) => range,
                None if forward => (
                    editor.cursor.position,
                    editor.buffer.next_char_boundary(editor.cursor.position),
                ),
                None => (
                    editor.buffer.prev_char_boundary(editor.cursor.position),
                    editor.cursor.position,
                ),
            };
            editor.remove_range(start, end);
            editor.cursor.set_position(&editor.buffer, start, false);
        });
    }

    // ---- 剪貼簿 ----

    pub(crate) fn set_clipboard(&mut self, text: &str) {
        if let Err(err) = self.clipboard.set_text(text) {
            log::warn!("Failed to set clipboard text: {err}");
        }
    }

    pub fn copy(&mut self) {
        if let Some(text) = self.selected_text() {
            self.set_clipboard(&text);
        }
    }

    pub fn cut(&mut self) {
        let Some(text) = self.selected_text() else {
            return;
        };
        self.set_clipboard(&text);
        self.edit_group(|editor| {
            let (start, end) = editor.cursor.range();
            editor.remove_range(start, end);
            editor.cursor.set_position(&editor.buffer, start, false);
        });
        self.unset_mark();
    }

    pub fn paste(&mut self) {
        let text = match self.clipboard.get_text() {
            Ok(text) => text,
            Err(err) => {
                log::warn!("Failed to read clipboard text: {err}");
                return;
            }
        };
        if text.is_empty() {
            return;
        }
        self.edit_group(|editor| {
            let (start, end) = editor.cursor.range();
            let len = editor.replace_range(start, end, &text);
            editor.cursor.set_position(&editor.buffer, start + len, false);
        });
        self.unset_mark();
    }

    // ---- 滑鼠停留的單字 ----

    fn hovered_word(&self) -> Option<(usize, usize)> {
        let start = self.hover?;
        let end = word::word_end_at(&self.buffer, start, &self.config.word_separators);
        (end > start).then_some((start, end))
    }

    /// 沒有選擇時複製滑鼠停留的單字
    pub fn copy_word_under_pointer(&mut self) {
        if self.cursor.has_selection() {
            self.copy();
        } else if let Some((start, end)) = self.hovered_word() {
            let text = self.buffer.slice(start, end);
            self.set_clipboard(&text);
        }
    }

    /// 沒有選擇時剪下滑鼠停留的單字
    pub fn cut_word_under_pointer(&mut self) {
        if self.is_read_only() {
            return;
        }
        if self.cursor.has_selection() {
            self.cut();
        } else if let Some((start, end)) = self.hovered_word() {
            let text = self.buffer.slice(start, end);
            self.set_clipboard(&text);
            self.remove_and_place_cursor(start, end);
        }
    }

    pub fn delete_selection_or_hovered_word(&mut self) {
        if self.is_read_only() {
            return;
        }
        if let Some((start, end)) = self.cursor.selection().or_else(|| self.hovered_word()) {
            self.remove_and_place_cursor(start, end);
        }
    }

    fn remove_and_place_cursor(&mut self, start: usize, end: usize) {
        self.hover = None;
        self.edit_group(|editor| {
            editor.remove_range(start, end);
            editor.cursor.set_position(&editor.buffer, start, false);
        });
        self.unset_mark();
    }

    // ---- 撤銷/重做 ----

    pub fn undo(&mut self) {
        let revision = self.buffer.revision();
        if let Some(pos) = self.buffer.undo() {
            self.try_unset_mark();
            self.cursor.set_position(&self.buffer, pos, false);
            self.sync_after_edit(revision);
            self.ensure_visible();
        }
    }

    pub fn redo(&mut self) {
        let revision = self.buffer.revision();
        if let Some(pos) = self.buffer.redo() {
            self.try_unset_mark();
            self.cursor.set_position(&self.buffer, pos, false);
            self.sync_after_edit(revision);
            self.ensure_visible();
        }
    }

    // ---- 存檔 ----

    pub fn save(&mut self) -> Result<()> {
        self.buffer.save()?;
        self.sync_after_edit(self.buffer.revision());
        Ok(())
    }

    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        self.buffer.save_as(path)?;
        self.syntax = BuiltinDefinitions.definition_for_filename(&self.buffer.file_name());
        self.sync_after_edit(self.buffer.revision());
        Ok(())
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.buffer.set_modified(modified);
        self.sync_after_edit(self.buffer.revision());
    }

    // ---- 搜索與取代 ----

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.config.case_sensitive = case_sensitive;
        self.search.set_case_sensitive(case_sensitive);
    }

    /// 搜索整份文件並跳到 `position` 之後的第一個匹配
    pub fn highlight_keyword(&mut self, keyword: &str, position: usize) -> Option<Span> {
        self.search.search(&self.buffer, keyword);
        self.advance_search(position, true)
    }

    fn advance_search(&mut self, position: usize, forward: bool) -> Option<Span> {
        let span = self.search.advance(&self.buffer, position, forward)?;
        self.cursor.set_position(&self.buffer, span.1, false);

        // 匹配行上方保留幾行
        let line = self.buffer.line_of(span.0);
        if line < self.viewport.first_line || !self.line_visible(line) {
            self.viewport.first_line = line.saturating_sub(SEARCH_CONTEXT_LINES);
        }
        self.ensure_visible();
        Some(span)
    }

    pub fn find_next(&mut self) -> Option<Span> {
        if self.search.keyword().is_empty() {
            return None;
        }
        self.advance_search(self.cursor.position, true)
    }

    pub fn find_prev(&mut self) -> Option<Span> {
        if self.search.keyword().is_empty() {
            return None;
        }
        self.advance_search(self.cursor.position, false)
    }

    /// 關鍵字是否出現在文件中，不移動光標
    pub fn find_keyword_forward(&self, keyword: &str) -> bool {
        self.buffer
            .find(keyword, 0, self.config.case_sensitive)
            .is_some()
    }

    pub fn remove_keywords(&mut self) {
        self.search.clear();
    }

    fn replace_occurrences(&mut self, keyword: &str, replacement: &str, from: usize) -> usize {
        if keyword.is_empty() || self.is_read_only() {
            return 0;
        }
        let case_sensitive = self.config.case_sensitive;
        let count = self.edit_group(|editor| {
            let mut count = 0;
            let mut pos = from;
            while let Some((start, end)) = editor.buffer.find(keyword, pos, case_sensitive) {
                pos = start + editor.replace_range(start, end, replacement);
                count += 1;
            }
            count
        });
        log::debug!("replaced {} occurrences of {:?}", count, keyword);
        count
    }

    pub fn replace_all(&mut self, keyword: &str, replacement: &str) -> usize {
        self.replace_occurrences(keyword, replacement, 0)
    }

    /// 從光標開始取代到文件結尾
    pub fn replace_rest(&mut self, keyword: &str, replacement: &str) -> usize {
        self.replace_occurrences(keyword, replacement, self.cursor.position)
    }

    /// 取代目前的匹配，再重新搜索並跳到下一個
    pub fn replace_next(&mut self, keyword: &str, replacement: &str) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.search.refresh(&self.buffer);
        let current = self
            .search
            .current()
            .filter(|_| !keyword.is_empty() && self.search.keyword() == keyword);

        let Some((start, end)) = current else {
            self.highlight_keyword(keyword, self.cursor.position);
            return false;
        };

        self.edit_group(|editor| {
            let len = editor.replace_range(start, end, replacement);
            editor.cursor.set_position(&editor.buffer, start + len, false);
        });
        self.highlight_keyword(keyword, self.cursor.position);
        true
    }

    // ---- 捲動 ----

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport.height = height;
        self.ensure_visible();
    }

    fn last_line(&self) -> usize {
        self.buffer.line_count().saturating_sub(1)
    }

    fn line_visible(&self, line: usize) -> bool {
        self.viewport.height == 0
            || (line >= self.viewport.first_line
                && line < self.viewport.first_line + self.viewport.height)
    }

    pub(crate) fn ensure_visible(&mut self) {
        if self.scroll.is_some() || self.viewport.height == 0 {
            return;
        }
        let line = self.cursor.line(&self.buffer);
        if line < self.viewport.first_line {
            self.viewport.first_line = line;
        } else if line >= self.viewport.first_line + self.viewport.height {
            self.viewport.first_line = line + 1 - self.viewport.height;
        }
    }

    pub fn keep_current_line_at_center(&mut self) {
        let line = self.cursor.line(&self.buffer);
        self.viewport.first_line = line.saturating_sub(self.viewport.height / 2);
    }

    fn scroll_page(&mut self, down: bool) {
        let rows = self.viewport.height.max(1);
        self.viewport.first_line = if down {
            (self.viewport.first_line + rows).min(self.last_line())
        } else {
            self.viewport.first_line.saturating_sub(rows)
        };
        let movement = if down {
            Movement::PageDown(rows)
        } else {
            Movement::PageUp(rows)
        };
        self.move_cursor(movement);
    }

    /// 視窗上移一行，光標離開可見範圍時跟著移動
    pub fn scroll_line_up(&mut self) {
        self.viewport.first_line = self.viewport.first_line.saturating_sub(1);
        if !self.line_visible(self.cursor.line(&self.buffer)) {
            self.move_cursor(Movement::PrevLine);
        }
    }

    pub fn scroll_line_down(&mut self) {
        self.viewport.first_line = (self.viewport.first_line + 1).min(self.last_line());
        if !self.line_visible(self.cursor.line(&self.buffer)) {
            self.move_cursor(Movement::NextLine);
        }
    }

    /// 以動畫捲動到 `scroll_offset`，結束後把光標放回 (row, column)
    pub fn scroll_to_line(&mut self, scroll_offset: usize, row: usize, column: usize, now: Instant) {
        let target = scroll_offset.min(self.last_line());
        self.scroll = Some(ScrollAnimation::new(
            self.viewport.first_line,
            target,
            now,
            self.config.scroll_duration(),
            (row, column),
        ));
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_some()
    }

    /// 推進捲動動畫，回傳是否仍在進行
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(animation) = &self.scroll else {
            return false;
        };
        match animation.tick(now) {
            ScrollTick::Running(offset) => {
                self.viewport.first_line = offset;
                true
            }
            ScrollTick::Finished {
                offset,
                restore: (row, column),
            } => {
                self.viewport.first_line = offset;
                self.scroll = None;
                let target = self.buffer.position_of(row, column);
                self.cursor.set_position(&self.buffer, target, false);
                false
            }
        }
    }

    // ---- 光標閃爍 ----

    pub(crate) fn suspend_cursor_flash(&mut self) {
        self.emit(EditorEvent::CursorFlash(Duration::ZERO));
    }

    pub(crate) fn resume_cursor_flash(&mut self) {
        let flash = self.config.cursor_flash_time();
        self.emit(EditorEvent::CursorFlash(flash));
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    /// 以 `|` 標示光標位置建立編輯器
    pub fn editor_at(text: &str) -> Editor {
        let position = text.find('|').map(|byte| text[..byte].chars().count());
        let content = text.replacen('|', "", 1);
        let mut editor = Editor::new(TextBuffer::from_text(&content), EditorConfig::default())
            .with_clipboard(Box::new(MemoryClipboard::new()));
        if let Some(position) = position {
            editor.cursor.set_position(&editor.buffer, position, false);
        }
        editor
    }

    /// 以 `|` 標示光標，回傳文字與位置
    pub fn state(editor: &Editor) -> String {
        let mut text = editor.buffer.text();
        let byte = text
            .char_indices()
            .nth(editor.cursor.position)
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        text.insert(byte, '|');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{editor_at, state};
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_queries() {
        let editor = editor_at("one\ntw|o");
        assert_eq!(editor.current_line(), 2);
        assert_eq!(editor.current_column(), 2);
        assert_eq!(editor.position(), 6);
        assert_eq!(editor.scroll_offset(), 0);
    }

    #[test]
    fn test_typing_and_events() {
        let mut editor = editor_at("ab|");
        editor.handle_key(&key(KeyCode::Char('c'), KeyModifiers::NONE));
        assert_eq!(state(&editor), "abc|");

        let events = editor.take_events();
        assert!(events.contains(&EditorEvent::ContentChanged));
        assert!(events.contains(&EditorEvent::ModifiedChanged(true)));
        assert!(editor.take_events().is_empty());

        editor.undo();
        assert_eq!(state(&editor), "ab|");
        assert!(editor
            .take_events()
            .contains(&EditorEvent::ModifiedChanged(false)));
    }

    #[test]
    fn test_typing_replaces_shift_selection() {
        let mut editor = editor_at("hello");
        editor.select(0, 4);
        editor.apply_input(TextInput::Insert('j'));
        assert_eq!(state(&editor), "j|o");
    }

    #[test]
    fn test_typing_with_mark_clears_selection_first() {
        let mut editor = editor_at("|hello");
        editor.set_mark();
        editor.move_cursor(Movement::ForwardWord);
        editor.apply_input(TextInput::Insert('!'));
        assert_eq!(state(&editor), "hello!|");
        assert!(!editor.is_mark_active());
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut editor = editor_at("ab|cd");
        editor.apply_input(TextInput::Backspace);
        assert_eq!(state(&editor), "a|cd");
        editor.apply_input(TextInput::Delete);
        assert_eq!(state(&editor), "a|d");

        let mut editor = editor_at("|");
        editor.apply_input(TextInput::Backspace);
        assert_eq!(state(&editor), "|");
    }

    #[test]
    fn test_crlf_break_is_one_char() {
        let mut editor = editor_at("ab|\r\ncd");
        editor.execute(Action::ForwardChar);
        assert_eq!(editor.current_line(), 2);
        assert_eq!(editor.current_column(), 0);
        editor.insert_text("X");
        assert_eq!(state(&editor), "ab\r\nX|cd");
        assert_eq!(editor.buffer().line_count(), 2);

        let mut editor = editor_at("ab\r\n|cd");
        editor.apply_input(TextInput::Backspace);
        assert_eq!(state(&editor), "ab|cd");

        let mut editor = editor_at("ab|\r\ncd");
        editor.apply_input(TextInput::Delete);
        assert_eq!(state(&editor), "ab|cd");
    }

    #[test]
    fn test_mark_events_and_extension() {
        let mut editor = editor_at("one two\nthree");
        editor.execute(Action::SetMark);
        editor.execute(Action::ForwardWord);
        editor.execute(Action::NextLine);
        assert_eq!(editor.cursor().anchor, 0);
        assert_eq!(editor.mark_origin_line(), Some(0));

        let events = editor.take_events();
        assert_eq!(
            events,
            vec![EditorEvent::MarkChanged {
                active: true,
                cursor: 0
            }]
        );

        editor.execute(Action::Escape);
        assert!(!editor.is_mark_active());
        assert!(!editor.cursor().has_selection());
        assert_eq!(editor.mark_origin_line(), None);
        let events = editor.take_events();
        assert!(events.contains(&EditorEvent::EscapePressed));
    }

    #[test]
    fn test_set_mark_twice_with_selection_collapses() {
        let mut editor = editor_at("|hello world");
        editor.set_mark();
        editor.move_cursor(Movement::ForwardWord);
        editor.take_events();

        editor.set_mark();
        assert!(editor.is_mark_active());
        assert!(!editor.cursor().has_selection());
        assert_eq!(
            editor.take_events(),
            vec![EditorEvent::MarkChanged {
                active: true,
                cursor: 5
            }]
        );
    }

    #[test]
    fn test_read_only_mode_refuses_edits() {
        let mut editor = editor_at("a|b").with_mode(EditingMode::Navigation);
        assert!(!editor.execute(Action::KillLine));
        editor.handle_key(&key(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(editor.buffer().text(), "ab");

        // 唯讀模式下 L 是向右一字元
        editor.handle_key(&key(KeyCode::Char('l'), KeyModifiers::NONE));
        assert_eq!(editor.position(), 2);

        editor.handle_key(&key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert_eq!(editor.mode(), EditingMode::Insert);
        assert!(editor
            .take_events()
            .contains(&EditorEvent::Notify("Read-Only mode is off".to_string())));
    }

    #[test]
    fn test_window_shortcut_propagates() {
        let mut editor = editor_at("|");
        let outcome = editor.handle_key(&key(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(outcome, KeyOutcome::Propagate("Ctrl+S".to_string()));
        let outcome = editor.handle_key(&key(KeyCode::Char('1'), KeyModifiers::ALT));
        assert_eq!(outcome, KeyOutcome::Propagate("Alt+1".to_string()));
    }

    #[test]
    fn test_clipboard_round_trip() {
        let mut editor = editor_at("hello world");
        editor.select(0, 5);
        editor.execute(Action::Cut);
        assert_eq!(state(&editor), "| world");

        editor.execute(Action::MoveToEnd);
        editor.execute(Action::Paste);
        assert_eq!(state(&editor), " worldhello|");
    }

    #[test]
    fn test_hovered_word_copy_cut_and_delete() {
        let mut editor = editor_at("|alpha beta gamma");
        editor.set_hover_position(Some(8));
        editor.copy_word_under_pointer();
        assert_eq!(editor.buffer().text(), "alpha beta gamma");

        editor.execute(Action::MoveToEnd);
        editor.paste();
        assert_eq!(editor.buffer().text(), "alpha beta gammabeta");

        editor.set_hover_position(Some(2));
        editor.cut_word_under_pointer();
        assert_eq!(state(&editor), "| beta gammabeta");
        editor.undo();
        assert_eq!(editor.buffer().text(), "alpha beta gammabeta");

        editor.set_hover_position(Some(6));
        editor.delete_selection_or_hovered_word();
        assert_eq!(editor.buffer().text(), "alpha  gammabeta");

        // 沒有停留的單字時不動
        editor.delete_selection_or_hovered_word();
        assert_eq!(editor.buffer().text(), "alpha  gammabeta");
    }

    #[test]
    fn test_delete_prefers_selection_over_hover() {
        let mut editor = editor_at("one two three");
        editor.set_hover_position(Some(9));
        editor.select(0, 4);
        editor.delete_selection_or_hovered_word();
        assert_eq!(state(&editor), "|two three");
    }

    #[test]
    fn test_search_highlight_and_navigation() {
        let mut editor = editor_at("|cat dog cat");
        assert_eq!(editor.highlight_keyword("cat", 5), Some((8, 11)));
        assert_eq!(editor.position(), 11);

        assert_eq!(editor.find_next(), Some((0, 3)));
        assert_eq!(editor.position(), 3);
        assert_eq!(editor.find_prev(), Some((8, 11)));

        assert!(editor.find_keyword_forward("dog"));
        assert!(!editor.find_keyword_forward("bird"));
        assert_eq!(editor.position(), 11);

        editor.remove_keywords();
        assert_eq!(editor.find_next(), None);
    }

    #[test]
    fn test_replace_all_single_undo_step() {
        let mut editor = editor_at("cat dog cat|");
        assert_eq!(editor.replace_all("cat", "bird"), 2);
        assert_eq!(state(&editor), "bird dog bird|");

        // 再跑一次沒有新的匹配
        assert_eq!(editor.replace_all("cat", "bird"), 0);
        assert_eq!(editor.buffer().text(), "bird dog bird");

        editor.undo();
        assert_eq!(editor.buffer().text(), "cat dog cat");
    }

    #[test]
    fn test_replace_all_with_superstring() {
        let mut editor = editor_at("a a");
        assert_eq!(editor.replace_all("a", "aa"), 2);
        assert_eq!(editor.buffer().text(), "aa aa");
    }

    #[test]
    fn test_replace_rest_from_cursor() {
        let mut editor = editor_at("cat d|og cat");
        assert_eq!(editor.replace_rest("cat", "cow"), 1);
        assert_eq!(editor.buffer().text(), "cat dog cow");
    }

    #[test]
    fn test_replace_next_advances() {
        let mut editor = editor_at("|cat dog cat");
        // 沒有目前匹配時只做高亮
        assert!(!editor.replace_next("cat", "cow"));
        assert_eq!(editor.search().current(), Some((0, 3)));

        assert!(editor.replace_next("cat", "cow"));
        assert_eq!(editor.buffer().text(), "cow dog cat");
        assert_eq!(editor.search().current(), Some((8, 11)));

        assert!(editor.replace_next("cat", "cow"));
        assert_eq!(editor.buffer().text(), "cow dog cow");
        assert_eq!(editor.search().current(), None);
    }

    #[test]
    fn test_scroll_animation_restores_cursor() {
        let text = (1..=50).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        let mut editor = editor_at(&text);
        editor.set_viewport_height(10);

        let start = Instant::now();
        editor.scroll_to_line(20, 25, 1, start);
        assert!(editor.tick(start + Duration::from_millis(100)));
        assert!(editor.scroll_offset() < 20);

        assert!(!editor.tick(start + Duration::from_millis(300)));
        assert_eq!(editor.scroll_offset(), 20);
        assert_eq!(editor.current_line(), 26);
        assert_eq!(editor.current_column(), 1);
        assert!(!editor.is_scrolling());
    }

    #[test]
    fn test_new_scroll_replaces_previous() {
        let text = "x\n".repeat(100);
        let mut editor = editor_at(&text);
        let start = Instant::now();
        editor.scroll_to_line(50, 50, 0, start);
        editor.scroll_to_line(10, 10, 0, start);
        editor.tick(start + Duration::from_secs(1));
        assert_eq!(editor.scroll_offset(), 10);
        assert_eq!(editor.current_line(), 11);
    }

    #[test]
    fn test_ensure_visible_follows_cursor() {
        let text = "x\n".repeat(30);
        let mut editor = editor_at(&text);
        editor.set_viewport_height(5);
        editor.jump_to_line(20, false);
        assert_eq!(editor.scroll_offset(), 15);
        editor.execute(Action::MoveToStart);
        assert_eq!(editor.scroll_offset(), 0);
    }

    #[test]
    fn test_scroll_line_moves_cursor_at_edge() {
        let text = "x\n".repeat(30);
        let mut editor = editor_at(&text);
        editor.set_viewport_height(5);
        editor.execute(Action::ScrollLineDown);
        assert_eq!(editor.scroll_offset(), 1);
        assert_eq!(editor.current_line(), 2);
    }

    #[test]
    fn test_gutter_marks_origin_line() {
        let mut editor = editor_at("a\nb\n|c");
        editor.set_mark();
        let gutter = editor.gutter(0..3);
        assert!(gutter[2].is_mark_origin);
        assert!(!gutter[0].is_mark_origin);
    }

    #[test]
    fn test_open_file_bounds_history() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "x").unwrap();

        let config = EditorConfig {
            history_size: 2,
            ..EditorConfig::default()
        };
        let mut editor = Editor::open(&path, config).unwrap();
        for text in ["a", "b", "c", "d"] {
            editor.insert_text(text);
        }
        let mut undos = 0;
        while editor.buffer().can_undo() {
            editor.undo();
            undos += 1;
        }
        assert_eq!(undos, 2);
        assert_eq!(editor.buffer().text(), "abx");
    }

    #[test]
    fn test_save_clears_modified() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("note.rs");
        let mut editor = Editor::open(&path, EditorConfig::default()).unwrap();
        assert_eq!(
            editor
                .syntax_definition()
                .and_then(|def| def.comment_tokens.line.as_deref()),
            Some("//")
        );

        editor.insert_text("fn main() {}");
        assert!(editor.is_modified());
        editor.take_events();

        editor.save().unwrap();
        assert!(!editor.is_modified());
        assert_eq!(editor.take_events(), vec![EditorEvent::ModifiedChanged(false)]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fn main() {}");
    }
}
