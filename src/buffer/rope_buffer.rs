use anyhow::{Context, Result};
use ropey::Rope;
use std::fs;
use std::path::{Path, PathBuf};

use super::history::{Action, History, DEFAULT_HISTORY_SIZE};

/// 以 rope 儲存的純文字文件
///
/// 位置一律是字元索引，範圍為 `[0, len_chars()]`。
/// 行以 `\n`、`\r\n` 或 `\r` 分隔，行內容不含換行符。
pub struct TextBuffer {
    rope: Rope,
    file_path: Option<PathBuf>,
    history: History,
    in_undo_redo: bool, // 防止在撤銷/重做時記錄歷史
    revision: u64,      // 每次修改遞增，用於判斷搜索結果是否過期
    encoding: &'static encoding_rs::Encoding,
    write_bom: bool,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::with_history(History::default())
    }

    pub fn with_history_size(max_size: usize) -> Self {
        Self::with_history(History::new(max_size))
    }

    fn with_history(history: History) -> Self {
        Self {
            rope: Rope::new(),
            file_path: None,
            history,
            in_undo_redo: false,
            revision: 0,
            encoding: encoding_rs::UTF_8,
            write_bom: false,
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.rope = Rope::from_str(text);
        buffer
    }

    /// 檢測文件編碼，基於 BOM
    fn detect_encoding(bytes: &[u8]) -> (&'static encoding_rs::Encoding, usize) {
        if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
            (encoding_rs::UTF_8, 3)
        } else if bytes.starts_with(&[0xFF, 0xFE]) {
            (encoding_rs::UTF_16LE, 2)
        } else if bytes.starts_with(&[0xFE, 0xFF]) {
            (encoding_rs::UTF_16BE, 2)
        } else {
            // 無 BOM，預設 UTF-8
            (encoding_rs::UTF_8, 0)
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_with_history_size(path, DEFAULT_HISTORY_SIZE)
    }

    /// 開啟文件並限制撤銷歷史的步數
    pub fn from_file_with_history_size(path: &Path, max_size: usize) -> Result<Self> {
        let mut buffer = Self::with_history_size(max_size);
        buffer.file_path = Some(path.to_path_buf());

        // 文件不存在時建立空緩衝區，存檔時才建立文件
        if !path.exists() {
            return Ok(buffer);
        }

        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        let (encoding, bom_length) = Self::detect_encoding(&bytes);
        let (decoded, _, had_errors) = encoding.decode(&bytes[bom_length..]);
        if had_errors {
            log::warn!("Encoding errors detected in file: {}", path.display());
        }

        buffer.rope = Rope::from_str(&decoded);
        buffer.encoding = encoding;
        buffer.write_bom = bom_length > 0;
        Ok(buffer)
    }

    pub fn save(&mut self) -> Result<()> {
        let path = self
            .file_path
            .clone()
            .context("No file path set")?;
        self.save_as(&path)
    }

    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        let contents = self.rope.to_string();
        let mut bytes = Vec::new();

        // encoding_rs 不支援編碼成 UTF-16，手動處理
        if self.encoding == encoding_rs::UTF_16LE || self.encoding == encoding_rs::UTF_16BE {
            let little = self.encoding == encoding_rs::UTF_16LE;
            if self.write_bom {
                bytes.extend_from_slice(if little { &[0xFF, 0xFE] } else { &[0xFE, 0xFF] });
            }
            for unit in contents.encode_utf16() {
                let pair = if little {
                    unit.to_le_bytes()
                } else {
                    unit.to_be_bytes()
                };
                bytes.extend_from_slice(&pair);
            }
        } else {
            if self.write_bom && self.encoding == encoding_rs::UTF_8 {
                bytes.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
            }
            let (encoded, _, had_errors) = self.encoding.encode(&contents);
            if had_errors {
                log::warn!(
                    "Encoding errors occurred while saving file: {}",
                    path.display()
                );
            }
            bytes.extend_from_slice(&encoded);
        }

        fs::write(path, bytes)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        self.file_path = Some(path.to_path_buf());
        self.history.mark_clean();
        Ok(())
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn file_name(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("[No Name]")
            .to_string()
    }

    pub fn encoding(&self) -> &'static encoding_rs::Encoding {
        self.encoding
    }

    // ---- 位置與行列換算 ----

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn clamp(&self, pos: usize) -> usize {
        pos.min(self.rope.len_chars())
    }

    pub fn line_of(&self, pos: usize) -> usize {
        self.rope.char_to_line(self.clamp(pos))
    }

    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return self.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// 行內容結束的位置（換行符之前）
    pub fn line_end(&self, line: usize) -> usize {
        self.line_start(line) + self.line_len(line)
    }

    /// 行長度（不包含換行符）
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return 0;
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        while len > 0 && matches!(slice.char(len - 1), '\n' | '\r') {
            len -= 1;
        }
        len
    }

    pub fn column_of(&self, pos: usize) -> usize {
        let pos = self.clamp(pos);
        pos - self.line_start(self.line_of(pos))
    }

    /// 將 (行, 列) 轉為位置，超出範圍時夾在行尾或文件尾
    pub fn position_of(&self, line: usize, column: usize) -> usize {
        let line = line.min(self.line_count().saturating_sub(1));
        self.line_start(line) + column.min(self.line_len(line))
    }

    pub fn line_text(&self, line: usize) -> String {
        if line >= self.line_count() {
            return String::new();
        }
        self.slice(self.line_start(line), self.line_end(line))
    }

    /// 往後一個字元的位置；`\r\n` 視為一個字元跨過
    pub fn next_char_boundary(&self, pos: usize) -> usize {
        let pos = self.clamp(pos);
        if pos >= self.len_chars() {
            return pos;
        }
        if self.char_at(pos) == Some('\r') && self.char_at(pos + 1) == Some('\n') {
            pos + 2
        } else {
            pos + 1
        }
    }

    /// 往前一個字元的位置；`\r\n` 視為一個字元跨過
    pub fn prev_char_boundary(&self, pos: usize) -> usize {
        let pos = self.clamp(pos);
        if pos == 0 {
            return 0;
        }
        if pos >= 2 && self.char_at(pos - 1) == Some('\n') && self.char_at(pos - 2) == Some('\r') {
            pos - 2
        } else {
            pos - 1
        }
    }

    /// 文件使用的換行符，以第一個換行為準；單行文件為 `\n`
    pub fn line_break(&self) -> &'static str {
        if self.line_count() < 2 {
            return "\n";
        }
        let end = self.line_end(0);
        match (self.char_at(end), self.char_at(end + 1)) {
            (Some('\r'), Some('\n')) => "\r\n",
            (Some('\r'), _) => "\r",
            _ => "\n",
        }
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        if pos < self.rope.len_chars() {
            Some(self.rope.char(pos))
        } else {
            None
        }
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = self.clamp(end);
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// 從 `from` 開始向前尋找 `needle`，回傳 (開始, 結束)
    pub fn find(&self, needle: &str, from: usize, case_sensitive: bool) -> Option<(usize, usize)> {
        if needle.is_empty() {
            return None;
        }
        let from = self.clamp(from);

        // 逐字元摺疊大小寫，確保位置與原文一致
        let fold = |c: char| {
            if case_sensitive {
                c
            } else {
                c.to_lowercase().next().unwrap_or(c)
            }
        };
        let pattern: Vec<char> = needle.chars().map(fold).collect();
        let len = self.rope.len_chars();
        if pattern.len() > len - from {
            return None;
        }

        // 直接在 rope 上比對，不複製剩餘內容
        let first = pattern[0];
        self.rope
            .chars_at(from)
            .enumerate()
            .take(len - from - pattern.len() + 1)
            .filter(|(_, c)| fold(*c) == first)
            .map(|(idx, _)| from + idx)
            .find(|&start| {
                self.rope
                    .chars_at(start)
                    .take(pattern.len())
                    .map(fold)
                    .eq(pattern.iter().copied())
            })
            .map(|start| (start, start + pattern.len()))
    }

    // ---- 修改 ----

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn insert(&mut self, pos: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let pos = self.clamp(pos);

        if !self.in_undo_redo {
            self.history.push(Action::Insert {
                pos,
                text: text.to_string(),
            });
        }

        self.rope.insert(pos, text);
        self.revision += 1;
    }

    pub fn remove(&mut self, start: usize, end: usize) {
        let end = self.clamp(end);
        let start = start.min(end);
        if start == end {
            return;
        }

        let deleted_text = self.rope.slice(start..end).to_string();
        if !self.in_undo_redo {
            self.history.push(Action::Delete {
                pos: start,
                text: deleted_text,
            });
        }

        self.rope.remove(start..end);
        self.revision += 1;
    }

    pub fn replace(&mut self, start: usize, end: usize, text: &str) {
        self.begin_edit_group();
        self.remove(start, end);
        self.insert(start, text);
        self.end_edit_group();
    }

    pub fn begin_edit_group(&mut self) {
        self.history.begin_group();
    }

    pub fn end_edit_group(&mut self) {
        self.history.end_group();
    }

    pub fn is_modified(&self) -> bool {
        !self.history.is_clean()
    }

    pub fn set_modified(&mut self, modified: bool) {
        if !modified {
            self.history.mark_clean();
        }
    }

    // 撤銷/重做方法，回傳光標應放置的位置
    pub fn undo(&mut self) -> Option<usize> {
        if self.history.in_group() {
            return None;
        }
        let group = self.history.undo()?;
        self.in_undo_redo = true;

        let mut result_pos = 0;
        for action in group.iter().rev() {
            match action {
                Action::Insert { pos, text } => {
                    // 撤銷插入 = 刪除
                    self.rope.remove(*pos..pos + text.chars().count());
                    result_pos = *pos;
                }
                Action::Delete { pos, text } => {
                    // 撤銷刪除 = 插入
                    self.rope.insert(*pos, text);
                    result_pos = pos + text.chars().count();
                }
            }
        }

        self.in_undo_redo = false;
        self.revision += 1;
        Some(result_pos)
    }

    pub fn redo(&mut self) -> Option<usize> {
        if self.history.in_group() {
            return None;
        }
        let group = self.history.redo()?;
        self.in_undo_redo = true;

        let mut result_pos = 0;
        for action in &group {
            match action {
                Action::Insert { pos, text } => self.rope.insert(*pos, text),
                Action::Delete { pos, text } => {
                    self.rope.remove(*pos..pos + text.chars().count());
                }
            }
            result_pos = action.end_pos();
        }

        self.in_undo_redo = false;
        self.revision += 1;
        Some(result_pos)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_line_addressing() {
        let buffer = TextBuffer::from_text("ab\ncde\n\nf");
        assert_eq!(buffer.line_count(), 4);
        assert_eq!(buffer.line_start(1), 3);
        assert_eq!(buffer.line_end(1), 6);
        assert_eq!(buffer.line_len(2), 0);
        assert_eq!(buffer.line_of(6), 1);
        assert_eq!(buffer.line_of(7), 2);
        assert_eq!(buffer.column_of(5), 2);
        assert_eq!(buffer.position_of(1, 99), 6);
        assert_eq!(buffer.position_of(99, 0), 8);
        assert_eq!(buffer.line_text(3), "f");
    }

    #[test]
    fn test_crlf_line_len_excludes_break() {
        let buffer = TextBuffer::from_text("ab\r\ncd");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line_len(0), 2);
        assert_eq!(buffer.line_start(1), 4);
    }

    #[test]
    fn test_char_boundaries_step_over_crlf() {
        let buffer = TextBuffer::from_text("ab\r\ncd");
        assert_eq!(buffer.next_char_boundary(2), 4);
        assert_eq!(buffer.prev_char_boundary(4), 2);
        assert_eq!(buffer.next_char_boundary(1), 2);
        assert_eq!(buffer.prev_char_boundary(0), 0);
        assert_eq!(buffer.next_char_boundary(6), 6);

        // 單獨的 \r 仍是一個字元
        let buffer = TextBuffer::from_text("a\rb");
        assert_eq!(buffer.next_char_boundary(1), 2);
    }

    #[test]
    fn test_line_break_detection() {
        assert_eq!(TextBuffer::from_text("a\r\nb\nc").line_break(), "\r\n");
        assert_eq!(TextBuffer::from_text("a\rb").line_break(), "\r");
        assert_eq!(TextBuffer::from_text("a\nb").line_break(), "\n");
        assert_eq!(TextBuffer::from_text("single").line_break(), "\n");
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_end(0), 0);
        assert_eq!(buffer.line_of(10), 0);
        assert_eq!(buffer.char_at(0), None);
    }

    #[test]
    fn test_find_case_sensitivity() {
        let buffer = TextBuffer::from_text("Cat cat");
        assert_eq!(buffer.find("cat", 0, true), Some((4, 7)));
        assert_eq!(buffer.find("cat", 0, false), Some((0, 3)));
        assert_eq!(buffer.find("cat", 5, false), None);
        assert_eq!(buffer.find("", 0, true), None);
    }

    #[test]
    fn test_find_at_document_edges() {
        let buffer = TextBuffer::from_text("héllo wörld wörld");
        assert_eq!(buffer.find("wörld", 0, true), Some((6, 11)));
        assert_eq!(buffer.find("wörld", 7, true), Some((12, 17)));
        assert_eq!(buffer.find("WÖRLD", 13, false), None);
        assert_eq!(buffer.find("d", 17, true), None);
        assert_eq!(buffer.find("longer than the document", 0, true), None);
    }

    #[test]
    fn test_undo_redo_group() {
        let mut buffer = TextBuffer::from_text("hello");
        buffer.begin_edit_group();
        buffer.remove(0, 1);
        buffer.insert(0, "J");
        buffer.end_edit_group();
        assert_eq!(buffer.text(), "Jello");
        assert!(buffer.is_modified());

        assert_eq!(buffer.undo(), Some(1));
        assert_eq!(buffer.text(), "hello");
        assert!(!buffer.is_modified());

        buffer.redo();
        assert_eq!(buffer.text(), "Jello");
    }

    #[test]
    fn test_revision_increments() {
        let mut buffer = TextBuffer::from_text("abc");
        let before = buffer.revision();
        buffer.insert(1, "x");
        assert!(buffer.revision() > before);
        let before = buffer.revision();
        buffer.remove(2, 2);
        assert_eq!(buffer.revision(), before);
    }

    #[test]
    fn test_utf8_bom_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("bom.txt");

        let mut content = vec![0xEF, 0xBB, 0xBF];
        content.extend_from_slice("Hello, 世界!".as_bytes());
        fs::write(&file_path, &content).unwrap();

        let mut buffer = TextBuffer::from_file(&file_path).unwrap();
        assert_eq!(buffer.text(), "Hello, 世界!");
        assert_eq!(buffer.encoding().name(), "UTF-8");

        buffer.save().unwrap();
        assert_eq!(fs::read(&file_path).unwrap(), content);
    }

    #[test]
    fn test_utf16le_bom_detection() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("utf16le.txt");

        let mut content = vec![0xFF, 0xFE];
        let utf16_bytes: Vec<u8> = "Hello"
            .encode_utf16()
            .flat_map(|c| c.to_le_bytes())
            .collect();
        content.extend_from_slice(&utf16_bytes);
        fs::write(&file_path, &content).unwrap();

        let mut buffer = TextBuffer::from_file(&file_path).unwrap();
        assert_eq!(buffer.encoding().name(), "UTF-16LE");
        assert_eq!(buffer.text(), "Hello");

        buffer.save().unwrap();
        assert_eq!(fs::read(&file_path).unwrap(), content);
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("new.txt");

        let mut buffer = TextBuffer::from_file(&file_path).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.file_name(), "new.txt");

        buffer.insert(0, "x");
        assert!(buffer.is_modified());
        buffer.save().unwrap();
        assert!(!buffer.is_modified());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "x");
    }
}
