// 關鍵字搜索與高亮

use crate::buffer::TextBuffer;

pub type Span = (usize, usize);

/// 一次搜索的結果：依位置排序、互不重疊的匹配範圍，以及目前的匹配
pub struct KeywordSearch {
    keyword: String,
    case_sensitive: bool,
    matches: Vec<Span>,
    current: Option<usize>,
    revision: u64, // 計算匹配時的緩衝區版本
}

impl KeywordSearch {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            keyword: String::new(),
            case_sensitive,
            matches: Vec::new(),
            current: None,
            revision: 0,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        if self.case_sensitive != case_sensitive {
            self.case_sensitive = case_sensitive;
            // 下次使用時重新計算
            self.revision = u64::MAX;
        }
    }

    /// 對整份文件搜索，掃描從每個匹配的結尾繼續
    pub fn search(&mut self, buffer: &TextBuffer, keyword: &str) -> &[Span] {
        self.keyword = keyword.to_string();
        self.recompute(buffer);
        &self.matches
    }

    fn recompute(&mut self, buffer: &TextBuffer) {
        self.matches.clear();
        self.current = None;
        self.revision = buffer.revision();

        let mut from = 0;
        while let Some(span) = buffer.find(&self.keyword, from, self.case_sensitive) {
            self.matches.push(span);
            from = span.1;
        }
        log::debug!(
            "search {:?}: {} matches",
            self.keyword,
            self.matches.len()
        );
    }

    pub fn is_stale(&self, buffer: &TextBuffer) -> bool {
        self.revision != buffer.revision()
    }

    /// 文件改變過就重新搜索
    pub fn refresh(&mut self, buffer: &TextBuffer) {
        if !self.keyword.is_empty() && self.is_stale(buffer) {
            self.recompute(buffer);
        }
    }

    /// 移到 `position` 之後（或之前）的第一個匹配，找不到時從另一端重試一次
    pub fn advance(&mut self, buffer: &TextBuffer, position: usize, forward: bool) -> Option<Span> {
        self.refresh(buffer);

        let found = if forward {
            self.matches
                .iter()
                .position(|&(_, end)| end > position)
                .or_else(|| (!self.matches.is_empty()).then_some(0))
        } else {
            // 繞回時取最後一個匹配，包括剛好結束在文件尾的
            self.matches
                .iter()
                .rposition(|&(_, end)| end < position)
                .or(self.matches.len().checked_sub(1))
        };

        match found {
            Some(index) => {
                self.current = Some(index);
                Some(self.matches[index])
            }
            None => {
                self.clear();
                None
            }
        }
    }

    pub fn current(&self) -> Option<Span> {
        self.current.map(|index| self.matches[index])
    }

    /// 目前匹配的索引（0-based）
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn matches(&self) -> &[Span] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_active(&self) -> bool {
        !self.matches.is_empty()
    }

    /// 清除所有高亮，保留大小寫設定
    pub fn clear(&mut self) {
        self.keyword.clear();
        self.matches.clear();
        self.current = None;
    }
}

impl Default for KeywordSearch {
    fn default() -> Self {
        Self::new(true)
    }
}
