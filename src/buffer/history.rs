// 撤銷/重做歷史管理（以編輯群組為單位）

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Insert { pos: usize, text: String },
    Delete { pos: usize, text: String },
}

impl Action {
    fn char_len(text: &str) -> usize {
        text.chars().count()
    }

    /// 動作結束後的位置（重做時光標落點）
    pub fn end_pos(&self) -> usize {
        match self {
            Action::Insert { pos, text } => pos + Self::char_len(text),
            Action::Delete { pos, .. } => *pos,
        }
    }
}

/// 一個編輯群組：撤銷/重做時視為一步
pub type Group = Vec<Action>;

/// 預設保留的撤銷步數
pub const DEFAULT_HISTORY_SIZE: usize = 1000;

pub struct History {
    undo_stack: Vec<Group>,
    redo_stack: Vec<Group>,
    max_size: usize,
    // 正在累積的群組與巢狀深度
    pending: Group,
    depth: usize,
    // 與存檔狀態一致時 undo_stack 的長度
    clean_len: Option<usize>,
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            pending: Vec::new(),
            depth: 0,
            clean_len: Some(0),
        }
    }

    pub fn begin_group(&mut self) {
        self.depth += 1;
    }

    pub fn end_group(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        if self.depth == 0 {
            self.commit_pending();
        }
    }

    pub fn in_group(&self) -> bool {
        self.depth > 0
    }

    pub fn push(&mut self, action: Action) {
        self.pending.push(action);
        if self.depth == 0 {
            self.commit_pending();
        }
    }

    fn commit_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let group = std::mem::take(&mut self.pending);

        // 乾淨點在重做堆疊中，清空重做後就無法再回到
        if let Some(clean) = self.clean_len {
            if clean > self.undo_stack.len() {
                self.clean_len = None;
            }
        }

        if self.undo_stack.len() >= self.max_size {
            self.undo_stack.remove(0);
            self.clean_len = self.clean_len.and_then(|c| c.checked_sub(1));
        }
        self.undo_stack.push(group);
        self.redo_stack.clear();
    }

    pub fn undo(&mut self) -> Option<Group> {
        let group = self.undo_stack.pop()?;
        self.redo_stack.push(group.clone());
        Some(group)
    }

    pub fn redo(&mut self) -> Option<Group> {
        let group = self.redo_stack.pop()?;
        self.undo_stack.push(group.clone());
        Some(group)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn mark_clean(&mut self) {
        self.clean_len = Some(self.undo_stack.len());
    }

    pub fn is_clean(&self) -> bool {
        self.pending.is_empty() && self.clean_len == Some(self.undo_stack.len())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(pos: usize, text: &str) -> Action {
        Action::Insert {
            pos,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_group_is_single_undo_step() {
        let mut history = History::default();
        history.begin_group();
        history.push(insert(0, "a"));
        history.push(insert(1, "b"));
        history.end_group();

        let group = history.undo().unwrap();
        assert_eq!(group.len(), 2);
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }

    #[test]
    fn test_nested_groups_commit_at_outermost() {
        let mut history = History::default();
        history.begin_group();
        history.begin_group();
        history.push(insert(0, "a"));
        history.end_group();
        assert!(!history.can_undo());
        history.push(insert(1, "b"));
        history.end_group();

        assert_eq!(history.undo().unwrap().len(), 2);
    }

    #[test]
    fn test_clean_point_tracking() {
        let mut history = History::default();
        assert!(history.is_clean());
        history.push(insert(0, "a"));
        assert!(!history.is_clean());
        history.mark_clean();
        history.push(insert(1, "b"));
        history.undo();
        assert!(history.is_clean());
    }

    #[test]
    fn test_new_edit_after_undo_past_clean_point_drops_it() {
        let mut history = History::default();
        history.push(insert(0, "a"));
        history.mark_clean();
        history.undo();
        history.push(insert(0, "b"));
        assert!(!history.is_clean());
        history.undo();
        assert!(!history.is_clean());
    }

    #[test]
    fn test_bounded_size() {
        let mut history = History::new(2);
        history.push(insert(0, "a"));
        history.push(insert(1, "b"));
        history.push(insert(2, "c"));
        assert!(history.undo().is_some());
        assert!(history.undo().is_some());
        assert!(history.undo().is_none());
    }
}
