// Emacs 風格的標記（mark）狀態機
//
// 標記啟用時，所有非破壞性移動都會延伸選擇而不是收合它。

use crate::buffer::TextBuffer;
use crate::cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkTransition {
    Set,
    Unset,
    /// 標記維持啟用，選擇收合到活動點
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SavedMark {
    active: bool,
    anchor: usize,
}

#[derive(Debug, Default)]
pub struct Mark {
    active: bool,
    saved: Option<SavedMark>,
}

impl Mark {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_mark(&mut self, cursor: &mut Cursor) -> MarkTransition {
        if !self.active {
            self.active = true;
            cursor.clear_selection();
            MarkTransition::Set
        } else if cursor.has_selection() {
            cursor.clear_selection();
            MarkTransition::Collapsed
        } else {
            self.active = false;
            MarkTransition::Unset
        }
    }

    /// 取消標記，回傳先前是否啟用
    pub fn unset(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    /// 交換錨點與活動點
    pub fn exchange(&self, buffer: &TextBuffer, cursor: &mut Cursor) -> bool {
        if !cursor.has_selection() {
            return false;
        }
        let (anchor, position) = (cursor.anchor, cursor.position);
        cursor.select(buffer, position, anchor);
        true
    }

    /// 失去焦點前保存標記狀態
    pub fn save_status(&mut self, cursor: &Cursor) {
        self.saved = Some(SavedMark {
            active: self.active,
            anchor: cursor.anchor,
        });
    }

    /// 恢復保存的標記，並重新建立選擇
    pub fn restore_status(&mut self, buffer: &TextBuffer, cursor: &mut Cursor) -> bool {
        let Some(saved) = self.saved.take() else {
            return false;
        };
        self.active = saved.active;
        if saved.active {
            let position = cursor.position;
            cursor.select(buffer, saved.anchor, position);
        }
        true
    }
}
