//! markpad - 帶 Emacs 風格標記選擇的純文字編輯核心與終端前端

pub mod app;
pub mod buffer;
pub mod clipboard;
pub mod comment;
pub mod config;
pub mod cursor;
pub mod dialog;
mod edit;
pub mod editor;
pub mod events;
pub mod gutter;
pub mod input;
pub mod mark;
pub mod scroll;
pub mod search;
pub mod terminal;
pub mod utils;
pub mod view;
pub mod word;

// 重新導出常用類型
pub use buffer::TextBuffer;
pub use config::EditorConfig;
pub use cursor::{Cursor, Movement};
pub use editor::{Editor, KeyOutcome};
pub use events::EditorEvent;
pub use input::{Action, Dispatcher, EditingMode};
