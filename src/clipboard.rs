use anyhow::Result;

/// 剪貼簿介面，編輯器只透過它讀寫文字
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
    fn get_text(&mut self) -> Result<String>;
}

/// 系統剪貼簿；無法使用時（如無圖形界面）退回內部緩衝
pub struct SystemClipboard {
    clipboard: Option<arboard::Clipboard>,
    fallback: String,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                log::warn!("System clipboard not available, using internal clipboard: {err}");
                None
            }
        };
        Self {
            clipboard,
            fallback: String::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.clipboard.is_some()
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.fallback = text.to_string();
        if let Some(clipboard) = &mut self.clipboard {
            clipboard.set_text(text)?;
        }
        Ok(())
    }

    fn get_text(&mut self) -> Result<String> {
        match &mut self.clipboard {
            Some(clipboard) => Ok(clipboard.get_text()?),
            None => Ok(self.fallback.clone()),
        }
    }
}

/// 只存在記憶體中的剪貼簿
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    text: String,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = text.to_string();
        Ok(())
    }

    fn get_text(&mut self) -> Result<String> {
        Ok(self.text.clone())
    }
}
