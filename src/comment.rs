// 註解符號與語法定義查詢

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentTokens {
    pub line: Option<String>, // 單行註解，如 "//"
    pub block: Option<(String, String)>, // 塊註解，如 "/*" 和 "*/"
}

impl CommentTokens {
    pub fn is_empty(&self) -> bool {
        self.line.is_none() && self.block.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDefinition {
    pub name: String,
    pub comment_tokens: CommentTokens,
}

/// 依檔名查詢語法定義
pub trait SyntaxDefinitions {
    fn definition_for_filename(&self, name: &str) -> Option<SyntaxDefinition>;
}

struct BuiltinEntry {
    name: &'static str,
    extensions: &'static [&'static str],
    line: Option<&'static str>,
    block: Option<(&'static str, &'static str)>,
}

static BUILTIN_ENTRIES: &[BuiltinEntry] = &[
    BuiltinEntry {
        name: "C-like",
        extensions: &[
            "rs", "c", "cpp", "cc", "cxx", "h", "hpp", "java", "js", "ts", "jsx", "tsx", "go",
            "cs", "php", "swift", "kt", "scala", "dart",
        ],
        line: Some("//"),
        block: Some(("/*", "*/")),
    },
    BuiltinEntry {
        name: "Script",
        extensions: &["py", "sh", "bash", "zsh", "rb", "pl", "yaml", "yml", "toml", "ps1", "r"],
        line: Some("#"),
        block: None,
    },
    BuiltinEntry {
        name: "SQL-like",
        extensions: &["sql", "lua", "hs", "elm"],
        line: Some("--"),
        block: None,
    },
    BuiltinEntry {
        name: "Batch",
        extensions: &["bat", "cmd"],
        line: Some("REM"),
        block: None,
    },
    BuiltinEntry {
        name: "Vim",
        extensions: &["vim", "vimrc"],
        line: Some("\""),
        block: None,
    },
    BuiltinEntry {
        name: "Markup",
        extensions: &["html", "htm", "xml", "svg", "md"],
        line: None,
        block: Some(("<!--", "-->")),
    },
    BuiltinEntry {
        name: "CSS",
        extensions: &["css", "scss", "less"],
        line: None,
        block: Some(("/*", "*/")),
    },
];

static BUILTIN_BY_EXTENSION: Lazy<HashMap<&'static str, &'static BuiltinEntry>> = Lazy::new(|| {
    BUILTIN_ENTRIES
        .iter()
        .flat_map(|entry| entry.extensions.iter().map(move |ext| (*ext, entry)))
        .collect()
});

/// 內建的副檔名對照表
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinDefinitions;

impl SyntaxDefinitions for BuiltinDefinitions {
    fn definition_for_filename(&self, name: &str) -> Option<SyntaxDefinition> {
        let extension = Path::new(name)
            .extension()
            .and_then(|s| s.to_str())?
            .to_ascii_lowercase();
        let entry = BUILTIN_BY_EXTENSION.get(extension.as_str())?;

        Some(SyntaxDefinition {
            name: entry.name.to_string(),
            comment_tokens: CommentTokens {
                line: entry.line.map(str::to_string),
                block: entry.block.map(|(s, e)| (s.to_string(), e.to_string())),
            },
        })
    }
}

/// 行首縮排的字元數
pub fn indent_columns(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// 檢查一行是否已經有註解
pub fn is_commented(line: &str, token: &str) -> bool {
    line.trim_start().starts_with(token)
}

/// 註解符號（連同其後一個空格）所佔的列範圍
pub fn comment_span(line: &str, token: &str) -> Option<(usize, usize)> {
    if !is_commented(line, token) {
        return None;
    }
    let start = indent_columns(line);
    let mut end = start + token.chars().count();
    if line.chars().nth(end) == Some(' ') {
        end += 1;
    }
    Some((start, end))
}

/// 已被塊註解包住時去掉外殼，否則包上一層
pub fn toggle_block_comment(text: &str, start: &str, end: &str) -> String {
    if let Some(inner) = text
        .strip_prefix(start)
        .and_then(|rest| rest.strip_suffix(end))
    {
        return inner.to_string();
    }
    format!("{}{}{}", start, text, end)
}
