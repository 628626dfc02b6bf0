// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 文本清洗模块
//!
//! 为抽取到的字段值提供统一的清洗功能：
//! - 压缩连续空白
//! - 去除控制字符
//! - 去除残留的HTML标签片段
//! - 带省略号的长度截断

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static HTML_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// 清洗一个字段值
///
/// 去除控制字符与HTML标签残片，并把连续空白压缩为单个空格
pub fn clean_text(raw: &str) -> String {
    let without_tags = HTML_TAGS.replace_all(raw, " ");
    let without_control: String = without_tags
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    WHITESPACE_RUNS
        .replace_all(&without_control, " ")
        .trim()
        .to_string()
}

/// 截断到最大长度并追加省略号
///
/// 截断发生在字符边界上，不会切断多字节字符
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Luke \n\t Skywalker  "), "Luke Skywalker");
    }

    #[test]
    fn test_clean_text_strips_markup_fragments() {
        assert_eq!(
            clean_text("A <b>Jedi</b> Knight<br/>of the Republic"),
            "A Jedi Knight of the Republic"
        );
    }

    #[test]
    fn test_clean_text_strips_control_characters() {
        assert_eq!(clean_text("Han\u{0000} Solo\u{0007}"), "Han Solo");
        assert_eq!(clean_text("Han\nSolo"), "Han Solo");
    }

    #[test]
    fn test_truncate_long_text() {
        let long = "a".repeat(600);
        let out = truncate_with_ellipsis(&long, 500);
        assert_eq!(out.chars().count(), 503);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_with_ellipsis("short", 500), "short");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(10);
        let out = truncate_with_ellipsis(&text, 5);
        assert!(out.starts_with(&"é".repeat(5)));
    }
}
