// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 字段抽取级联
//!
//! 每个字段按固定优先级尝试规则表中的策略，第一个独立通过
//! 有效性检查的候选值胜出。单条策略的失败（选择器非法、区域
//! 结构异常）被就地吞掉，级联继续尝试下一条。

use crate::domain::models::character::{
    AttributePair, CharacterRecord, DESCRIPTION_UNAVAILABLE, TYPE_UNSPECIFIED,
};
use crate::domain::models::character::RawAttribute;
use crate::domain::services::attribute_prioritizer;
use crate::domain::services::extraction::infobox;
use crate::domain::services::extraction::rules::{
    SelectorRule, DESCRIPTION_RULES, IMAGE_EXTENSIONS, IMAGE_RULES, INVALID_IMAGE_PATTERNS,
    NAME_RULES, NAVIGATION_PHRASES, TINY_IMAGE_PATTERNS, TYPE_KEYWORDS,
};
use crate::engines::document::Document;
use crate::utils::text::{clean_text, truncate_with_ellipsis};
use crate::utils::url_utils::page_slug;
use chrono::Utc;
use tracing::debug;

/// 描述的最大长度（字符数）
const DESCRIPTION_MAX_CHARS: usize = 500;

/// 不可能作为角色名的标题前缀
const NON_NAME_PREFIXES: &[&str] = &[
    "category:", "file:", "template:", "user:", "talk:", "special:", "main page", "home",
];

/// 对单个字段执行规则级联
///
/// 返回第一个通过 `is_valid` 检查的清洗后候选值及其来源标签
pub fn extract_field(
    doc: &Document,
    rules: &[SelectorRule],
    is_valid: impl Fn(&str) -> bool,
) -> Option<(String, &'static str)> {
    for rule in rules {
        let candidates = match rule.attr {
            Some(attr) => doc.select_all_attr(rule.selector, attr),
            None => doc.select_all_text(rule.selector),
        };
        for candidate in candidates {
            let cleaned = clean_text(&candidate);
            if !cleaned.is_empty() && is_valid(&cleaned) {
                return Some((cleaned, rule.provenance));
            }
        }
    }
    None
}

/// 名称有效性检查
///
/// 至少2个非空白字符，不是纯数字，不是系统页面标题
pub fn is_plausible_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.chars().filter(|c| !c.is_whitespace()).count() < 2 {
        return false;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let lower = trimmed.to_lowercase();
    !NON_NAME_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// 抽取角色名称
///
/// 规则表未命中时退回URL片段
pub fn extract_name(doc: &Document) -> Option<String> {
    if let Some((name, provenance)) = extract_field(doc, NAME_RULES, is_plausible_name) {
        // Page <title> carries wiki suffixes like "Luke Skywalker | Wookieepedia"
        let name = match provenance {
            "html-title" | "og-title" => strip_title_suffix(&name),
            _ => name,
        };
        if is_plausible_name(&name) {
            debug!(provenance, name = %name, "name extracted");
            return Some(name);
        }
    }

    // Last resort: the article slug itself
    let slug = page_slug(doc.url())?;
    let cleaned = clean_text(&slug);
    if is_plausible_name(&cleaned) {
        debug!(name = %cleaned, "name extracted from url slug");
        Some(cleaned)
    } else {
        None
    }
}

fn strip_title_suffix(title: &str) -> String {
    title
        .split(" | ")
        .next()
        .and_then(|s| s.split(" - ").next())
        .unwrap_or(title)
        .trim()
        .to_string()
}

/// 图片URL有效性检查
///
/// 扩展名必须在白名单内，且不能命中占位图/图标/跟踪像素特征
pub fn is_valid_image_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    if !IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext)) {
        return false;
    }
    if INVALID_IMAGE_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
    {
        return false;
    }
    !TINY_IMAGE_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}

/// 抽取主图片并解析为绝对URL
pub fn extract_image(doc: &Document) -> Option<String> {
    let (raw, provenance) = extract_field(doc, IMAGE_RULES, is_valid_image_url)?;
    let absolute = doc.url().join(&raw).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    debug!(provenance, url = %absolute, "image extracted");
    Some(absolute.to_string())
}

/// 判断一段文本是否为导航样板而非正文描述
pub fn is_navigation_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    NAVIGATION_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
}

/// 抽取描述段落
///
/// 清洗后达到规则的最小长度且不含导航样板的第一段胜出，
/// 超长时截断并追加省略号
pub fn extract_description(doc: &Document) -> Option<String> {
    for rule in DESCRIPTION_RULES {
        for paragraph in doc.select_all_text(rule.selector) {
            let cleaned = clean_text(&paragraph);
            if cleaned.chars().count() >= rule.min_chars && !is_navigation_text(&cleaned) {
                debug!(provenance = rule.provenance, "description extracted");
                return Some(truncate_with_ellipsis(&cleaned, DESCRIPTION_MAX_CHARS));
            }
        }
    }
    None
}

/// 从结构化属性中抽取类型/角色
///
/// 第一个标签命中类型关键词表的属性值胜出
pub fn extract_role(attributes: &[RawAttribute]) -> Option<String> {
    attributes.iter().find_map(|attribute| {
        let label = attribute.label.to_lowercase();
        TYPE_KEYWORDS
            .iter()
            .any(|keyword| label.contains(keyword))
            .then(|| attribute.value.clone())
    })
}

/// 对一个实体页面执行完整抽取，产出候选记录
///
/// 未命中的字段解析为各自的占位值而不是空串；
/// 同一文档上重复执行结果逐字节一致
pub fn extract_record(doc: &Document, fandom_name: &str) -> CharacterRecord {
    let name = extract_name(doc).unwrap_or_default();
    let image_url = extract_image(doc);
    let description =
        extract_description(doc).unwrap_or_else(|| DESCRIPTION_UNAVAILABLE.to_string());

    let raw_attributes = infobox::scan_structured_regions(doc);
    let character_type =
        extract_role(&raw_attributes).unwrap_or_else(|| TYPE_UNSPECIFIED.to_string());
    let attributes: Vec<AttributePair> = attribute_prioritizer::prioritize(raw_attributes);

    CharacterRecord {
        name,
        image_url,
        description,
        character_type,
        attributes,
        source_url: doc.url().to_string(),
        fandom_name: fandom_name.to_string(),
        scraped_at: Utc::now(),
    }
}
