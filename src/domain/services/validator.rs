// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 记录校验与修正
//!
//! 校验是一个判别结果（Accepted/Rejected），被拒是高频的预期
//! 结果而不是错误。名称无效时先尝试从结构化属性中修正，
//! 全部失败才拒绝整条记录。

use crate::domain::models::character::{
    AcceptedRecord, CharacterRecord, ATTRIBUTE_UNSPECIFIED, DESCRIPTION_UNAVAILABLE,
    TYPE_UNSPECIFIED,
};
use tracing::debug;

/// 无效名称特征短语，大小写不敏感的子串匹配
const INVALID_NAME_PHRASES: &[&str] = &[
    "unknown",
    "unnamed",
    "name unknown",
    "nom inconnu",
    "character_",
    "personnage_",
    "n/a",
    "none",
    "null",
    "error",
    "erreur",
    "not found",
    "missing",
    "no name",
    "not available",
    "non disponible",
    "not specified",
];

/// 校验结果
#[derive(Debug)]
pub enum Validation {
    /// 记录通过校验；`corrected` 标记名称是否来自属性修正
    Accepted {
        record: AcceptedRecord,
        corrected: bool,
    },
    /// 记录被丢弃（计入过滤统计，不作为硬错误传播）
    Rejected { reason: String },
}

/// 判断一个名称是否无效
pub fn is_invalid_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.chars().count() < 2 {
        return true;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    let lower = trimmed.to_lowercase();
    INVALID_NAME_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
}

/// 从属性文本中提取候选名称
///
/// `Label: Value` 格式取Value部分，否则取整段文本
fn name_from_attribute(text: &str) -> String {
    match text.split_once(':') {
        Some((_, value)) => value.trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// 确定记录的有效名称
///
/// 主名称无效时按优先级扫描属性值，第一个通过校验的候选胜出
fn resolve_name(record: &CharacterRecord) -> Option<(String, bool)> {
    let primary = record.name.trim();
    if !primary.is_empty() && !is_invalid_name(primary) {
        return Some((primary.to_string(), false));
    }

    for attribute in &record.attributes {
        let candidate = name_from_attribute(&attribute.value);
        if !candidate.is_empty() && !is_invalid_name(&candidate) {
            debug!(
                from = %attribute.name,
                name = %candidate,
                "name corrected from attribute"
            );
            return Some((candidate, true));
        }
    }
    None
}

/// 校验一条候选记录
///
/// 接受时无条件执行字段清理：空的或占位的描述/类型/属性替换为
/// 各自的占位值；scheme不合法的图片URL置空而不是整条拒绝
pub fn validate(record: CharacterRecord) -> Validation {
    let Some((name, corrected)) = resolve_name(&record) else {
        return Validation::Rejected {
            reason: format!("invalid name '{}'", record.name.trim()),
        };
    };

    let mut accepted = AcceptedRecord::from_candidate(record, name);

    if accepted.description.trim().is_empty() {
        accepted.description = DESCRIPTION_UNAVAILABLE.to_string();
    }
    if accepted.character_type.trim().is_empty() {
        accepted.character_type = TYPE_UNSPECIFIED.to_string();
    }
    if accepted.attribute1_value.trim().is_empty() {
        accepted.attribute1_value = ATTRIBUTE_UNSPECIFIED.to_string();
    }
    if accepted.attribute2_value.trim().is_empty() {
        accepted.attribute2_value = ATTRIBUTE_UNSPECIFIED.to_string();
    }
    if let Some(image_url) = &accepted.image_url {
        if !image_url.starts_with("http://") && !image_url.starts_with("https://") {
            accepted.image_url = None;
        }
    }

    Validation::Accepted {
        record: accepted,
        corrected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::character::AttributePair;
    use chrono::Utc;

    fn candidate(name: &str, attributes: Vec<AttributePair>) -> CharacterRecord {
        CharacterRecord {
            name: name.to_string(),
            image_url: Some("https://static.wikia.net/spidey.jpg".to_string()),
            description: "A friendly neighborhood hero with spider powers.".to_string(),
            character_type: "Superhero".to_string(),
            attributes,
            source_url: "https://marvel.fandom.com/wiki/Spider-Man".to_string(),
            fandom_name: "marvel".to_string(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_name_accepted() {
        match validate(candidate("Spider-Man", vec![])) {
            Validation::Accepted { record, corrected } => {
                assert_eq!(record.name, "Spider-Man");
                assert!(!corrected);
            }
            Validation::Rejected { reason } => panic!("rejected: {}", reason),
        }
    }

    #[test]
    fn test_scenario_b_name_corrected_from_attribute() {
        let record = candidate(
            "Unknown",
            vec![AttributePair::new("Identity", "Real Name: Peter Parker")],
        );
        match validate(record) {
            Validation::Accepted { record, corrected } => {
                assert_eq!(record.name, "Peter Parker");
                assert!(corrected);
            }
            Validation::Rejected { reason } => panic!("rejected: {}", reason),
        }
    }

    #[test]
    fn test_correction_uses_whole_text_without_colon() {
        let record = candidate("", vec![AttributePair::new("Alias", "Ben Reilly")]);
        match validate(record) {
            Validation::Accepted { record, corrected } => {
                assert_eq!(record.name, "Ben Reilly");
                assert!(corrected);
            }
            Validation::Rejected { reason } => panic!("rejected: {}", reason),
        }
    }

    #[test]
    fn test_unrecoverable_name_rejected() {
        let record = candidate(
            "Unknown",
            vec![AttributePair::new("Status", "Status: N/A")],
        );
        assert!(matches!(validate(record), Validation::Rejected { .. }));
    }

    #[test]
    fn test_pure_digit_name_rejected() {
        assert!(is_invalid_name("42"));
        assert!(is_invalid_name(" 1234 "));
        assert!(!is_invalid_name("C-3PO"));
    }

    #[test]
    fn test_minimum_length_counts_chars_not_bytes() {
        // A single multibyte character is still only one character
        assert!(is_invalid_name("王"));
        assert!(!is_invalid_name("李白"));
    }

    #[test]
    fn test_invalid_phrases_rejected() {
        assert!(is_invalid_name("Name Unknown"));
        assert!(is_invalid_name("not found"));
        assert!(is_invalid_name("N/A"));
        assert!(!is_invalid_name("Anakin Skywalker"));
    }

    #[test]
    fn test_bad_image_scheme_nulled_not_fatal() {
        let mut record = candidate("Spider-Man", vec![]);
        record.image_url = Some("ftp://files.example.com/spidey.jpg".to_string());
        match validate(record) {
            Validation::Accepted { record, .. } => assert!(record.image_url.is_none()),
            Validation::Rejected { reason } => panic!("rejected: {}", reason),
        }
    }

    #[test]
    fn test_empty_fields_get_sentinels() {
        let mut record = candidate("Spider-Man", vec![]);
        record.description = "  ".to_string();
        record.character_type = String::new();
        match validate(record) {
            Validation::Accepted { record, .. } => {
                assert_eq!(record.description, DESCRIPTION_UNAVAILABLE);
                assert_eq!(record.character_type, TYPE_UNSPECIFIED);
                assert_eq!(record.attribute1_name, "Attribute 1");
                assert_eq!(record.attribute1_value, ATTRIBUTE_UNSPECIFIED);
            }
            Validation::Rejected { reason } => panic!("rejected: {}", reason),
        }
    }
}
