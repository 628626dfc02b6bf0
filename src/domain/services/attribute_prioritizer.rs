// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 属性优先级排序
//!
//! 对结构化区域扫描出的标签/值对打分，保留信息量最高的前K个。
//! 打分规则：标签命中领域关键词 +2/个，值非平凡 +1，值为
//! 泛化占位词 -1。排序稳定，同分保持文档顺序。

use crate::domain::models::character::{AttributePair, RawAttribute, MAX_ATTRIBUTES};

/// 已被其他字段捕获、无需再保留的标签
const EXCLUDED_LABELS: &[&str] = &[
    // Captured by dedicated fields
    "name", "nom", "title", "titre", "species", "espèce", "gender", "genre", "sex", "sexe",
    // Technical wiki plumbing
    "image", "photo", "picture", "file", "template", "category", "edit", "source",
];

/// 高价值属性关键词，多语言
const PRIORITY_KEYWORDS: &[&str] = &[
    // English
    "power", "ability", "skill", "talent", "magic", "element", "weapon", "armor",
    "equipment", "tool", "affiliation", "faction", "team", "group", "organization",
    "rank", "title", "status", "role", "position", "origin", "birthplace",
    "nationality", "home", "family", "relative", "relation", "friend", "enemy",
    // French
    "pouvoir", "compétence", "magie", "élément", "arme", "armure", "équipement",
    "outil", "équipe", "groupe", "organisation", "rang", "titre", "statut", "rôle",
    "origine", "nationalité", "maison", "famille", "parent", "ami", "ennemi",
];

/// 泛化的空值指示词
const GENERIC_VALUES: &[&str] = &["unknown", "none", "n/a", "inconnu", "aucun", "desconocido"];

/// 判断一个标签是否值得保留
fn is_useful_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    !EXCLUDED_LABELS.iter().any(|excluded| lower.contains(excluded))
}

/// 计算一个属性的优先级分数
pub fn score(attribute: &RawAttribute) -> i32 {
    let label_lower = attribute.label.to_lowercase();
    let value_lower = attribute.value.to_lowercase();

    let keyword_hits = PRIORITY_KEYWORDS
        .iter()
        .filter(|keyword| label_lower.contains(*keyword))
        .count() as i32;

    let mut score = 2 * keyword_hits;
    if attribute.value.chars().count() > 2 {
        score += 1;
    }
    if GENERIC_VALUES
        .iter()
        .any(|generic| value_lower.contains(generic))
    {
        score -= 1;
    }
    score
}

/// 选出前K个最有信息量的属性
///
/// 不足K个时用占位对补齐，保证下游记录形状稳定
pub fn prioritize(raw: Vec<RawAttribute>) -> Vec<AttributePair> {
    let mut scored: Vec<(i32, RawAttribute)> = raw
        .into_iter()
        .filter(|attribute| is_useful_label(&attribute.label))
        .map(|attribute| (score(&attribute), attribute))
        .collect();

    // sort_by is stable: ties keep document order
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut selected: Vec<AttributePair> = scored
        .into_iter()
        .take(MAX_ATTRIBUTES)
        .map(|(_, attribute)| AttributePair::new(attribute.label, attribute.value))
        .collect();

    while selected.len() < MAX_ATTRIBUTES {
        selected.push(AttributePair::placeholder(selected.len()));
    }
    selected
}
