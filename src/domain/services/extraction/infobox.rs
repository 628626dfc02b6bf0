// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 结构化区域扫描
//!
//! 按优先级尝试各类信息框结构，第一个产出至少一个标签/值对的
//! 区域胜出，不跨区域合并。

use crate::domain::models::character::RawAttribute;
use crate::engines::document::Document;
use crate::utils::text::clean_text;

/// 结构化区域描述
///
/// 条目/标签/值三个选择器定义一种信息框布局
struct RegionRule {
    item: &'static str,
    label: &'static str,
    value: &'static str,
    source: &'static str,
}

/// 区域规则表，按可靠程度排列
const REGION_RULES: &[RegionRule] = &[
    // Portable infobox (modern fandom layout)
    RegionRule {
        item: ".portable-infobox .pi-data",
        label: ".pi-data-label",
        value: ".pi-data-value",
        source: "portable-infobox",
    },
    // Traditional table infobox with header cells
    RegionRule {
        item: ".infobox tr",
        label: "th",
        value: "td",
        source: "infobox-table",
    },
    // Table rows using two data cells
    RegionRule {
        item: ".infobox tr",
        label: "td:nth-child(1)",
        value: "td:nth-child(2)",
        source: "infobox-table",
    },
    RegionRule {
        item: ".character-infobox tr, .info-box tr",
        label: "th, td:nth-child(1)",
        value: "td:nth-child(2), td",
        source: "infobox-table",
    },
    // Definition-list property blocks
    RegionRule {
        item: "dl",
        label: "dt",
        value: "dt + dd",
        source: "definition-list",
    },
];

/// 扫描文档的结构化区域，产出原始属性列表
///
/// 返回的属性保持文档顺序，标签去掉结尾冒号；
/// 标签或值清洗后为空的条目被丢弃
pub fn scan_structured_regions(doc: &Document) -> Vec<RawAttribute> {
    for rule in REGION_RULES {
        let pairs = doc.select_label_value_pairs(rule.item, rule.label, rule.value);
        let attributes: Vec<RawAttribute> = pairs
            .into_iter()
            .filter_map(|(label, value)| {
                let label = clean_text(&label).trim_end_matches(':').trim().to_string();
                let value = clean_text(&value);
                if label.len() < 2 || value.is_empty() || label == value {
                    None
                } else {
                    Some(RawAttribute {
                        label,
                        value,
                        source: rule.source,
                    })
                }
            })
            .collect();
        if !attributes.is_empty() {
            return attributes;
        }
    }
    Vec::new()
}
