// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 描述字段缺失时的占位值
pub const DESCRIPTION_UNAVAILABLE: &str = "Description not available";
/// 类型/角色字段缺失时的占位值
pub const TYPE_UNSPECIFIED: &str = "Type not specified";
/// 属性值缺失时的占位值
pub const ATTRIBUTE_UNSPECIFIED: &str = "Not specified";

/// 保留的结构化属性数量
pub const MAX_ATTRIBUTES: usize = 2;

/// 结构化区域中扫描到的原始标签/值对
///
/// 瞬态数据：由信息框扫描产生，立即被属性优先级排序器消费
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    /// 属性标签
    pub label: String,
    /// 属性值
    pub value: String,
    /// 产生该属性的结构化区域（用于溯源）
    pub source: &'static str,
}

/// 优先级排序后保留的属性对
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePair {
    pub name: String,
    pub value: String,
}

impl AttributePair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// 第N个属性的占位对
    pub fn placeholder(index: usize) -> Self {
        Self {
            name: format!("Attribute {}", index + 1),
            value: ATTRIBUTE_UNSPECIFIED.to_string(),
        }
    }
}

/// 抽取阶段产生的候选角色记录
///
/// 仅在抽取阶段可变；交给校验器后不再修改
#[derive(Debug, Clone)]
pub struct CharacterRecord {
    /// 角色名称（可能无效，待校验）
    pub name: String,
    /// 主图片的绝对URL
    pub image_url: Option<String>,
    /// 描述或简介
    pub description: String,
    /// 类型/角色/职业
    pub character_type: String,
    /// 按优先级降序排列的结构化属性，长度 <= MAX_ATTRIBUTES
    pub attributes: Vec<AttributePair>,
    /// 来源页面URL
    pub source_url: String,
    /// 所属站点/fandom标识
    pub fandom_name: String,
    /// 抽取时间
    pub scraped_at: DateTime<Utc>,
}

/// 通过校验的角色记录
///
/// 字段名与落盘报告保持稳定，生命周期内由聚合器独占持有
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedRecord {
    pub name: String,
    pub image_url: Option<String>,
    pub description: String,
    pub character_type: String,
    pub attribute1_name: String,
    pub attribute1_value: String,
    pub attribute2_name: String,
    pub attribute2_value: String,
    pub source_url: String,
    pub fandom_name: String,
    pub scraped_at: DateTime<Utc>,
}

impl AcceptedRecord {
    /// 从候选记录构建已接受记录
    ///
    /// 属性不足两个时用占位对补齐
    pub fn from_candidate(record: CharacterRecord, name: String) -> Self {
        let mut attrs = record.attributes;
        while attrs.len() < MAX_ATTRIBUTES {
            attrs.push(AttributePair::placeholder(attrs.len()));
        }
        Self {
            name,
            image_url: record.image_url,
            description: record.description,
            character_type: record.character_type,
            attribute1_name: attrs[0].name.clone(),
            attribute1_value: attrs[0].value.clone(),
            attribute2_name: attrs[1].name.clone(),
            attribute2_value: attrs[1].value.clone(),
            source_url: record.source_url,
            fandom_name: record.fandom_name,
            scraped_at: record.scraped_at,
        }
    }
}
