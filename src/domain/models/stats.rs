// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::character::AcceptedRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单次运行的统计数据
///
/// 运行开始时清零，运行期间可并发更新，结束时随报告落盘
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// 已处理的实体页面数
    pub processed: u64,
    /// 通过校验的记录数
    pub accepted: u64,
    /// 因名称无效被过滤的记录数
    pub rejected: u64,
    /// 页面抓取失败数
    pub fetch_failures: u64,
    /// 从属性中修正出名称的记录数
    pub names_corrected: u64,
    /// 带有效图片URL的记录数
    pub with_images: u64,
    /// 描述不是占位值的记录数
    pub with_descriptions: u64,
    /// 按站点/fandom分组的接受计数
    pub by_group: BTreeMap<String, u64>,
    /// 运行期间收集的错误描述
    pub errors: Vec<String>,
}

/// 被拒记录的诊断事件
///
/// 仅用于诊断流，不影响运行继续
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectEvent {
    pub url: String,
    pub reason: String,
}

/// 运行结束时产出的汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// 统计数据快照
    pub stats: RunStats,
    /// 接受率（accepted / processed）
    pub acceptance_rate: f64,
    /// 图片覆盖率（with_images / accepted）
    pub image_rate: f64,
    /// 名称修正率（names_corrected / accepted）
    pub correction_rate: f64,
    /// 全部已接受记录
    pub records: Vec<AcceptedRecord>,
    /// 运行结束时间
    pub finished_at: DateTime<Utc>,
}
