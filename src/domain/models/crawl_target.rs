// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use url::Url;

/// 爬取目标类型
///
/// 区分导航/分类页面和可抽取的实体页面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// 分类/导航页面，链接到实体页面或更深的分类
    Category,
    /// 实体页面，对应一条可抽取的角色记录
    Entity,
}

/// 爬取目标
///
/// 由前沿控制器在链接分类时创建，消费一次后即丢弃，从不修改。
/// 去重由按规范化URL构建的已访问集合保证。
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    /// 目标URL
    pub url: Url,
    /// 发现该目标时的递归深度
    pub depth: u32,
    /// 目标类型
    pub kind: TargetKind,
}

impl CrawlTarget {
    pub fn new(url: Url, depth: u32, kind: TargetKind) -> Self {
        Self { url, depth, kind }
    }
}
