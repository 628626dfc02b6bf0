// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义爬取目标、角色记录和运行统计等核心数据结构
pub mod character;
pub mod crawl_target;
pub mod stats;
