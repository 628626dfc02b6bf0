// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 引擎模块
///
/// 实现页面抓取引擎和文档查询适配器
pub mod document;
pub mod reqwest_engine;
pub mod traits;
