// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 字段抽取模块
///
/// 规则表 + 级联执行 + 结构化区域扫描
pub mod cascade;
pub mod infobox;
pub mod rules;
