// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 爬取模块
///
/// 实现前沿控制器：图探索、去重、配额与并发分发
pub mod frontier;
