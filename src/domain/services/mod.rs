// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含链接分类、字段抽取、属性优先级、记录校验和运行聚合等核心服务
pub mod attribute_prioritizer;
pub mod extraction;
pub mod link_classifier;
pub mod run_aggregator;
pub mod validator;
