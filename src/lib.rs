// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 爬取模块
///
/// 实现前沿控制器：站点分类图的探索、去重、配额与并发控制
pub mod crawler;

/// 领域模块
///
/// 包含核心业务实体和抽取、校验、聚合服务
pub mod domain;

/// 引擎模块
///
/// 实现HTTP抓取引擎和HTML文档查询
pub mod engines;

/// 报告模块
///
/// 负责运行结果的JSON/CSV落盘
pub mod report;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
