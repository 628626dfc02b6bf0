// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 运行聚合器
//!
//! 单一持有者：一次运行的全部计数器和已接受记录都汇集到这里，
//! 其他组件只通过方法更新，没有游离的全局可变状态。
//! 所有更新走锁保护路径，并发增量不会丢失。

use crate::domain::models::character::{AcceptedRecord, DESCRIPTION_UNAVAILABLE};
use crate::domain::models::stats::{RunStats, RunSummary};
use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;

/// 运行聚合器
#[derive(Default)]
pub struct RunAggregator {
    stats: RwLock<RunStats>,
    records: RwLock<Vec<AcceptedRecord>>,
}

impl RunAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个已处理的实体页面
    pub fn record_processed(&self) {
        self.stats.write().processed += 1;
    }

    /// 记录一条通过校验的记录
    pub fn record_accepted(&self, record: AcceptedRecord, corrected: bool) {
        let mut stats = self.stats.write();
        stats.accepted += 1;
        if corrected {
            stats.names_corrected += 1;
        }
        if record.image_url.is_some() {
            stats.with_images += 1;
        }
        if record.description != DESCRIPTION_UNAVAILABLE {
            stats.with_descriptions += 1;
        }
        *stats.by_group.entry(record.fandom_name.clone()).or_insert(0) += 1;
        drop(stats);

        self.records.write().push(record);
    }

    /// 记录一条被过滤的记录
    pub fn record_rejected(&self) {
        self.stats.write().rejected += 1;
    }

    /// 记录一次页面抓取失败
    pub fn record_fetch_failure(&self, url: &str, error: &str) {
        let mut stats = self.stats.write();
        stats.fetch_failures += 1;
        stats.errors.push(format!("{}: {}", url, error));
    }

    /// 当前已接受记录数
    ///
    /// 前沿控制器用它判断配额是否已达
    pub fn accepted_count(&self) -> u64 {
        self.stats.read().accepted
    }

    /// 统计快照，供外部监控周期性读取
    pub fn snapshot(&self) -> RunStats {
        self.stats.read().clone()
    }

    /// 结束运行并产出汇总
    pub fn finish(self) -> RunSummary {
        let stats = self.stats.into_inner();
        let records = self.records.into_inner();

        let acceptance_rate = if stats.processed > 0 {
            stats.accepted as f64 / stats.processed as f64
        } else {
            0.0
        };
        let image_rate = if stats.accepted > 0 {
            stats.with_images as f64 / stats.accepted as f64
        } else {
            0.0
        };
        let correction_rate = if stats.accepted > 0 {
            stats.names_corrected as f64 / stats.accepted as f64
        } else {
            0.0
        };

        info!(
            processed = stats.processed,
            accepted = stats.accepted,
            rejected = stats.rejected,
            fetch_failures = stats.fetch_failures,
            names_corrected = stats.names_corrected,
            "run finished"
        );

        RunSummary {
            stats,
            acceptance_rate,
            image_rate,
            correction_rate,
            records,
            finished_at: Utc::now(),
        }
    }
}
