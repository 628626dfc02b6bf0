// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 前沿控制器
//!
//! 驱动站点分类图的探索：Seeding -> Exploring -> Draining -> Done。
//! 已访问集合保证每个规范化URL至多分发一次；配额达到后进入
//! Draining，不再分发新请求，在途请求正常完成（接受数可能因此
//! 有界地超出配额，超出量不超过转换时刻的在途请求数）。

use crate::config::settings::CrawlSettings;
use crate::domain::models::character::AcceptedRecord;
use crate::domain::models::crawl_target::{CrawlTarget, TargetKind};
use crate::domain::models::stats::RejectEvent;
use crate::domain::services::extraction::cascade;
use crate::domain::services::link_classifier::{self, ClassifyRules, LinkKind};
use crate::domain::services::run_aggregator::RunAggregator;
use crate::domain::services::validator::{self, Validation};
use crate::engines::document::Document;
use crate::engines::traits::PageFetcher;
use crate::utils::url_utils::normalize_url;
use anyhow::{bail, Result};
use dashmap::DashSet;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// 主页内容区域选择器，按可靠程度排列
const CONTENT_AREA_SELECTORS: &[&str] = &[
    "div.mw-content-ltr.mw-parser-output a",
    "div#content a",
    "div.content a",
    "main a",
    "body a",
];

/// 前沿控制器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierState {
    /// 抓取起始URL，分类出站链接
    Seeding = 0,
    /// 递归探索分类页面，分发实体抓取
    Exploring = 1,
    /// 配额已达：停止分发，在途请求允许完成
    Draining = 2,
    /// 终态
    Done = 3,
}

impl FrontierState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => FrontierState::Seeding,
            1 => FrontierState::Exploring,
            2 => FrontierState::Draining,
            _ => FrontierState::Done,
        }
    }
}

/// 前沿控制器
///
/// 共享可变状态只有已访问集合和状态字；统计更新全部汇入聚合器
pub struct FrontierController<F: PageFetcher + 'static> {
    fetcher: Arc<F>,
    rules: ClassifyRules,
    settings: CrawlSettings,
    aggregator: Arc<RunAggregator>,
    accepted_tx: UnboundedSender<AcceptedRecord>,
    reject_tx: UnboundedSender<RejectEvent>,
    visited: DashSet<String>,
    state: AtomicU8,
    cancelled: AtomicBool,
    semaphore: Arc<Semaphore>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    fandom_name: String,
}

impl<F: PageFetcher> FrontierController<F> {
    pub fn new(
        fetcher: Arc<F>,
        settings: CrawlSettings,
        fandom_name: String,
        aggregator: Arc<RunAggregator>,
        accepted_tx: UnboundedSender<AcceptedRecord>,
        reject_tx: UnboundedSender<RejectEvent>,
    ) -> Self {
        let rules = ClassifyRules::new(settings.allowed_hosts.clone());
        let semaphore = Arc::new(Semaphore::new(settings.concurrency));
        Self {
            fetcher,
            rules,
            settings,
            aggregator,
            accepted_tx,
            reject_tx,
            visited: DashSet::new(),
            state: AtomicU8::new(FrontierState::Seeding as u8),
            cancelled: AtomicBool::new(false),
            semaphore,
            tasks: Mutex::new(Vec::new()),
            fandom_name,
        }
    }

    /// 当前状态
    pub fn state(&self) -> FrontierState {
        FrontierState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn transition(&self, state: FrontierState) {
        self.state.store(state as u8, Ordering::Release);
        info!(state = ?state, "frontier state transition");
    }

    /// 请求停止：不再发出新请求，在途请求正常排空
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        warn!("cancellation requested, no new requests will be dispatched");
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn quota_reached(&self) -> bool {
        self.aggregator.accepted_count() >= self.settings.max_characters
    }

    /// 配额达到时进入Draining（只从Exploring转换一次）
    fn enter_draining_if_quota_reached(&self) {
        if self.quota_reached()
            && self
                .state
                .compare_exchange(
                    FrontierState::Exploring as u8,
                    FrontierState::Draining as u8,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
        {
            info!(
                quota = self.settings.max_characters,
                "quota reached, draining in-flight requests"
            );
        }
    }

    fn dispatch_allowed(&self) -> bool {
        !self.is_cancelled() && self.state() != FrontierState::Draining
    }

    /// 记录首次见到的规范化URL
    ///
    /// 返回true表示第一次见到（first-seen wins）
    fn mark_visited(&self, url: &Url) -> bool {
        self.visited.insert(normalize_url(url))
    }

    /// 运行一次完整爬取
    ///
    /// 起始URL全部无效视为配置违规，在探索开始前快速失败
    pub async fn run(self: Arc<Self>, start_urls: &[Url]) -> Result<()> {
        let seeds: Vec<&Url> = start_urls
            .iter()
            .filter(|url| self.rules.host_allowed(url))
            .collect();
        if seeds.is_empty() {
            bail!("no valid start urls within allowed hosts");
        }

        // Seeding: each start page contributes character category links
        let mut category_targets: Vec<CrawlTarget> = Vec::new();
        for seed in seeds {
            if self.is_cancelled() {
                break;
            }
            if !self.mark_visited(seed) {
                continue;
            }
            match self.fetcher.fetch(seed).await {
                Ok(page) => {
                    let doc = Document::parse(&page);
                    for url in self.discover_seed_categories(&doc) {
                        category_targets.push(CrawlTarget::new(url, 0, TargetKind::Category));
                    }
                }
                Err(error) => {
                    warn!(url = %seed, %error, "seed fetch failed, branch abandoned");
                    self.aggregator
                        .record_fetch_failure(seed.as_str(), &error.to_string());
                }
            }
        }
        info!(
            categories = category_targets.len(),
            "seeding finished, beginning exploration"
        );

        self.transition(FrontierState::Exploring);
        for target in category_targets {
            if !self.dispatch_allowed() {
                break;
            }
            Arc::clone(&self)
                .explore_category(target.url, target.depth)
                .await;
        }

        // Drain: already-dispatched entity fetches complete normally
        let handles = {
            let mut tasks = self.tasks.lock().await;
            std::mem::take(&mut *tasks)
        };
        for handle in handles {
            let _ = handle.await;
        }

        self.transition(FrontierState::Done);
        Ok(())
    }

    /// 从起始页面发现角色分类链接
    ///
    /// 第一个产出链接的内容区域胜出；优先保留命中角色词表的
    /// 分类，没有命中时退回全部分类链接
    fn discover_seed_categories(&self, doc: &Document) -> Vec<Url> {
        let mut links = Vec::new();
        for selector in CONTENT_AREA_SELECTORS {
            links = doc.links(selector);
            if !links.is_empty() {
                break;
            }
        }

        let categories: Vec<(Url, String)> = links
            .into_iter()
            .filter(|(url, text)| {
                link_classifier::classify(url, text, &self.rules) == LinkKind::Category
            })
            .collect();

        let mut character_categories: Vec<Url> = categories
            .iter()
            .filter(|(url, text)| link_classifier::is_character_category(url, text))
            .map(|(url, _)| url.clone())
            .collect();
        if character_categories.is_empty() {
            character_categories = categories.into_iter().map(|(url, _)| url).collect();
        }

        // First-seen wins on duplicates, document order preserved
        let mut seen = std::collections::HashSet::new();
        character_categories
            .into_iter()
            .filter(|url| seen.insert(normalize_url(url)))
            .collect()
    }

    /// 递归探索一个分类页面
    ///
    /// 深度越界、已访问、取消或Draining都会放弃该分支；
    /// 分类页面抓取失败只丢弃该分支，不重试
    fn explore_category(self: Arc<Self>, url: Url, depth: u32) -> BoxFuture<'static, ()> {
        async move {
            if !self.dispatch_allowed() || depth > self.settings.max_depth {
                return;
            }
            if !self.mark_visited(&url) {
                return;
            }

            debug!(url = %url, depth, "exploring category");
            let page = match self.fetcher.fetch(&url).await {
                Ok(page) => page,
                Err(error) => {
                    warn!(url = %url, %error, "category fetch failed, branch abandoned");
                    self.aggregator
                        .record_fetch_failure(url.as_str(), &error.to_string());
                    return;
                }
            };

            // Document is not Send; drop it before awaiting in the loop below
            let links = {
                let doc = Document::parse(&page);
                self.discover_member_links(&doc)
            };

            for (link, text) in links {
                if !self.dispatch_allowed() {
                    return;
                }
                match link_classifier::classify(&link, &text, &self.rules) {
                    LinkKind::Category => {
                        Arc::clone(&self).explore_category(link, depth + 1).await;
                    }
                    LinkKind::Entity => {
                        Arc::clone(&self).dispatch_entity(link).await;
                    }
                    LinkKind::Ignore => {}
                }
            }
        }
        .boxed()
    }

    /// 从分类页面提取成员链接
    ///
    /// 先试专用的分类成员选择器，没有命中时退回全部wiki链接
    fn discover_member_links(&self, doc: &Document) -> Vec<(Url, String)> {
        const MEMBER_SELECTORS: &[&str] = &[
            "a.category-page__member-link",
            "div.category-page__members a",
            "li.category-page__member a",
            ".mw-category-group li a",
            "div.category-gallery-item a",
        ];
        for selector in MEMBER_SELECTORS {
            let links = doc.links(selector);
            if !links.is_empty() {
                return links;
            }
        }
        doc.links("a[href*=\"/wiki/\"]")
    }

    /// 分发一个实体页面的抽取请求
    ///
    /// 去重通过后在有界工作池中并发执行；实体抓取失败不计入
    /// 配额，前沿还有候选时自然由后续分发补偿
    async fn dispatch_entity(self: Arc<Self>, url: Url) {
        if !self.dispatch_allowed() {
            return;
        }
        if !self.mark_visited(&url) {
            return;
        }

        let controller = Arc::clone(&self);
        let handle = tokio::spawn(async move {
            // Bounded worker pool: at most `concurrency` fetches in flight
            let Ok(_permit) = controller.semaphore.acquire().await else {
                return;
            };
            // A task still queued when Draining begins is not in flight;
            // skipping it keeps the quota overshoot bounded by the pool size
            if !controller.dispatch_allowed() {
                return;
            }
            controller.process_entity(url).await;
        });
        self.tasks.lock().await.push(handle);
    }

    /// 抓取并抽取一个实体页面
    async fn process_entity(&self, url: Url) {
        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(error) => {
                warn!(url = %url, %error, "entity fetch failed");
                self.aggregator
                    .record_fetch_failure(url.as_str(), &error.to_string());
                return;
            }
        };

        self.aggregator.record_processed();
        let doc = Document::parse(&page);
        let record = cascade::extract_record(&doc, &self.fandom_name);

        match validator::validate(record) {
            Validation::Accepted { record, corrected } => {
                debug!(name = %record.name, "record accepted");
                self.aggregator.record_accepted(record.clone(), corrected);
                // Streamed as soon as validated; a dropped receiver is fine
                let _ = self.accepted_tx.send(record);
                self.enter_draining_if_quota_reached();
            }
            Validation::Rejected { reason } => {
                debug!(url = %url, reason = %reason, "record rejected");
                self.aggregator.record_rejected();
                let _ = self.reject_tx.send(RejectEvent {
                    url: url.to_string(),
                    reason,
                });
            }
        }
    }
}
