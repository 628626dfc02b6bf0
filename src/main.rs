// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use url::Url;
use wikichars::config::settings::Settings;
use wikichars::crawler::frontier::FrontierController;
use wikichars::domain::services::run_aggregator::RunAggregator;
use wikichars::engines::reqwest_engine::ReqwestFetcher;
use wikichars::report::ReportWriter;
use wikichars::utils::telemetry;

/// 从起始URL推导分组名（如 starwars.fandom.com -> starwars）
fn fandom_name_from_url(url: &Url) -> String {
    url.host_str()
        .and_then(|host| host.split('.').find(|label| *label != "www"))
        .unwrap_or("wiki")
        .to_string()
}

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并驱动一次完整爬取
#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting wikichars...");

    // 2. Load configuration
    let mut settings = Settings::new()?;

    // 3. Parse arguments: <start_url> [max_characters]
    let mut args = std::env::args().skip(1);
    let start_arg = args
        .next()
        .context("usage: wikichars <start_url> [max_characters]")?;
    let start_url = Url::parse(&start_arg)
        .with_context(|| format!("invalid start url '{}'", start_arg))?;
    if let Some(quota_arg) = args.next() {
        settings.crawl.max_characters = quota_arg
            .parse()
            .with_context(|| format!("invalid character quota '{}'", quota_arg))?;
    }
    settings.validate()?;
    info!(
        start_url = %start_url,
        max_characters = settings.crawl.max_characters,
        max_depth = settings.crawl.max_depth,
        concurrency = settings.crawl.concurrency,
        "configuration loaded"
    );

    let fandom_name = fandom_name_from_url(&start_url);

    // 4. Initialize components
    let fetcher = Arc::new(ReqwestFetcher::new(&settings.http)?);
    let aggregator = Arc::new(RunAggregator::new());
    let (accepted_tx, mut accepted_rx) = mpsc::unbounded_channel();
    let (reject_tx, mut reject_rx) = mpsc::unbounded_channel();

    let controller = Arc::new(FrontierController::new(
        fetcher,
        settings.crawl.clone(),
        fandom_name.clone(),
        Arc::clone(&aggregator),
        accepted_tx,
        reject_tx,
    ));

    // Stream consumers: records surface as soon as they validate
    let accepted_log = tokio::spawn(async move {
        while let Some(record) = accepted_rx.recv().await {
            info!(name = %record.name, url = %record.source_url, "character extracted");
        }
    });
    let reject_log = tokio::spawn(async move {
        while let Some(event) = reject_rx.recv().await {
            debug!(url = %event.url, reason = %event.reason, "candidate rejected");
        }
    });

    // 5. Run the crawl; Ctrl-C requests a drain, not an abort
    {
        let run = Arc::clone(&controller).run(std::slice::from_ref(&start_url));
        tokio::pin!(run);
        loop {
            tokio::select! {
                result = &mut run => {
                    result?;
                    break;
                }
                _ = tokio::signal::ctrl_c() => {
                    warn!("interrupt received, draining in-flight requests");
                    controller.cancel();
                }
            }
        }
    }
    drop(controller);
    let _ = accepted_log.await;
    let _ = reject_log.await;

    // 6. Write reports
    let aggregator =
        Arc::into_inner(aggregator).context("aggregator still shared after drain")?;
    let summary = aggregator.finish();
    let writer = ReportWriter::new(settings.report.clone());
    let paths = writer.write(&fandom_name, &summary)?;

    info!(
        run_id = %writer.run_id(),
        accepted = summary.stats.accepted,
        rejected = summary.stats.rejected,
        fetch_failures = summary.stats.fetch_failures,
        acceptance_rate = format!("{:.1}%", summary.acceptance_rate * 100.0),
        records = %paths.records.display(),
        report = %paths.stats.display(),
        "run finished"
    );

    Ok(())
}
