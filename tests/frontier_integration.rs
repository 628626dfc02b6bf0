// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 前沿控制器集成测试
//!
//! 用wiremock搭一个小型wiki站点，端到端验证播种、分类探索、
//! 去重、配额排空和取消的行为。

use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;
use wikichars::config::settings::{CrawlSettings, HttpSettings};
use wikichars::crawler::frontier::{FrontierController, FrontierState};
use wikichars::domain::models::character::AcceptedRecord;
use wikichars::domain::services::run_aggregator::RunAggregator;
use wikichars::engines::reqwest_engine::ReqwestFetcher;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn crawl_settings(max_characters: u64, concurrency: usize) -> CrawlSettings {
    CrawlSettings {
        max_characters,
        max_depth: 3,
        concurrency,
        allowed_hosts: vec!["127.0.0.1".to_string()],
    }
}

fn http_settings() -> HttpSettings {
    HttpSettings {
        timeout_secs: 5,
        user_agent: "wikichars-test/0.1".to_string(),
    }
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// 带信息框和正文的完整角色页面
fn character_page(name: &str) -> String {
    format!(
        r#"<html><head><title>{name} | Test Wiki | Fandom</title></head><body>
        <h1 class="page-header__title">{name}</h1>
        <aside class="portable-infobox">
            <figure class="pi-image"><img src="https://static.example.net/images/{name}.png"/></figure>
            <div class="pi-data"><h3 class="pi-data-label">Homeworld</h3>
                <div class="pi-data-value">Tatooine</div></div>
            <div class="pi-data"><h3 class="pi-data-label">Affiliation</h3>
                <div class="pi-data-value">Rebel Alliance</div></div>
        </aside>
        <div class="mw-parser-output">
            <p>{name} is a central figure of the saga, trained in the ways
            of the Force and known across the galaxy for many adventures.</p>
        </div>
        </body></html>"#
    )
}

fn category_page(member_paths: &[(&str, &str)]) -> String {
    let members: String = member_paths
        .iter()
        .map(|(href, text)| {
            format!(
                r#"<a class="category-page__member-link" href="{href}">{text}</a>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="category-page__members">{members}</div></body></html>"#
    )
}

fn main_page(links: &[(&str, &str)]) -> String {
    let anchors: String = links
        .iter()
        .map(|(href, text)| format!(r#"<a href="{href}">{text}</a>"#))
        .collect();
    format!(r#"<html><body><main>{anchors}</main></body></html>"#)
}

struct Harness {
    controller: Arc<FrontierController<ReqwestFetcher>>,
    aggregator: Arc<RunAggregator>,
    accepted_rx: mpsc::UnboundedReceiver<AcceptedRecord>,
}

fn harness(settings: CrawlSettings) -> Harness {
    let fetcher = Arc::new(ReqwestFetcher::new(&http_settings()).unwrap());
    let aggregator = Arc::new(RunAggregator::new());
    let (accepted_tx, accepted_rx) = mpsc::unbounded_channel();
    let (reject_tx, _reject_rx) = mpsc::unbounded_channel();
    let controller = Arc::new(FrontierController::new(
        fetcher,
        settings,
        "testwiki".to_string(),
        Arc::clone(&aggregator),
        accepted_tx,
        reject_tx,
    ));
    Harness {
        controller,
        aggregator,
        accepted_rx,
    }
}

fn drain_names(rx: &mut mpsc::UnboundedReceiver<AcceptedRecord>) -> Vec<String> {
    let mut names = Vec::new();
    while let Ok(record) = rx.try_recv() {
        names.push(record.name);
    }
    names.sort();
    names
}

#[tokio::test]
async fn test_crawl_explores_categories_and_dedupes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(main_page(&[
            ("/wiki/Category:Characters", "Characters"),
            ("/wiki/Category:Locations", "Locations"),
            ("/wiki/Special:Random", "Random page"),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wiki/Category:Characters"))
        .respond_with(html_response(category_page(&[
            ("/wiki/Luke_Skywalker", "Luke Skywalker"),
            ("/wiki/Leia_Organa", "Leia Organa"),
            ("/wiki/Category:Jedi", "Jedi"),
            ("/wiki/Template:CharBox", "CharBox"),
            ("/wiki/Luke_Skywalker#Biography", "Luke again"),
            ("https://elsewhere.example.com/wiki/Off_Site", "Off site"),
        ])))
        .mount(&server)
        .await;

    // Subcategory repeats Luke: the visited set must prevent a second fetch
    Mock::given(method("GET"))
        .and(path("/wiki/Category:Jedi"))
        .respond_with(html_response(category_page(&[
            ("/wiki/Obi-Wan_Kenobi", "Obi-Wan Kenobi"),
            ("/wiki/Luke_Skywalker", "Luke Skywalker"),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wiki/Luke_Skywalker"))
        .respond_with(html_response(character_page("Luke Skywalker")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Leia_Organa"))
        .respond_with(html_response(character_page("Leia Organa")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Obi-Wan_Kenobi"))
        .respond_with(html_response(character_page("Obi-Wan Kenobi")))
        .expect(1)
        .mount(&server)
        .await;

    // The unrelated category must never be entered
    Mock::given(method("GET"))
        .and(path("/wiki/Category:Locations"))
        .respond_with(html_response(category_page(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let mut h = harness(crawl_settings(10, 2));
    let start = Url::parse(&server.uri()).unwrap();
    Arc::clone(&h.controller).run(&[start]).await.unwrap();

    assert_eq!(h.controller.state(), FrontierState::Done);
    let stats = h.aggregator.snapshot();
    assert_eq!(stats.accepted, 3);
    assert_eq!(stats.rejected, 0);
    assert_eq!(stats.fetch_failures, 0);
    assert_eq!(
        drain_names(&mut h.accepted_rx),
        vec!["Leia Organa", "Luke Skywalker", "Obi-Wan Kenobi"]
    );
}

#[tokio::test]
async fn test_invalid_name_page_rejected_not_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(main_page(&[(
            "/wiki/Category:Characters",
            "Characters",
        )])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Category:Characters"))
        .respond_with(html_response(category_page(&[
            ("/wiki/Mystery", "Mystery"),
            ("/wiki/Leia_Organa", "Leia Organa"),
        ])))
        .mount(&server)
        .await;
    // Heading is an invalid-name phrase and no attribute offers a recovery
    Mock::given(method("GET"))
        .and(path("/wiki/Mystery"))
        .respond_with(html_response(
            r#"<html><body><h1 class="page-header__title">Unknown</h1>
            <div class="mw-parser-output"><p>Short.</p></div></body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Leia_Organa"))
        .respond_with(html_response(character_page("Leia Organa")))
        .mount(&server)
        .await;

    let mut h = harness(crawl_settings(10, 2));
    let start = Url::parse(&server.uri()).unwrap();
    Arc::clone(&h.controller).run(&[start]).await.unwrap();

    let stats = h.aggregator.snapshot();
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.accepted, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(drain_names(&mut h.accepted_rx), vec!["Leia Organa"]);
}

#[tokio::test]
async fn test_quota_draining_bounds_accepted_count() {
    let server = MockServer::start().await;

    let members: Vec<(String, String)> = (1..=6)
        .map(|i| (format!("/wiki/Hero_{i}"), format!("Hero {i}")))
        .collect();
    let member_refs: Vec<(&str, &str)> = members
        .iter()
        .map(|(href, text)| (href.as_str(), text.as_str()))
        .collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(main_page(&[(
            "/wiki/Category:Characters",
            "Characters",
        )])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Category:Characters"))
        .respond_with(html_response(category_page(&member_refs)))
        .mount(&server)
        .await;
    for i in 1..=6 {
        Mock::given(method("GET"))
            .and(path(format!("/wiki/Hero_{i}")))
            .respond_with(html_response(character_page(&format!("Hero {i}"))))
            .mount(&server)
            .await;
    }

    let quota = 2;
    let concurrency = 3;
    let h = harness(crawl_settings(quota, concurrency));
    let start = Url::parse(&server.uri()).unwrap();
    Arc::clone(&h.controller).run(&[start]).await.unwrap();

    // In-flight requests at the draining transition complete and count,
    // so the final total may exceed the quota by at most the pool size
    let accepted = h.aggregator.accepted_count();
    assert!(accepted >= quota, "quota not reached: {accepted}");
    assert!(
        accepted <= quota + concurrency as u64,
        "overshoot unbounded: {accepted}"
    );
    assert_eq!(h.controller.state(), FrontierState::Done);
}

#[tokio::test]
async fn test_cancellation_stops_dispatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(main_page(&[(
            "/wiki/Category:Characters",
            "Characters",
        )])))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(crawl_settings(10, 2));
    h.controller.cancel();
    let start = Url::parse(&server.uri()).unwrap();
    Arc::clone(&h.controller).run(&[start]).await.unwrap();

    assert_eq!(h.aggregator.snapshot().processed, 0);
    assert_eq!(h.controller.state(), FrontierState::Done);
}

#[tokio::test]
async fn test_category_fetch_failure_abandons_branch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(main_page(&[(
            "/wiki/Category:Characters",
            "Characters",
        )])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Category:Characters"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let h = harness(crawl_settings(10, 2));
    let start = Url::parse(&server.uri()).unwrap();
    Arc::clone(&h.controller).run(&[start]).await.unwrap();

    let stats = h.aggregator.snapshot();
    assert_eq!(stats.accepted, 0);
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(h.controller.state(), FrontierState::Done);
}

#[tokio::test]
async fn test_no_valid_start_urls_fails_fast() {
    let h = harness(crawl_settings(10, 2));
    let off_host = Url::parse("https://elsewhere.example.com/").unwrap();
    assert!(Arc::clone(&h.controller).run(&[off_host]).await.is_err());
}
