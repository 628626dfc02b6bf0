// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 系统命名空间前缀，匹配到即忽略
///
/// 大小写不敏感的子串匹配
const IGNORED_NAMESPACES: &[&str] = &[
    "template:",
    "file:",
    "special:",
    "help:",
    "user:",
    "talk:",
    "project:",
    "mediawiki:",
    "forum:",
    "blog:",
    "thread:",
    "list_of",
    "list%20of",
];

/// 角色分类关键词词干，含多语言变体
///
/// 用于判断一个 `Category:` 链接是否与角色相关
const CATEGORY_KEYWORDS: &[&str] = &[
    "character",
    "personnage",
    "personaje",
    "hero",
    "villain",
    "people",
    "individual",
    "being",
    "roster",
];

/// 非 `Category:` 命名空间的导航链接关键词
///
/// 只收复数/列表形式，避免把标题恰好是 "Hero" 之类的实体页误判成导航页
const NAV_LINK_KEYWORDS: &[&str] = &[
    "characters",
    "personnages",
    "personajes",
    "heroes",
    "villains",
    "roster",
];

/// 链接分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// 分类/导航页面
    Category,
    /// 候选实体页面
    Entity,
    /// 无关页面（系统页、站外链接）
    Ignore,
}

/// 链接分类规则集
///
/// 纯数据：允许的主机集合决定哪些链接属于被爬站点
#[derive(Debug, Clone)]
pub struct ClassifyRules {
    /// 允许的主机后缀（如 "fandom.com"）
    pub allowed_hosts: Vec<String>,
}

impl ClassifyRules {
    pub fn new(allowed_hosts: Vec<String>) -> Self {
        Self { allowed_hosts }
    }

    pub fn host_allowed(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        self.allowed_hosts
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }
}

/// 对一个已发现链接进行分类
///
/// 纯谓词，没有副作用：
/// - 系统命名空间或站外主机 -> Ignore
/// - `Category:` 命名空间，或链接文本/URL命中关键词表 -> Category
/// - 其余允许主机上的wiki文章 -> Entity
pub fn classify(url: &Url, link_text: &str, rules: &ClassifyRules) -> LinkKind {
    if !rules.host_allowed(url) {
        return LinkKind::Ignore;
    }

    let path_lower = url.path().to_lowercase();
    if !path_lower.contains("/wiki/") {
        return LinkKind::Ignore;
    }

    if IGNORED_NAMESPACES
        .iter()
        .any(|namespace| path_lower.contains(namespace))
    {
        return LinkKind::Ignore;
    }

    if path_lower.contains("category:") {
        return LinkKind::Category;
    }

    // Navigation listings sometimes link character indexes outside the
    // Category: namespace; the gazetteer catches those by text or URL
    let text_lower = link_text.to_lowercase();
    if NAV_LINK_KEYWORDS
        .iter()
        .any(|keyword| text_lower.contains(keyword) || path_lower.contains(keyword))
    {
        return LinkKind::Category;
    }

    LinkKind::Entity
}

/// 判断一个分类链接是否像角色相关的分类
///
/// 主页播种阶段用它筛选 `Category:` 链接，避免扎进无关分类
pub fn is_character_category(url: &Url, link_text: &str) -> bool {
    let haystack = format!(
        "{} {}",
        url.path().to_lowercase(),
        link_text.to_lowercase()
    );
    CATEGORY_KEYWORDS
        .iter()
        .any(|keyword| haystack.contains(keyword))
}
