// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 抽取策略规则表
//!
//! 每个逻辑字段对应一张有序规则表：特定结构化区域的选择器在前，
//! 通用标题/正文选择器居中，元数据或URL派生的兜底策略在后。
//! 规则是数据而不是分支逻辑，支持新站点时只需追加规则。

/// 单条选择器规则
///
/// `attr` 为 None 时取元素文本，否则取指定属性值
#[derive(Debug, Clone, Copy)]
pub struct SelectorRule {
    /// CSS选择器
    pub selector: &'static str,
    /// 要读取的属性，None表示读取文本
    pub attr: Option<&'static str>,
    /// 命中该规则时记录的来源标签
    pub provenance: &'static str,
}

/// 名称抽取规则，按优先级排列
///
/// 未命中时由级联回退到URL片段
pub const NAME_RULES: &[SelectorRule] = &[
    // Wiki-specific heading structures
    SelectorRule {
        selector: "h1.page-header__title .mw-page-title-main",
        attr: None,
        provenance: "page-header",
    },
    SelectorRule {
        selector: "h1.page-header__title",
        attr: None,
        provenance: "page-header",
    },
    SelectorRule {
        selector: ".pi-title",
        attr: None,
        provenance: "infobox-title",
    },
    SelectorRule {
        selector: ".infobox-title",
        attr: None,
        provenance: "infobox-title",
    },
    SelectorRule {
        selector: "#firstHeading .mw-page-title-main",
        attr: None,
        provenance: "first-heading",
    },
    SelectorRule {
        selector: "#firstHeading",
        attr: None,
        provenance: "first-heading",
    },
    // Generic title selectors
    SelectorRule {
        selector: "h1",
        attr: None,
        provenance: "generic-h1",
    },
    SelectorRule {
        selector: ".page-title",
        attr: None,
        provenance: "generic-title",
    },
    SelectorRule {
        selector: ".article-title",
        attr: None,
        provenance: "generic-title",
    },
    // Metadata fallback
    SelectorRule {
        selector: "meta[property=\"og:title\"]",
        attr: Some("content"),
        provenance: "og-title",
    },
    SelectorRule {
        selector: "title",
        attr: None,
        provenance: "html-title",
    },
];

/// 图片抽取规则，按优先级排列
///
/// 信息框内的图片最可靠，正文图片次之，关键词/扩展名兜底最后
pub const IMAGE_RULES: &[SelectorRule] = &[
    // Portable infobox (modern layout)
    SelectorRule {
        selector: ".portable-infobox .pi-image img",
        attr: Some("src"),
        provenance: "infobox",
    },
    SelectorRule {
        selector: ".portable-infobox .pi-image img",
        attr: Some("data-src"),
        provenance: "infobox",
    },
    SelectorRule {
        selector: ".portable-infobox img",
        attr: Some("src"),
        provenance: "infobox",
    },
    SelectorRule {
        selector: ".portable-infobox img",
        attr: Some("data-src"),
        provenance: "infobox",
    },
    // Traditional infobox
    SelectorRule {
        selector: ".infobox img",
        attr: Some("src"),
        provenance: "infobox",
    },
    SelectorRule {
        selector: ".infobox img",
        attr: Some("data-src"),
        provenance: "infobox",
    },
    SelectorRule {
        selector: ".infobox-image img",
        attr: Some("src"),
        provenance: "infobox",
    },
    SelectorRule {
        selector: ".character-infobox img",
        attr: Some("src"),
        provenance: "infobox",
    },
    // Main content area
    SelectorRule {
        selector: ".mw-parser-output img",
        attr: Some("src"),
        provenance: "content",
    },
    SelectorRule {
        selector: ".mw-parser-output img",
        attr: Some("data-src"),
        provenance: "content",
    },
    SelectorRule {
        selector: ".page-content img",
        attr: Some("src"),
        provenance: "content",
    },
    // Keyword and extension fallbacks
    SelectorRule {
        selector: "img[alt*=\"portrait\"]",
        attr: Some("src"),
        provenance: "fallback",
    },
    SelectorRule {
        selector: "img[alt*=\"character\"]",
        attr: Some("src"),
        provenance: "fallback",
    },
    SelectorRule {
        selector: "img[src*=\".jpg\"]",
        attr: Some("src"),
        provenance: "fallback",
    },
    SelectorRule {
        selector: "img[src*=\".png\"]",
        attr: Some("src"),
        provenance: "fallback",
    },
    SelectorRule {
        selector: "img[data-src*=\".jpg\"]",
        attr: Some("data-src"),
        provenance: "fallback",
    },
    SelectorRule {
        selector: "img[data-src*=\".png\"]",
        attr: Some("data-src"),
        provenance: "fallback",
    },
];

/// 描述段落规则
///
/// `min_chars` 是清洗后的最小长度：第一段要求更长，避免拿到导航残句
#[derive(Debug, Clone, Copy)]
pub struct ParagraphRule {
    pub selector: &'static str,
    pub min_chars: usize,
    pub provenance: &'static str,
}

pub const DESCRIPTION_RULES: &[ParagraphRule] = &[
    ParagraphRule {
        selector: ".mw-parser-output > p",
        min_chars: 50,
        provenance: "lead-paragraph",
    },
    ParagraphRule {
        selector: ".intro p, .summary p, .character-intro p",
        min_chars: 30,
        provenance: "intro-section",
    },
    ParagraphRule {
        selector: ".mw-parser-output p",
        min_chars: 30,
        provenance: "content-paragraph",
    },
    ParagraphRule {
        selector: "article p, main p, p",
        min_chars: 30,
        provenance: "any-paragraph",
    },
];

/// 类型/角色关键词，标签匹配用，多语言
pub const TYPE_KEYWORDS: &[&str] = &[
    // English
    "species", "race", "type", "class", "occupation", "job", "role", "profession",
    "affiliation", "faction", "group", "allegiance", "side", "team", "origin",
    "nationality", "status", "rank", "title",
    // French
    "espèce", "classe", "métier", "rôle", "origine", "nationalité", "statut", "rang", "titre",
    // Spanish
    "especie", "raza", "tipo", "clase", "profesión", "trabajo", "rol", "afiliación",
    "origen", "nacionalidad", "estado",
];

/// 有效图片扩展名
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];

/// 占位图/图标/跟踪像素等无效图片URL特征
pub const INVALID_IMAGE_PATTERNS: &[&str] = &[
    "data:image/gif;base64",
    "placeholder",
    "noimage",
    "no-image",
    "missing",
    "/icons/",
    "/ui/",
    "wiki.png",
    "favicon",
    "logo",
    "edit-icon",
    "delete-icon",
    "1x1",
    "transparent",
    "spacer",
];

/// 极小图片（1-5像素）的尺寸指示特征
pub const TINY_IMAGE_PATTERNS: &[&str] = &[
    "/width/1/", "/width/2/", "/width/3/", "/width/4/", "/width/5/",
    "/height/1/", "/height/2/", "/height/3/", "/height/4/", "/height/5/",
    "width=1", "width=2", "width=3", "width=4", "width=5",
    "height=1", "height=2", "height=3", "height=4", "height=5",
];

/// 导航样板文本特征，描述不得包含
pub const NAVIGATION_PHRASES: &[&str] = &[
    "see also",
    "main article",
    "for other uses",
    "disambiguation",
    "category:",
    "template:",
    "click here",
    "view source",
    "talk page",
];
