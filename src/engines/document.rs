// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::FetchedPage;
use scraper::{Html, Selector};
use url::Url;

/// 文档查询适配器
///
/// 包装一个已抓取页面，暴露基于CSS选择器的文本/属性/链接查询。
/// 非法选择器按"无匹配"处理，以便级联抽取继续尝试下一个策略。
pub struct Document {
    url: Url,
    html: Html,
}

impl Document {
    /// 解析抓取到的页面
    pub fn parse(page: &FetchedPage) -> Self {
        Self {
            url: page.url.clone(),
            html: Html::parse_document(&page.html),
        }
    }

    /// 直接从HTML字符串构建（测试用）
    pub fn from_html(url: Url, html: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(html),
        }
    }

    /// 页面URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// 返回所有匹配元素的文本内容（文档顺序）
    pub fn select_all_text(&self, selector: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .map(|element| {
                element
                    .text()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .trim()
                    .to_string()
            })
            .collect()
    }

    /// 返回所有匹配元素的指定属性值（文档顺序）
    pub fn select_all_attr(&self, selector: &str, attr: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .filter_map(|element| element.value().attr(attr).map(|s| s.to_string()))
            .collect()
    }

    /// 在每个匹配 `item_selector` 的元素内部配对标签和值
    ///
    /// 每个条目取第一个标签匹配和第一个值匹配，缺一跳过。
    /// 用于信息框等结构化区域的标签/值扫描
    pub fn select_label_value_pairs(
        &self,
        item_selector: &str,
        label_selector: &str,
        value_selector: &str,
    ) -> Vec<(String, String)> {
        let (Ok(item), Ok(label), Ok(value)) = (
            Selector::parse(item_selector),
            Selector::parse(label_selector),
            Selector::parse(value_selector),
        ) else {
            return Vec::new();
        };
        let mut pairs = Vec::new();
        for element in self.html.select(&item) {
            let label_text = element
                .select(&label)
                .next()
                .map(|e| e.text().collect::<Vec<_>>().join(" ").trim().to_string());
            let value_text = element
                .select(&value)
                .next()
                .map(|e| e.text().collect::<Vec<_>>().join(" ").trim().to_string());
            if let (Some(label_text), Some(value_text)) = (label_text, value_text) {
                pairs.push((label_text, value_text));
            }
        }
        pairs
    }

    /// 提取匹配元素的出站链接，解析为绝对URL
    ///
    /// 返回 (绝对URL, 链接文本)，保持文档顺序。
    /// fragment、mailto和javascript链接被忽略，只保留http/https
    pub fn links(&self, selector: &str) -> Vec<(Url, String)> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        let mut links = Vec::new();
        for element in self.html.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if href.starts_with('#') || href.starts_with("mailto:") || href.starts_with("javascript:")
            {
                continue;
            }
            if let Ok(url) = self.url.join(href) {
                if url.scheme() == "http" || url.scheme() == "https" {
                    let text = element
                        .text()
                        .collect::<Vec<_>>()
                        .join(" ")
                        .trim()
                        .to_string();
                    links.push((url, text));
                }
            }
        }
        links
    }
}
