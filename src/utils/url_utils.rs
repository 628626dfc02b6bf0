// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 规范化URL用于去重
///
/// 去掉fragment和query，只保留scheme+host+path
pub fn normalize_url(url: &Url) -> String {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized.set_query(None);
    normalized.to_string()
}

/// 从wiki文章URL中提取页面标题片段
///
/// 例如 `https://x.fandom.com/wiki/Luke_Skywalker` 返回 `Luke Skywalker`
pub fn page_slug(url: &Url) -> Option<String> {
    let last = url.path_segments()?.filter(|s| !s.is_empty()).next_back()?;
    let decoded = urlencoding::decode(last).ok()?;
    let name = decoded.replace('_', " ").trim().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
