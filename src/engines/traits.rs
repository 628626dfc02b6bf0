// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("Unexpected status code: {0}")]
    Status(u16),
    /// 非HTML内容
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 抓取到的页面
///
/// 保存最终URL（重定向后）和原始HTML内容
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 页面最终URL
    pub url: Url,
    /// 原始HTML内容
    pub html: String,
}

/// 页面抓取器特质
///
/// 抓取协作方的接口边界：重试、限速、robots处理都属于实现方的职责，
/// 核心逻辑只依赖该接口
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取一个页面
    ///
    /// 可以被并发调用，调用之间没有顺序保证
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}
