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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含爬取、HTTP和报告输出等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 爬取配置
    pub crawl: CrawlSettings,
    /// HTTP配置
    pub http: HttpSettings,
    /// 报告输出配置
    pub report: ReportSettings,
}

/// 爬取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// 本次运行最多接受的角色记录数
    pub max_characters: u64,
    /// 分类页面的最大递归深度
    pub max_depth: u32,
    /// 实体页面抓取的并发上限
    pub concurrency: usize,
    /// 允许的主机后缀列表
    pub allowed_hosts: Vec<String>,
}

/// HTTP配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// User-Agent请求头
    pub user_agent: String,
}

/// 报告输出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    /// 报告输出目录
    pub output_dir: String,
    /// 是否同时导出CSV
    pub write_csv: bool,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default crawl settings
            .set_default("crawl.max_characters", 10)?
            .set_default("crawl.max_depth", 3)?
            .set_default("crawl.concurrency", 5)?
            .set_default("crawl.allowed_hosts", vec!["fandom.com".to_string()])?
            // Default HTTP settings
            .set_default("http.timeout_secs", 30)?
            .set_default(
                "http.user_agent",
                "Mozilla/5.0 (compatible; wikichars/0.1; +https://github.com/wikichars)",
            )?
            // Default report settings
            .set_default("report.output_dir", "./reports")?
            .set_default("report.write_csv", true)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("WIKICHARS").separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 校验配置值
    ///
    /// 配置违规在探索开始前快速失败
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawl.max_characters == 0 {
            return Err(ConfigError::Message(
                "crawl.max_characters must be greater than zero".to_string(),
            ));
        }
        if self.crawl.concurrency == 0 {
            return Err(ConfigError::Message(
                "crawl.concurrency must be greater than zero".to_string(),
            ));
        }
        if self.crawl.allowed_hosts.is_empty() {
            return Err(ConfigError::Message(
                "crawl.allowed_hosts must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
