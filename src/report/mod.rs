// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 报告落盘
//!
//! 一次运行产出两个JSON工件（记录文件和统计报告），可选再导出
//! 一份CSV。文件名带上分组名和时间戳，避免多次运行互相覆盖。

use crate::config::settings::ReportSettings;
use crate::domain::models::character::AcceptedRecord;
use crate::domain::models::stats::{RunStats, RunSummary};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// 记录文件头 + 记录列表
#[derive(Debug, Serialize)]
struct RecordsArtifact<'a> {
    run_id: Uuid,
    fandom_name: &'a str,
    record_count: usize,
    generated_at: DateTime<Utc>,
    characters: &'a [AcceptedRecord],
}

/// 统计报告（只含计数和比率，不重复记录本体）
#[derive(Debug, Serialize)]
struct StatsArtifact<'a> {
    run_id: Uuid,
    fandom_name: &'a str,
    generated_at: DateTime<Utc>,
    stats: &'a RunStats,
    acceptance_rate: f64,
    image_rate: f64,
    correction_rate: f64,
    finished_at: DateTime<Utc>,
}

/// CSV列顺序固定，与记录JSON字段一一对应
const CSV_HEADER: &str = "name,image_url,description,character_type,\
attribute1_name,attribute1_value,attribute2_name,attribute2_value,\
source_url,fandom_name,scraped_at";

/// 写出的报告文件路径
#[derive(Debug)]
pub struct ReportPaths {
    pub records: PathBuf,
    pub stats: PathBuf,
    pub csv: Option<PathBuf>,
}

/// 报告写出器
pub struct ReportWriter {
    settings: ReportSettings,
    run_id: Uuid,
}

impl ReportWriter {
    pub fn new(settings: ReportSettings) -> Self {
        Self {
            settings,
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// 写出一次运行的全部报告工件
    pub fn write(&self, fandom_name: &str, summary: &RunSummary) -> Result<ReportPaths> {
        let output_dir = Path::new(&self.settings.output_dir);
        fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create report dir {}", output_dir.display()))?;

        let timestamp = summary.finished_at.format("%Y%m%d_%H%M%S");
        let generated_at = Utc::now();

        let records_path =
            output_dir.join(format!("{}_characters_{}.json", fandom_name, timestamp));
        let records = RecordsArtifact {
            run_id: self.run_id,
            fandom_name,
            record_count: summary.records.len(),
            generated_at,
            characters: &summary.records,
        };
        write_json(&records_path, &records)?;
        info!(path = %records_path.display(), count = summary.records.len(), "records written");

        let stats_path = output_dir.join(format!("report_{}_{}.json", fandom_name, timestamp));
        let stats = StatsArtifact {
            run_id: self.run_id,
            fandom_name,
            generated_at,
            stats: &summary.stats,
            acceptance_rate: summary.acceptance_rate,
            image_rate: summary.image_rate,
            correction_rate: summary.correction_rate,
            finished_at: summary.finished_at,
        };
        write_json(&stats_path, &stats)?;
        info!(path = %stats_path.display(), "stats report written");

        let csv = if self.settings.write_csv {
            let csv_path =
                output_dir.join(format!("{}_characters_{}.csv", fandom_name, timestamp));
            write_csv(&csv_path, &summary.records)?;
            info!(path = %csv_path.display(), "csv export written");
            Some(csv_path)
        } else {
            None
        };

        Ok(ReportPaths {
            records: records_path,
            stats: stats_path,
            csv,
        })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn write_csv(path: &Path, records: &[AcceptedRecord]) -> Result<()> {
    let mut body = String::from(CSV_HEADER);
    body.push('\n');
    for record in records {
        let fields = [
            record.name.as_str(),
            record.image_url.as_deref().unwrap_or(""),
            record.description.as_str(),
            record.character_type.as_str(),
            record.attribute1_name.as_str(),
            record.attribute1_value.as_str(),
            record.attribute2_name.as_str(),
            record.attribute2_value.as_str(),
            record.source_url.as_str(),
            record.fandom_name.as_str(),
        ];
        let mut row: Vec<String> = fields.iter().map(|field| csv_escape(field)).collect();
        row.push(record.scraped_at.to_rfc3339());
        body.push_str(&row.join(","));
        body.push('\n');
    }
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// RFC 4180风格的字段转义
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::stats::RunStats;
    use tempfile::tempdir;

    fn record(name: &str) -> AcceptedRecord {
        AcceptedRecord {
            name: name.to_string(),
            image_url: Some("https://static.wikia.net/luke.jpg".to_string()),
            description: "A Jedi Knight, son of Anakin Skywalker.".to_string(),
            character_type: "Jedi".to_string(),
            attribute1_name: "Homeworld".to_string(),
            attribute1_value: "Tatooine".to_string(),
            attribute2_name: "Affiliation".to_string(),
            attribute2_value: "Rebel Alliance".to_string(),
            source_url: "https://starwars.fandom.com/wiki/Luke_Skywalker".to_string(),
            fandom_name: "starwars".to_string(),
            scraped_at: Utc::now(),
        }
    }

    fn summary(records: Vec<AcceptedRecord>) -> RunSummary {
        let mut stats = RunStats::default();
        stats.processed = records.len() as u64;
        stats.accepted = records.len() as u64;
        RunSummary {
            stats,
            acceptance_rate: 1.0,
            image_rate: 1.0,
            correction_rate: 0.0,
            records,
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn test_writes_records_and_stats_artifacts() {
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(ReportSettings {
            output_dir: dir.path().to_string_lossy().into_owned(),
            write_csv: true,
        });

        let paths = writer
            .write("starwars", &summary(vec![record("Luke Skywalker")]))
            .unwrap();

        let records: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.records).unwrap()).unwrap();
        assert_eq!(records["fandom_name"], "starwars");
        assert_eq!(records["record_count"], 1);
        assert_eq!(records["characters"][0]["name"], "Luke Skywalker");
        assert!(records["run_id"].is_string());

        let stats: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.stats).unwrap()).unwrap();
        assert_eq!(stats["stats"]["accepted"], 1);
        assert_eq!(stats["acceptance_rate"], 1.0);

        let csv_path = paths.csv.expect("csv enabled");
        let csv = fs::read_to_string(csv_path).unwrap();
        assert!(csv.starts_with("name,image_url"));
        assert!(csv.contains("Luke Skywalker"));
    }

    #[test]
    fn test_csv_can_be_disabled() {
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(ReportSettings {
            output_dir: dir.path().to_string_lossy().into_owned(),
            write_csv: false,
        });
        let paths = writer.write("starwars", &summary(vec![])).unwrap();
        assert!(paths.csv.is_none());
    }

    #[test]
    fn test_csv_escapes_commas_and_quotes() {
        let mut seeded = record("Han \"Scoundrel\" Solo");
        seeded.description = "Smuggler, captain of the Falcon".to_string();
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(ReportSettings {
            output_dir: dir.path().to_string_lossy().into_owned(),
            write_csv: true,
        });
        let paths = writer.write("starwars", &summary(vec![seeded])).unwrap();
        let csv = fs::read_to_string(paths.csv.unwrap()).unwrap();
        assert!(csv.contains("\"Han \"\"Scoundrel\"\" Solo\""));
        assert!(csv.contains("\"Smuggler, captain of the Falcon\""));
    }
}
