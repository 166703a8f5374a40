//! 结果汇总 - 编排层
//!
//! 把全部 `JobOutcome` 汇总为 `BatchSummary` 并原子写入汇总文件。
//! 汇总与完成顺序无关，成功 / 失败列表保持结果到达的顺序。

use crate::error::{AppError, AppResult, PersistError};
use crate::models::{JobOutcome, ReviewResult};
use crate::utils::fs::write_atomic;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// 批次汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SummaryDocument", try_from = "SummaryDocument")]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: Vec<SummaryEntry>,
    pub failed: Vec<SummaryEntry>,
    /// 成功率（百分比，保留一位小数）
    pub success_rate: f64,
}

/// 汇总中的单条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub paper_file: String,
    pub output_dir: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ReviewResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl SummaryEntry {
    fn from_outcome(outcome: JobOutcome) -> Self {
        match outcome {
            JobOutcome::Success { descriptor, result } => Self {
                paper_file: descriptor.input().display().to_string(),
                output_dir: descriptor.output_dir().display().to_string(),
                status: "success".to_string(),
                results: Some(result),
                error: None,
                cause: None,
            },
            JobOutcome::Failure {
                descriptor,
                failure,
            } => Self {
                paper_file: descriptor.input().display().to_string(),
                output_dir: descriptor.output_dir().display().to_string(),
                status: failure.kind.status().to_string(),
                results: None,
                error: Some(failure.message),
                cause: failure.cause,
            },
        }
    }

    /// 任务名称（输出目录名，批次内唯一）
    pub fn name(&self) -> String {
        Path::new(&self.output_dir)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// 评审结果中的论文标题
    pub fn title(&self) -> &str {
        self.results
            .as_ref()
            .map(|r| r.paper_title.as_str())
            .unwrap_or("Unknown")
    }
}

impl BatchSummary {
    /// 汇总全部任务结果
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = JobOutcome>,
    {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for outcome in outcomes {
            if outcome.is_success() {
                succeeded.push(SummaryEntry::from_outcome(outcome));
            } else {
                failed.push(SummaryEntry::from_outcome(outcome));
            }
        }

        let total = succeeded.len() + failed.len();
        Self {
            total,
            success_rate: success_rate(succeeded.len(), total),
            succeeded,
            failed,
        }
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// 计数是否自洽
    pub fn is_consistent(&self) -> bool {
        self.succeeded.len() + self.failed.len() == self.total
            && (self.success_rate - success_rate(self.succeeded.len(), self.total)).abs() < 0.05
    }
}

/// 成功率百分比，保留一位小数；总数为 0 时为 0
pub fn success_rate(succeeded: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = succeeded as f64 / total as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

/// 汇总文件的磁盘格式
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SummaryDocument {
    total_papers: usize,
    successful: usize,
    failed: usize,
    success_rate: f64,
    successful_reviews: Vec<SummaryEntry>,
    failed_reviews: Vec<SummaryEntry>,
}

impl From<BatchSummary> for SummaryDocument {
    fn from(summary: BatchSummary) -> Self {
        Self {
            total_papers: summary.total,
            successful: summary.succeeded.len(),
            failed: summary.failed.len(),
            success_rate: summary.success_rate,
            successful_reviews: summary.succeeded,
            failed_reviews: summary.failed,
        }
    }
}

impl TryFrom<SummaryDocument> for BatchSummary {
    type Error = String;

    fn try_from(doc: SummaryDocument) -> Result<Self, Self::Error> {
        if doc.successful != doc.successful_reviews.len() || doc.failed != doc.failed_reviews.len()
        {
            return Err(format!(
                "计数与列表不一致: successful={} ({} 条), failed={} ({} 条)",
                doc.successful,
                doc.successful_reviews.len(),
                doc.failed,
                doc.failed_reviews.len()
            ));
        }

        let summary = BatchSummary {
            total: doc.total_papers,
            succeeded: doc.successful_reviews,
            failed: doc.failed_reviews,
            success_rate: doc.success_rate,
        };
        if !summary.is_consistent() {
            return Err(format!(
                "汇总不一致: total_papers={}, success_rate={}",
                summary.total, summary.success_rate
            ));
        }
        Ok(summary)
    }
}

/// 汇总文件存储
pub struct SummaryStore;

impl SummaryStore {
    /// 原子写入汇总文件（先写临时文件再重命名）
    pub fn persist(path: &Path, summary: &BatchSummary) -> AppResult<()> {
        let json = serde_json::to_string_pretty(summary).map_err(|source| PersistError::Json {
            path: path.display().to_string(),
            source,
        })?;

        write_atomic(path, json.as_bytes())
            .map_err(|e| AppError::write_failed(path.display().to_string(), e))?;

        info!("💾 批次汇总已保存至: {}", path.display());
        Ok(())
    }

    /// 读取汇总文件，计数不一致的文件视为损坏
    pub fn load(path: &Path) -> AppResult<BatchSummary> {
        let raw = std::fs::read_to_string(path).map_err(|source| PersistError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let summary = serde_json::from_str(&raw).map_err(|source| PersistError::Json {
            path: path.display().to_string(),
            source,
        })?;
        Ok(summary)
    }
}
