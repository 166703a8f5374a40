//! 单篇论文执行器 - 编排层
//!
//! ## 职责
//!
//! 执行一个任务并把所有失败转换为 `JobOutcome::Failure`，
//! 保证单个任务的错误不会影响同批次的其他任务。
//!
//! ## 执行步骤
//!
//! 1. **准备目录**：创建任务输出目录（已存在不算错误）
//! 2. **加载论文**：读取并解析论文 JSON 文档
//! 3. **委托评审**：调用 `Reviewer` 完成评审

use crate::error::ReviewError;
use crate::models::{load_paper, JobDescriptor, JobFailure, JobOutcome, ReviewResult};
use crate::services::Reviewer;
use std::sync::Arc;
use tracing::{error, info};

/// 单篇论文执行器
pub struct JobExecutor {
    reviewer: Arc<dyn Reviewer>,
}

impl JobExecutor {
    pub fn new(reviewer: Arc<dyn Reviewer>) -> Self {
        Self { reviewer }
    }

    /// 执行单个任务
    ///
    /// # 返回
    /// 总是返回一个 `JobOutcome`，错误被记录为 `Failure`
    pub async fn execute(&self, descriptor: JobDescriptor) -> JobOutcome {
        info!("{} 🔍 开始评审", descriptor);

        match self.try_execute(&descriptor).await {
            Ok(result) => {
                info!("{} ✅ 评审完成: {}", descriptor, result.paper_title);
                JobOutcome::Success { descriptor, result }
            }
            Err(e) => {
                error!("{} ❌ 评审失败: {}", descriptor, e);
                JobOutcome::Failure {
                    failure: JobFailure::from_review_error(&e),
                    descriptor,
                }
            }
        }
    }

    async fn try_execute(&self, descriptor: &JobDescriptor) -> Result<ReviewResult, ReviewError> {
        let output_dir = descriptor.output_dir();
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| ReviewError::io(output_dir.display().to_string(), e))?;

        let paper = load_paper(descriptor.input()).await?;
        self.reviewer.review(&paper, output_dir).await
    }
}
