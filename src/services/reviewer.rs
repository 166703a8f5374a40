//! 单篇论文评审能力 - 业务能力层
//!
//! 批处理只依赖这个 trait，不关心评审内部如何完成（网络调用、子进程等）

use crate::error::ReviewError;
use crate::models::{PaperData, ReviewResult};
use async_trait::async_trait;
use std::path::Path;

/// 单篇论文评审协作者
///
/// 实现必须可以安全地并发调用。
#[async_trait]
pub trait Reviewer: Send + Sync {
    /// 评审一篇论文，评审产物写入 `output_dir`
    async fn review(&self, paper: &PaperData, output_dir: &Path)
        -> Result<ReviewResult, ReviewError>;
}
