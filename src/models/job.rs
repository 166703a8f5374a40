//! 批处理任务模型
//!
//! - `JobDescriptor`：一个待评审的论文文件及其输出目录
//! - `JobOutcome`：单个任务的结果（成功 / 失败）

use crate::error::ReviewError;
use crate::models::review::ReviewResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// 任务描述符
///
/// 创建后不可变，每个描述符只会被执行器消费一次。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobDescriptor {
    input: PathBuf,
    name: String,
    output_dir: PathBuf,
}

impl JobDescriptor {
    /// 创建任务描述符
    ///
    /// 输出目录由输入文件名（不含扩展名）确定：`<batch_output_dir>/<stem>`
    pub fn new(input: impl Into<PathBuf>, batch_output_dir: &Path) -> Self {
        let input = input.into();
        let name = file_stem(&input);
        Self::with_name(input, name, batch_output_dir)
    }

    /// 使用指定的任务名称创建描述符，输出目录为 `<batch_output_dir>/<name>`
    pub fn with_name(
        input: impl Into<PathBuf>,
        name: impl Into<String>,
        batch_output_dir: &Path,
    ) -> Self {
        let name = name.into();
        Self {
            input: input.into(),
            output_dir: batch_output_dir.join(&name),
            name,
        }
    }

    /// 论文文件路径
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// 本任务的输出目录
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 任务名称（默认为输入文件名，不含扩展名）
    pub fn name(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Display for JobDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[论文 {}]", self.name())
    }
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 失败类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// 任务自身报告的错误（文档格式、I/O、协作者失败）
    Error,
    /// 任务异常终止（panic / 被取消），在汇集阶段捕获
    Panicked,
}

impl FailureKind {
    /// 汇总文件中的状态字段
    pub fn status(&self) -> &'static str {
        match self {
            FailureKind::Error => "error",
            FailureKind::Panicked => "exception",
        }
    }
}

/// 任务失败信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    pub kind: FailureKind,
    /// 可读的错误信息
    pub message: String,
    /// 底层原因（错误链）
    pub cause: Option<String>,
}

impl JobFailure {
    /// 从评审错误构造失败信息，保留完整的错误链
    pub fn from_review_error(err: &ReviewError) -> Self {
        let mut causes = Vec::new();
        let mut source = std::error::Error::source(err);
        while let Some(e) = source {
            causes.push(e.to_string());
            source = e.source();
        }

        Self {
            kind: FailureKind::Error,
            message: err.to_string(),
            cause: (!causes.is_empty()).then(|| causes.join(": ")),
        }
    }

    /// 任务异常终止
    pub fn panicked(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Panicked,
            message: message.into(),
            cause: None,
        }
    }
}

/// 单个任务的结果
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Success {
        descriptor: JobDescriptor,
        result: ReviewResult,
    },
    Failure {
        descriptor: JobDescriptor,
        failure: JobFailure,
    },
}

impl JobOutcome {
    pub fn descriptor(&self) -> &JobDescriptor {
        match self {
            JobOutcome::Success { descriptor, .. } | JobOutcome::Failure { descriptor, .. } => {
                descriptor
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success { .. })
    }
}
