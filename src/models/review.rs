use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 单篇论文的评审结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub paper_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// 生成的 critical_assessment.md 路径
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_path: Option<PathBuf>,
    #[serde(default)]
    pub message_count: usize,
}

impl ReviewResult {
    pub fn new(paper_title: impl Into<String>) -> Self {
        Self {
            paper_title: paper_title.into(),
            session_id: None,
            assessment_path: None,
            message_count: 0,
        }
    }
}
