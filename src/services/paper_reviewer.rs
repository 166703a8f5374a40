//! Agent 论文评审服务 - 业务能力层
//!
//! 通过 Agent 会话完成一篇论文的评审：
//! 创建会话 → 发送提示词 → 等待完成 → 拉取消息 → 保存评审产物

use crate::clients::{AgentClient, SessionMessage};
use crate::config::Config;
use crate::error::ReviewError;
use crate::models::{PaperData, ReviewResult};
use crate::services::prompt::build_review_prompt;
use crate::services::Reviewer;
use crate::utils::logging::truncate_text;
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const ASSESSMENT_FILE: &str = "critical_assessment.md";
const RESULTS_FILE: &str = "review_results.json";

/// 从会话消息中提取的评审内容
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewContent {
    /// 最后一条助手回复
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_response: Option<String>,
    /// 提到 critical_assessment.md 的最后一条助手回复
    #[serde(rename = "critical_assessment.md", skip_serializing_if = "Option::is_none")]
    pub critical_assessment: Option<String>,
}

/// review_results.json 的内容
#[derive(Serialize)]
struct ReviewResultsFile<'a> {
    session_id: &'a str,
    paper_title: &'a str,
    review_content: &'a ReviewContent,
    messages: &'a [SessionMessage],
}

/// 提取评审内容（只看助手消息）
pub fn extract_review_content(messages: &[SessionMessage]) -> ReviewContent {
    let mut content = ReviewContent::default();

    for message in messages.iter().filter(|m| m.message_type == "assistant") {
        let Some(text) = message.content.as_deref() else {
            continue;
        };
        if text.contains(ASSESSMENT_FILE) {
            content.critical_assessment = Some(text.to_string());
        }
        content.final_response = Some(text.to_string());
    }

    content
}

/// 基于 Agent 会话的评审服务
pub struct AgentReviewer {
    client: AgentClient,
    poll_interval: Duration,
    timeout: Duration,
}

impl AgentReviewer {
    /// 创建新的评审服务
    pub fn new(config: &Config) -> Result<Self, ReviewError> {
        Ok(Self {
            client: AgentClient::new(config)?,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            timeout: Duration::from_secs(config.review_timeout_secs),
        })
    }
}

#[async_trait]
impl Reviewer for AgentReviewer {
    async fn review(
        &self,
        paper: &PaperData,
        output_dir: &Path,
    ) -> Result<ReviewResult, ReviewError> {
        let paper_title = paper.title_or_unknown();

        let session_id = self.client.start_session().await?;
        info!(
            "🤖 已创建会话 {} ({}) 评审: {}",
            session_id,
            self.client.base_url(),
            truncate_text(&paper_title, 60)
        );

        let prompt = build_review_prompt(paper).map_err(|e| ReviewError::Other(e.to_string()))?;
        debug!("提示词长度: {}", prompt.chars().count());
        self.client.send_message(&session_id, &prompt).await?;

        info!("⏳ 等待会话 {} 完成...", session_id);
        self.client
            .wait_for_completion(&session_id, self.poll_interval, self.timeout)
            .await?;

        let messages = self.client.get_session_messages(&session_id).await?;
        let content = extract_review_content(&messages);
        if let Some(response) = &content.final_response {
            debug!("最终回复: {}", truncate_text(response, 200));
        }

        let results_path = output_dir.join(RESULTS_FILE);
        let results = ReviewResultsFile {
            session_id: &session_id,
            paper_title: &paper_title,
            review_content: &content,
            messages: &messages,
        };
        let results_json =
            serde_json::to_string_pretty(&results).map_err(|e| ReviewError::Other(e.to_string()))?;
        tokio::fs::write(&results_path, results_json)
            .await
            .map_err(|e| ReviewError::io(results_path.display().to_string(), e))?;

        let assessment_path = match &content.critical_assessment {
            Some(assessment) => {
                let path = output_dir.join(ASSESSMENT_FILE);
                tokio::fs::write(&path, assessment)
                    .await
                    .map_err(|e| ReviewError::io(path.display().to_string(), e))?;
                Some(path)
            }
            None => None,
        };

        Ok(ReviewResult {
            paper_title,
            session_id: Some(session_id),
            assessment_path,
            message_count: messages.len(),
        })
    }
}
