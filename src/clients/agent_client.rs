//! Agent API 客户端
//!
//! 封装与 Agent 会话 API 相关的 HTTP 调用

use crate::config::Config;
use crate::error::ReviewError;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::debug;

/// 会话状态
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// 会话消息
///
/// 除类型与内容外的字段（id、时间戳、工具调用等）原样保留在 `extra` 中
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMessage {
    #[serde(default)]
    pub message_type: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct SessionCreated {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct SessionMessages {
    #[serde(default)]
    messages: Vec<SessionMessage>,
}

/// Agent API 客户端
pub struct AgentClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    agent_name: String,
    model_name: String,
    max_iterations: u32,
}

impl AgentClient {
    /// 创建新的 Agent 客户端
    ///
    /// 每个请求都受 `request_timeout_secs` 限制
    pub fn new(config: &Config) -> Result<Self, ReviewError> {
        let base_url = config.agent_api_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ReviewError::request_failed(base_url.clone(), e))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.agent_api_key.clone(),
            agent_name: config.agent_name.clone(),
            model_name: config.agent_model_name.clone(),
            max_iterations: config.agent_max_iterations,
        })
    }

    /// API 地址
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 创建新会话
    ///
    /// # 返回
    /// 返回会话 ID
    pub async fn start_session(&self) -> Result<String, ReviewError> {
        let payload = json!({
            "agent": self.agent_name,
            "args": {
                "model_name": self.model_name,
                "max_iterations": self.max_iterations
            }
        });

        let created: SessionCreated = self
            .send_json(self.request(Method::POST, "/api/sessions").json(&payload), "/api/sessions")
            .await?;
        Ok(created.session_id)
    }

    /// 向会话发送用户消息
    pub async fn send_message(&self, session_id: &str, message: &str) -> Result<Value, ReviewError> {
        let endpoint = format!("/api/sessions/{}/messages", session_id);
        let payload = json!({
            "message": message,
            "message_type": "user"
        });

        self.send_json(self.request(Method::POST, &endpoint).json(&payload), &endpoint)
            .await
    }

    /// 查询会话状态
    pub async fn get_session_status(&self, session_id: &str) -> Result<SessionStatus, ReviewError> {
        let endpoint = format!("/api/sessions/{}/status", session_id);
        self.send_json(self.request(Method::GET, &endpoint), &endpoint)
            .await
    }

    /// 等待会话完成
    ///
    /// 整个轮询过程（包括进行中的状态请求）不超过 `timeout`
    ///
    /// # 参数
    /// - `session_id`: 会话 ID
    /// - `poll_interval`: 轮询间隔
    /// - `timeout`: 最长等待时间
    pub async fn wait_for_completion(
        &self,
        session_id: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<(), ReviewError> {
        match tokio::time::timeout(timeout, self.poll_until_done(session_id, poll_interval)).await {
            Ok(result) => result,
            Err(_) => Err(ReviewError::Timeout {
                session_id: session_id.to_string(),
                timeout_secs: timeout.as_secs(),
            }),
        }
    }

    async fn poll_until_done(
        &self,
        session_id: &str,
        poll_interval: Duration,
    ) -> Result<(), ReviewError> {
        loop {
            let status = self.get_session_status(session_id).await?;
            debug!("会话 {} 状态: {}", session_id, status.status);

            match status.status.as_str() {
                "completed" => return Ok(()),
                "error" => {
                    return Err(ReviewError::SessionFailed {
                        session_id: session_id.to_string(),
                        message: status.error.unwrap_or_else(|| "Unknown error".to_string()),
                    })
                }
                _ => tokio::time::sleep(poll_interval).await,
            }
        }
    }

    /// 获取会话全部消息
    pub async fn get_session_messages(
        &self,
        session_id: &str,
    ) -> Result<Vec<SessionMessage>, ReviewError> {
        let endpoint = format!("/api/sessions/{}/messages", session_id);
        let data: SessionMessages = self
            .send_json(self.request(Method::GET, &endpoint), &endpoint)
            .await?;
        Ok(data.messages)
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, endpoint))
            .header("Accept", "application/json");

        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ReviewError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ReviewError::request_failed(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewError::BadResponse {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ReviewError::request_failed(endpoint, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// 只接受连接、从不回复的服务端，返回其地址
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{}", addr)
    }

    fn config_for(url: String, request_timeout_secs: u64) -> Config {
        Config {
            agent_api_url: url,
            request_timeout_secs,
            ..Default::default()
        }
    }

    #[test]
    fn test_message_keeps_unknown_fields() {
        let raw = r#"{
            "message_type": "assistant",
            "content": "hi",
            "id": 7,
            "timestamp": "2024-05-01T10:00:00",
            "tool_calls": [{"name": "bash"}]
        }"#;

        let message: SessionMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(message.content.as_deref(), Some("hi"));

        let saved = serde_json::to_value(&message).unwrap();
        assert_eq!(saved["id"], 7);
        assert_eq!(saved["timestamp"], "2024-05-01T10:00:00");
        assert_eq!(saved["tool_calls"][0]["name"], "bash");
    }

    #[test]
    fn test_message_with_null_content() {
        let messages: SessionMessages = serde_json::from_str(
            r#"{"messages": [{"message_type": "assistant", "content": null}, {"message_type": "user"}]}"#,
        )
        .unwrap();

        assert_eq!(messages.messages.len(), 2);
        assert!(messages.messages.iter().all(|m| m.content.is_none()));
    }

    #[tokio::test]
    async fn test_stalled_request_hits_request_timeout() {
        let client = AgentClient::new(&config_for(silent_server().await, 1)).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(10), client.start_session())
            .await
            .expect("请求未在超时时间内返回");

        assert!(matches!(result, Err(ReviewError::RequestFailed { .. })));
    }

    #[tokio::test]
    async fn test_stalled_polling_hits_review_timeout() {
        let client = AgentClient::new(&config_for(silent_server().await, 300)).unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(10),
            client.wait_for_completion("s-1", Duration::from_millis(100), Duration::from_secs(1)),
        )
        .await
        .expect("轮询未在超时时间内返回");

        assert!(matches!(
            result,
            Err(ReviewError::Timeout { timeout_secs: 1, .. })
        ));
    }
}
