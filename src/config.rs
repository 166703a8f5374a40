use crate::error::{AppError, AppResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 同时评审的论文数量
    pub max_concurrent_reviews: usize,
    /// 论文 JSON 文件存放目录
    pub papers_dir: String,
    /// 论文文件匹配模式
    pub pattern: String,
    /// 批次输出目录
    pub output_dir: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 批次汇总文件名（位于输出目录下）
    pub summary_file_name: String,
    /// 对比报告文件名（位于输出目录下）
    pub report_file_name: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- Agent API 配置 ---
    pub agent_api_url: String,
    pub agent_api_key: Option<String>,
    pub agent_name: String,
    pub agent_model_name: String,
    pub agent_max_iterations: u32,
    /// 会话状态轮询间隔（秒）
    pub poll_interval_secs: u64,
    /// 单篇评审超时（秒）
    pub review_timeout_secs: u64,
    /// 单个 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_reviews: 2,
            papers_dir: "papers".to_string(),
            pattern: "*.json".to_string(),
            output_dir: "./batch_review_output".to_string(),
            output_log_file: "batch_review.log".to_string(),
            summary_file_name: "batch_summary.json".to_string(),
            report_file_name: "comparative_report.md".to_string(),
            verbose_logging: false,
            agent_api_url: "http://localhost:3000".to_string(),
            agent_api_key: None,
            agent_name: "CodeActAgent".to_string(),
            agent_model_name: "anthropic/claude-3-5-sonnet-20241022".to_string(),
            agent_max_iterations: 100,
            poll_interval_secs: 5,
            review_timeout_secs: 3600,
            request_timeout_secs: 300,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载配置，缺失的字段使用默认值
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&raw).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(config)
    }

    /// 使用默认值并叠加环境变量
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env()
    }

    /// 在当前配置上叠加环境变量
    pub fn with_env(self) -> AppResult<Self> {
        self.with_vars(|name| std::env::var(name).ok())
    }

    /// 按给定的变量来源叠加配置（便于测试时不修改进程环境）
    pub fn with_vars<F>(mut self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MAX_CONCURRENT_REVIEWS") {
            self.max_concurrent_reviews = parse_var("MAX_CONCURRENT_REVIEWS", &v, "usize")?;
        }
        if let Some(v) = lookup("PAPERS_DIR") {
            self.papers_dir = v;
        }
        if let Some(v) = lookup("PAPER_PATTERN") {
            self.pattern = v;
        }
        if let Some(v) = lookup("OUTPUT_DIR") {
            self.output_dir = v;
        }
        if let Some(v) = lookup("OUTPUT_LOG_FILE") {
            self.output_log_file = v;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", &v, "bool")?;
        }
        if let Some(v) = lookup("AGENT_API_URL") {
            self.agent_api_url = v;
        }
        if let Some(v) = lookup("AGENT_API_KEY") {
            self.agent_api_key = Some(v);
        }
        if let Some(v) = lookup("AGENT_MODEL_NAME") {
            self.agent_model_name = v;
        }
        if let Some(v) = lookup("POLL_INTERVAL_SECS") {
            self.poll_interval_secs = parse_var("POLL_INTERVAL_SECS", &v, "u64")?;
        }
        if let Some(v) = lookup("REVIEW_TIMEOUT_SECS") {
            self.review_timeout_secs = parse_var("REVIEW_TIMEOUT_SECS", &v, "u64")?;
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", &v, "u64")?;
        }
        Ok(self)
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        if self.max_concurrent_reviews == 0 {
            return Err(AppError::invalid_config(
                "max_concurrent_reviews",
                "必须大于等于 1",
            ));
        }
        if self.pattern.trim().is_empty() {
            return Err(AppError::invalid_config("pattern", "不能为空"));
        }
        if self.poll_interval_secs == 0 {
            return Err(AppError::invalid_config(
                "poll_interval_secs",
                "必须大于等于 1",
            ));
        }
        if self.review_timeout_secs == 0 {
            return Err(AppError::invalid_config(
                "review_timeout_secs",
                "必须大于等于 1",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::invalid_config(
                "request_timeout_secs",
                "必须大于等于 1",
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(var_name: &str, value: &str, expected_type: &str) -> AppResult<T> {
    value.trim().parse().map_err(|_| {
        AppError::Config(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
    })
}
