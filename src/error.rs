use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入错误（任何任务开始前即终止整个批次）
    #[error("输入错误: {0}")]
    Input(#[from] InputError),
    /// 持久化错误（汇总文件 / 报告写入失败）
    #[error("持久化错误: {0}")]
    Persist(#[from] PersistError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 单篇论文评审错误
    #[error("评审错误: {0}")]
    Review(#[from] ReviewError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 输入错误
#[derive(Debug, Error)]
pub enum InputError {
    /// 论文目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// 没有匹配的论文文件
    #[error("在 {dir} 中没有找到匹配 {pattern} 的论文文件")]
    NoMatchingFiles { dir: String, pattern: String },
    /// glob 模式非法
    #[error("无效的文件匹配模式 {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// 持久化错误
#[derive(Debug, Error)]
pub enum PersistError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 序列化 / 解析失败
    #[error("JSON处理失败 ({path}): {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置值非法
    #[error("配置项 {field} 非法: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 单篇论文评审错误
///
/// 由评审协作者（`Reviewer`）返回，在任务边界被转换为 `JobFailure`。
#[derive(Debug, Error)]
pub enum ReviewError {
    /// 论文文档格式错误
    #[error("论文文档格式错误 ({path}): {reason}")]
    MalformedDocument { path: String, reason: String },
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, body={body}")]
    BadResponse {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 会话执行失败
    #[error("会话 {session_id} 执行失败: {message}")]
    SessionFailed { session_id: String, message: String },
    /// 等待超时
    #[error("会话 {session_id} 在 {timeout_secs} 秒内未完成")]
    Timeout {
        session_id: String,
        timeout_secs: u64,
    },
    /// 文件 I/O 错误
    #[error("文件操作失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 协作者自定义错误
    #[error("{0}")]
    Other(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建持久化写入错误
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Persist(PersistError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建配置值非法错误
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Config(ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        })
    }
}

impl ReviewError {
    /// 创建文件 I/O 错误
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ReviewError::Io {
            path: path.into(),
            source,
        }
    }

    /// 创建API请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ReviewError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
