//! # Paper Batch Review
//!
//! 一个用于批量评审研究论文的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 与外部 Agent API 的 HTTP 交互
//! - `AgentClient` - 会话创建、消息发送、状态轮询
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单篇论文或单份汇总
//! - `Reviewer` - 单篇论文评审能力（批处理只依赖这个 trait）
//! - `AgentReviewer` - 基于 Agent 会话的默认实现
//! - `report_writer` - 对比报告渲染
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量调度、结果汇集
//! - `orchestrator/limiter` - 并发限流
//! - `orchestrator/job_executor` - 单个任务执行与失败隔离
//! - `orchestrator/aggregator` - 结果汇总与持久化
//!
//! ## 模块结构

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{JobDescriptor, JobFailure, JobOutcome, PaperData, ReviewResult};
pub use orchestrator::{App, BatchRunner, BatchSummary, ConcurrencyLimiter, SummaryStore};
pub use services::{render_report, AgentReviewer, Reviewer};
