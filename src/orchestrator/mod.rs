//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量调度与结果汇总，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量处理器
//! - 扫描论文目录，生成任务
//! - 一次性提交所有任务，按完成顺序汇集结果
//! - 保存汇总与报告，输出全局统计
//!
//! ### `limiter` - 并发限流器
//! - 限制同时运行的任务数量（FIFO 准入）
//!
//! ### `job_executor` - 单篇论文执行器
//! - 加载论文、创建输出目录、委托评审
//! - 把所有错误转换为 `Failure` 结果
//!
//! ### `aggregator` - 结果汇总
//! - 划分成功 / 失败，计算成功率
//! - 原子写入汇总文件
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<JobDescriptor>)
//!     ↓ limiter
//! job_executor (处理单个 JobDescriptor)
//!     ↓
//! services::Reviewer (评审单篇论文)
//!     ↓
//! clients (基础设施：AgentClient)
//! ```

pub mod aggregator;
pub mod batch_processor;
pub mod job_executor;
pub mod limiter;

// 重新导出主要类型
pub use aggregator::{success_rate, BatchSummary, SummaryEntry, SummaryStore};
pub use batch_processor::{App, BatchRunner};
pub use job_executor::JobExecutor;
pub use limiter::{ConcurrencyLimiter, LimiterPermit};
