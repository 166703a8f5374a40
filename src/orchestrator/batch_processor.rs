//! 批量论文评审处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量论文的调度与结果汇总。
//!
//! ## 核心功能
//!
//! 1. **批量加载**：扫描论文目录，生成所有任务描述符
//! 2. **并发控制**：所有任务在批次开始时一次性创建，由 `ConcurrencyLimiter` 限制同时运行的数量
//! 3. **失败隔离**：单个任务失败只产生一个 `Failure` 结果，不影响其他任务
//! 4. **结果汇集**：按完成顺序收集结果，全部结束后再进入汇总
//! 5. **全局统计**：原子写入汇总文件，生成对比报告
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单篇论文的细节，委托 `JobExecutor`
//! - **日志上下文**：当前的 tracing 订阅者随任务一起传入 `tokio::spawn`

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{discover_jobs, FailureKind, JobDescriptor, JobFailure, JobOutcome};
use crate::orchestrator::aggregator::{BatchSummary, SummaryStore};
use crate::orchestrator::job_executor::JobExecutor;
use crate::orchestrator::limiter::ConcurrencyLimiter;
use crate::services::{write_report, Reviewer};
use crate::utils::logging::{log_job_progress, log_papers_loaded, log_startup, print_final_stats};
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::instrument::WithSubscriber;
use tracing::{error, info, info_span, Instrument};

/// 批量任务执行器
///
/// 每个任务一个 tokio 任务，全部在开始时提交；限流器是任务间唯一共享的可变状态。
pub struct BatchRunner {
    executor: Arc<JobExecutor>,
    limiter: ConcurrencyLimiter,
}

impl BatchRunner {
    /// 创建执行器
    ///
    /// # 参数
    /// - `reviewer`: 单篇论文评审协作者
    /// - `max_concurrent`: 最大并发数（必须大于等于 1）
    pub fn new(reviewer: Arc<dyn Reviewer>, max_concurrent: usize) -> AppResult<Self> {
        Ok(Self {
            executor: Arc::new(JobExecutor::new(reviewer)),
            limiter: ConcurrencyLimiter::new(max_concurrent)?,
        })
    }

    /// 限流器（用于统计）
    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// 运行全部任务
    ///
    /// # 返回
    /// 每个任务恰好一个结果，按完成顺序排列；所有任务结束后才返回
    pub async fn run(&self, jobs: Vec<JobDescriptor>) -> Vec<JobOutcome> {
        let total = jobs.len();
        let mut pending = FuturesUnordered::new();

        for descriptor in jobs {
            let executor = Arc::clone(&self.executor);
            let limiter = self.limiter.clone();
            let job = descriptor.clone();
            let span = info_span!("job", name = %descriptor.name());

            let handle = tokio::spawn(
                async move {
                    let _permit = match limiter.acquire().await {
                        Ok(permit) => permit,
                        Err(e) => {
                            return JobOutcome::Failure {
                                failure: JobFailure {
                                    kind: FailureKind::Error,
                                    message: e.to_string(),
                                    cause: None,
                                },
                                descriptor: job,
                            }
                        }
                    };
                    executor.execute(job).await
                }
                .instrument(span)
                .with_current_subscriber(),
            );

            pending.push(async move { (descriptor, handle.await) });
        }

        let mut outcomes = Vec::with_capacity(total);
        while let Some((descriptor, joined)) = pending.next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    let message = describe_join_error(e);
                    error!("{} 💥 任务异常终止: {}", descriptor, message);
                    JobOutcome::Failure {
                        descriptor,
                        failure: JobFailure::panicked(message),
                    }
                }
            };

            log_job_progress(
                outcomes.len() + 1,
                total,
                &outcome.descriptor().name(),
                outcome.is_success(),
            );
            outcomes.push(outcome);
        }

        outcomes
    }
}

fn describe_join_error(err: JoinError) -> String {
    if err.is_cancelled() {
        return "任务被取消".to_string();
    }

    match err.try_into_panic() {
        Ok(payload) => {
            if let Some(msg) = payload.downcast_ref::<&str>() {
                format!("任务 panic: {}", msg)
            } else if let Some(msg) = payload.downcast_ref::<String>() {
                format!("任务 panic: {}", msg)
            } else {
                "任务 panic".to_string()
            }
        }
        Err(err) => err.to_string(),
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    reviewer: Arc<dyn Reviewer>,
}

impl App {
    /// 初始化应用
    pub fn new(config: Config, reviewer: Arc<dyn Reviewer>) -> AppResult<Self> {
        config.validate()?;
        log_startup(config.max_concurrent_reviews);
        Ok(Self { config, reviewer })
    }

    /// 运行应用主逻辑
    ///
    /// 输入错误（目录不存在、没有匹配文件）在任何任务开始前返回；
    /// 单个任务失败不会导致返回错误。
    pub async fn run(&self) -> AppResult<BatchSummary> {
        let output_dir = PathBuf::from(&self.config.output_dir);

        info!("\n📁 正在扫描待评审的论文...");
        let jobs = discover_jobs(
            Path::new(&self.config.papers_dir),
            &self.config.pattern,
            &output_dir,
        )?;
        log_papers_loaded(jobs.len(), self.config.max_concurrent_reviews);

        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(|e| AppError::write_failed(output_dir.display().to_string(), e))?;

        let runner = BatchRunner::new(Arc::clone(&self.reviewer), self.config.max_concurrent_reviews)?;
        let outcomes = runner.run(jobs).await;
        info!(
            "📊 同时运行的最大任务数: {}/{}",
            runner.limiter().peak_in_flight(),
            runner.limiter().capacity()
        );

        let summary = BatchSummary::from_outcomes(outcomes);
        self.persist(&output_dir, &summary).await?;

        print_final_stats(
            summary.succeeded_count(),
            summary.failed_count(),
            summary.total,
            summary.success_rate,
            &self.config.output_dir,
        );

        Ok(summary)
    }

    /// 保存汇总与报告，失败时把内存中的汇总输出到控制台
    ///
    /// 文件写入在阻塞线程池中执行，并沿用当前的日志订阅者
    async fn persist(&self, output_dir: &Path, summary: &BatchSummary) -> AppResult<()> {
        let summary_path = output_dir.join(&self.config.summary_file_name);
        let report_path = output_dir.join(&self.config.report_file_name);
        let snapshot = summary.clone();
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());

        let result = tokio::task::spawn_blocking(move || {
            tracing::dispatcher::with_default(&dispatch, || {
                SummaryStore::persist(&summary_path, &snapshot)?;
                write_report(&report_path, &snapshot)
            })
        })
        .await
        .unwrap_or_else(|e| Err(AppError::Other(format!("保存任务异常终止: {}", e))));

        if let Err(e) = &result {
            error!("❌ 保存批次结果失败: {}", e);
            log_summary_fallback(summary);
        }
        result
    }
}

fn log_summary_fallback(summary: &BatchSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => {
            error!("以下为内存中的批次汇总:");
            println!("{}", json);
        }
        Err(e) => error!("无法序列化批次汇总: {}", e),
    }
}
