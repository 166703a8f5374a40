//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化全局日志（控制台 + 日志文件）
///
/// 只在二进制入口调用一次；库代码只使用 `tracing` 宏，
/// 测试可以用 `tracing::subscriber::set_default` 注入自己的订阅者。
///
/// # 参数
/// - `log_file_path`: 日志文件路径
/// - `level`: 默认日志级别（`RUST_LOG` 优先）
pub fn init(log_file_path: &str, level: &str) -> Result<()> {
    init_log_file(log_file_path)?;

    let file = OpenOptions::new()
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件: {}", log_file_path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| anyhow!("日志初始化失败: {e}"))?;

    Ok(())
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
///
/// # 返回
/// 返回是否成功初始化
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(log_file_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建日志目录: {}", parent.display()))?;
        }
    }

    let log_header = format!(
        "{}\n论文批量评审日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件: {}", log_file_path))?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `max_concurrent`: 最大并发数
pub fn log_startup(max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 论文批量评审模式");
    info!("📊 最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录论文加载信息
pub fn log_papers_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 篇待评审的论文", total);
    info!("📋 最多同时评审 {} 篇", max_concurrent);
}

/// 记录单个任务完成进度
pub fn log_job_progress(completed: usize, total: usize, name: &str, success: bool) {
    let mark = if success { "✓" } else { "✗" };
    info!("{} [{}/{}] {}", mark, completed, total, name);
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `success_rate`: 成功率（百分比）
/// - `output_dir`: 结果目录
pub fn print_final_stats(
    success: usize,
    failed: usize,
    total: usize,
    success_rate: f64,
    output_dir: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 批量评审完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("📈 成功率: {:.1}%", success_rate);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_dir);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("abcdefgh", 3), "abc...");
    }

    #[test]
    fn test_init_log_file_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("batch_review.log");
        let path_str = path.to_string_lossy().into_owned();

        init_log_file(&path_str).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("论文批量评审日志"));
    }
}
