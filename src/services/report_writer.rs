//! 对比报告生成 - 业务能力层
//!
//! 只负责把 `BatchSummary` 渲染成 markdown，不重新读取论文或重跑任务

use crate::error::{AppError, AppResult};
use crate::orchestrator::BatchSummary;
use crate::utils::fs::write_atomic;
use std::path::Path;
use tracing::info;

/// 渲染对比报告
///
/// 纯函数：同一个 `BatchSummary` 总是得到完全相同的文本。
pub fn render_report(summary: &BatchSummary) -> String {
    let mut lines = vec![
        "# Comparative Paper Review Report".to_string(),
        String::new(),
        "## Summary".to_string(),
        format!("- Total papers reviewed: {}", summary.total),
        format!("- Successful reviews: {}", summary.succeeded_count()),
        format!("- Failed reviews: {}", summary.failed_count()),
        format!("- Success rate: {:.1}%", summary.success_rate),
        String::new(),
        "## Individual Paper Results".to_string(),
        String::new(),
    ];

    for entry in &summary.succeeded {
        lines.push(format!("### {}", entry.name()));
        lines.push(format!("**Title**: {}", entry.title()));
        lines.push("**Status**: ✅ Success".to_string());
        lines.push(format!("**Output**: {}", entry.output_dir));
        lines.push(String::new());
    }

    if !summary.failed.is_empty() {
        lines.push("## Failed Reviews".to_string());
        lines.push(String::new());

        for entry in &summary.failed {
            lines.push(format!("### {}", entry.name()));
            lines.push("**Status**: ❌ Failed".to_string());
            lines.push(format!(
                "**Error**: {}",
                entry.error.as_deref().unwrap_or("Unknown error")
            ));
            lines.push(String::new());
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// 渲染并原子写入对比报告
pub fn write_report(path: &Path, summary: &BatchSummary) -> AppResult<()> {
    info!("📝 正在生成对比报告...");

    let report = render_report(summary);
    write_atomic(path, report.as_bytes())
        .map_err(|e| AppError::write_failed(path.display().to_string(), e))?;

    info!("✓ 对比报告已保存至: {}", path.display());
    Ok(())
}
