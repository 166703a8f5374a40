use crate::{
    config::Config,
    error::AppResult,
    orchestrator::App,
    services::AgentReviewer,
    utils::logging,
};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "paper-batch-review")]
#[command(about = "Batch research paper reviewer driven by an AI-agent API")]
pub struct Args {
    /// Directory containing paper JSON files
    #[arg(long)]
    pub papers_dir: PathBuf,

    /// File pattern for paper files
    #[arg(long)]
    pub pattern: Option<String>,

    /// Output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum concurrent reviews
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Agent API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// API key for authentication
    #[arg(long)]
    pub api_key: Option<String>,

    /// Path to config TOML. Environment variables and flags override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

/// 按 默认值 → 配置文件 → 环境变量 → 命令行参数 的顺序合成配置
pub fn resolve_config(args: &Args) -> AppResult<Config> {
    let base = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut config = base.with_env()?;
    apply_args(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_args(config: &mut Config, args: &Args) {
    config.papers_dir = args.papers_dir.display().to_string();
    if let Some(pattern) = &args.pattern {
        config.pattern = pattern.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.display().to_string();
    }
    if let Some(max_concurrent) = args.max_concurrent {
        config.max_concurrent_reviews = max_concurrent;
    }
    if let Some(api_url) = &args.api_url {
        config.agent_api_url = api_url.clone();
    }
    if let Some(api_key) = &args.api_key {
        config.agent_api_key = Some(api_key.clone());
    }
}

pub async fn dispatch(args: Args) -> Result<()> {
    let config = resolve_config(&args)?;

    let default_level = if config.verbose_logging { "debug" } else { "info" };
    let level = args.log_level.as_deref().unwrap_or(default_level);
    logging::init(&config.output_log_file, level)?;

    let reviewer = Arc::new(AgentReviewer::new(&config)?);
    let app = App::new(config, reviewer)?;
    let summary = app.run().await?;

    println!("\n{}", "=".repeat(60));
    println!("BATCH REVIEW COMPLETED");
    println!("{}", "=".repeat(60));
    println!("Total papers: {}", summary.total);
    println!("Successful: {}", summary.succeeded_count());
    println!("Failed: {}", summary.failed_count());
    println!("Success rate: {:.1}%", summary.success_rate);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_config() {
        let args = Args::try_parse_from([
            "paper-batch-review",
            "--papers-dir",
            "papers",
            "--max-concurrent",
            "4",
            "--pattern",
            "nature_*.json",
            "--api-key",
            "token",
        ])
        .unwrap();

        let mut config = Config::default();
        apply_args(&mut config, &args);

        assert_eq!(config.papers_dir, "papers");
        assert_eq!(config.max_concurrent_reviews, 4);
        assert_eq!(config.pattern, "nature_*.json");
        assert_eq!(config.agent_api_key.as_deref(), Some("token"));
        assert_eq!(config.output_dir, "./batch_review_output");
    }

    #[test]
    fn test_papers_dir_required() {
        assert!(Args::try_parse_from(["paper-batch-review"]).is_err());
    }
}
