use anyhow::Result;
use clap::Parser;
use paper_batch_review::cli;
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    if let Err(err) = cli::dispatch(args).await {
        error!("{:#}", err);
        eprintln!("❌ 批量评审失败: {:#}", err);
        std::process::exit(1);
    }

    Ok(())
}
