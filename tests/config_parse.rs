use paper_batch_review::cli::{resolve_config, Args};
use paper_batch_review::error::ConfigError;
use paper_batch_review::{AppError, Config};
use clap::Parser;

#[test]
fn toml_config_fills_missing_fields_with_defaults() {
    let config: Config = toml::from_str(
        r#"
max_concurrent_reviews = 4
papers_dir = "nature_papers"
agent_api_url = "http://agent.internal:3000"
"#,
    )
    .unwrap();

    assert_eq!(config.max_concurrent_reviews, 4);
    assert_eq!(config.papers_dir, "nature_papers");
    assert_eq!(config.agent_api_url, "http://agent.internal:3000");
    assert_eq!(config.pattern, "*.json");
    assert_eq!(config.summary_file_name, "batch_summary.json");
    assert_eq!(config.report_file_name, "comparative_report.md");
    assert!(config.agent_api_key.is_none());
}

#[test]
fn load_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "max_concurrent_reviews = 3\nverbose_logging = true\npoll_interval_secs = 2\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.max_concurrent_reviews, 3);
    assert!(config.verbose_logging);
    assert_eq!(config.poll_interval_secs, 2);
    assert!(config.validate().is_ok());
}

#[test]
fn invalid_toml_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "max_concurrent_reviews = \"lots\"\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(
        err,
        AppError::Config(ConfigError::TomlParseFailed { .. })
    ));
}

#[test]
fn missing_config_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, AppError::Config(ConfigError::ReadFailed { .. })));
}

#[test]
fn command_line_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "max_concurrent_reviews = 3\noutput_dir = \"from_file\"\n",
    )
    .unwrap();

    let path_arg = path.to_string_lossy().into_owned();
    let args = Args::try_parse_from([
        "paper-batch-review",
        "--papers-dir",
        "papers",
        "--config",
        path_arg.as_str(),
        "--output-dir",
        "from_flag",
    ])
    .unwrap();

    let config = resolve_config(&args).unwrap();

    assert_eq!(config.output_dir, "from_flag");
    assert_eq!(config.papers_dir, "papers");
}

#[test]
fn zero_concurrency_flag_is_rejected() {
    let args = Args::try_parse_from([
        "paper-batch-review",
        "--papers-dir",
        "papers",
        "--max-concurrent",
        "0",
    ])
    .unwrap();

    let err = resolve_config(&args).unwrap_err();
    assert!(matches!(
        err,
        AppError::Config(ConfigError::InvalidValue { .. })
    ));
}
