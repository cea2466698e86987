use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "photomania",
    version,
    about = "A terminal browser for popular photo feeds",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// API base URL.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// API consumer key.
    #[arg(long, env = "PHOTOMANIA_CONSUMER_KEY", hide_env_values = true)]
    pub consumer_key: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Maximum number of decoded images kept in memory.
    #[arg(long, value_name = "COUNT")]
    pub cache_max_images: Option<usize>,
}
