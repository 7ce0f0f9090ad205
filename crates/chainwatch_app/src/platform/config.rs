use std::path::PathBuf;
use std::time::Duration;

use chainwatch_engine::BackendSettings;
use chainwatch_logging::LogDestination;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Terminal controller for the chain analysis dashboard backend
#[derive(Debug, Parser)]
#[command(name = "chainwatch", version)]
#[command(about = "Submits analysis jobs, merges their results and keeps them refreshed")]
pub struct Cli {
    /// Base URL of the analysis backend
    #[arg(long, env = "CHAINWATCH_API_URL", default_value = "http://127.0.0.1:5000")]
    pub api_url: String,

    /// File holding the session-scoped settings
    #[arg(long, env = "CHAINWATCH_SESSION_FILE", default_value = ".chainwatch_session.ron")]
    pub session_file: PathBuf,

    /// Start a new session instead of restoring the previous one
    #[arg(long)]
    pub fresh_session: bool,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value = "60")]
    pub request_timeout_secs: u64,

    /// Seconds between background health checks (0 disables them)
    #[arg(long, default_value = "15")]
    pub health_interval_secs: u64,

    /// Where log output goes
    #[arg(long, value_enum, default_value = "file")]
    pub log: LogTarget,

    /// Log at debug level
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.api_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..BackendSettings::default()
        }
    }

    pub fn health_interval(&self) -> Option<Duration> {
        (self.health_interval_secs > 0).then(|| Duration::from_secs(self.health_interval_secs))
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
