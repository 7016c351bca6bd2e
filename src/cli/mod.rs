//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rembot")]
#[command(author, version, about = "Single-symbol perpetual-futures trading bot")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "settings.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trade against Binance futures until Ctrl-C
    Run(RunArgs),
    /// Replay historical klines through the bot
    Replay(ReplayArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Override the REST endpoint, e.g. the futures testnet
    #[arg(long, env = "REMBOT_BASE_URL")]
    pub base_url: Option<String>,
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct ReplayArgs {
    /// Kline CSV file (date|timestamp, open, high, low, close, volume)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Stop after this many ticks
    #[arg(short, long)]
    pub ticks: Option<u64>,

    /// Append closed positions to this CSV ledger
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Summary format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,
}
