//! Motordesk CLI - motor maintenance tracking over the backend REST API

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use motordesk_client::{ApiClient, ApiError};
use motordesk_core::FileSessionStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error};

#[derive(Parser)]
#[command(name = "motordesk")]
#[command(about = "Track motors through the repair and maintenance lifecycle")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Backend base URL
    #[arg(
        long,
        global = true,
        env = "MOTORDESK_URL",
        default_value = "http://127.0.0.1:9080"
    )]
    base_url: String,

    /// Session file (defaults to the platform config directory)
    #[arg(long, global = true, env = "MOTORDESK_SESSION")]
    session_file: Option<PathBuf>,

    /// Request timeout in seconds (0 = transport default)
    #[arg(short = 't', long, global = true, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.into())?;

    let session_path = match cli.session_file {
        Some(path) => path,
        None => FileSessionStore::default_path()?,
    };
    let store = Arc::new(FileSessionStore::new(session_path));

    let mut builder = ApiClient::builder()
        .base_url(cli.base_url)
        .session_store(store)
        .on_session_expired(|| eprintln!("session expired, please run `motordesk login` again"));
    if cli.timeout > 0 {
        builder = builder.timeout(Duration::from_secs(cli.timeout));
    }
    let client = builder.build()?;
    client.restore_session().await?;

    if let Err(err) = cli.command.execute(client).await {
        if err
            .downcast_ref::<ApiError>()
            .is_some_and(ApiError::is_auth_error)
        {
            eprintln!("run `motordesk login` to authenticate");
        }
        error!("Command failed: {err}");
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
