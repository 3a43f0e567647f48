use anyhow::{Context, Result};
use serde::Deserialize;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Line format of emitted log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global subscriber. Logs go to stderr unless `log_file` is
/// given; file output drops ANSI colours and keeps file/line numbers.
pub fn init_logging(level: &str, format: LogFormat, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let file = match log_file {
        Some(path) => Some(Arc::new(
            std::fs::File::create(path)
                .with_context(|| format!("create log file: {}", path.display()))?,
        )),
        None => None,
    };
    let builder = FmtSubscriber::builder().with_env_filter(filter);
    match (format, file) {
        (LogFormat::Text, None) => {
            tracing::subscriber::set_global_default(builder.with_writer(io::stderr).finish())?;
        }
        (LogFormat::Json, None) => {
            tracing::subscriber::set_global_default(
                builder.json().with_writer(io::stderr).finish(),
            )?;
        }
        (LogFormat::Text, Some(file)) => {
            let subscriber = builder
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(file)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        (LogFormat::Json, Some(file)) => {
            let subscriber = builder
                .json()
                .with_file(true)
                .with_line_number(true)
                .with_writer(file)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    info!(component = "logging", level, format = ?format, "logging initialized");
    Ok(())
}
