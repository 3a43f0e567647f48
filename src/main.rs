use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use entity_rel::cli::{self, Cli};
use entity_rel::config::AppConfig;
use entity_rel::logging::init_logging;
use entity_rel::project::find_root;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("resolve current dir")?;
    let project_root = find_root(&cwd).unwrap_or_else(|| cwd.clone());

    let cfg = AppConfig::load(&cli.overrides(), &project_root)?;
    init_logging(&cfg.log_level, cfg.log_format, cfg.log_file.as_deref())?;
    info!(?cfg, "app config");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cli::run(cli, &cfg, &cwd, &mut out)
}
