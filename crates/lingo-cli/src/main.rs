//! `lingo` - main entry point

use anyhow::{Context, Result};
use clap::Parser;
use lingo_cli::{run, Args};
use lingo_common::init_logging;
use lingo_config::ConfigLoader;
use tracing::debug;

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigLoader::load()?,
    };
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }

    init_logging(config.logging.to_logging_config()).context("initializing logging")?;
    debug!(?args, "starting lingo");

    let output = run(&args.command, &config)?;
    print!("{}", output.stdout);

    if !output.success {
        std::process::exit(1);
    }
    Ok(())
}
