use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod fetch;
mod normalize;
mod report;
mod run;
mod titles;

use cli::RootArgs;
use fetch::{WikipediaClient, USER_AGENT};
use normalize::{Converter, AVATAR_SIZE};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    let converter = Converter::from_env(AVATAR_SIZE)?;
    match &converter {
        Some(converter) => {
            tracing::debug!(program = converter.program(), "image converter selected");
        }
        None => tracing::debug!("no image converter on PATH"),
    }
    let source = WikipediaClient::new(args.api_base, USER_AGENT);

    // Per-author failures are part of the report, not the exit status.
    run::run_fetch(&args.root, &source, converter.as_ref())?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
