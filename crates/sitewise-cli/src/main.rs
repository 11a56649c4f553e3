//! SiteWise CLI
//!
//! Construction drawings in, role-scoped findings out.

use anyhow::Result;
use clap::Parser;
use sitewise_core::error::exit_codes;
use sitewise_core::{open_store, Config, LlmGateway, SiteWiseError};
use std::process::ExitCode;
use std::sync::Arc;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so --format json stays machine-readable
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code_for(&e) as u8)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let gateway = Arc::new(LlmGateway::from_config(&config.llm, &config.ocr)?);
    let store = open_store(&config.store)?;

    match cli.command {
        Commands::Ask(args) => commands::ask::run(args, &gateway, cli.format).await,
        Commands::Ocr(args) => commands::ocr::run(args, &gateway, cli.format).await,
        Commands::Search(args) => {
            commands::search::run(args, gateway, &config, store.as_ref(), cli.format).await
        }
        Commands::Analyze(args) => {
            commands::analyze::run(args, gateway, store.as_ref(), cli.format).await
        }
        Commands::Report(args) => commands::report::run(args, store.as_ref(), cli.format),
        Commands::History(args) => commands::history::run(args, store.as_ref(), cli.format),
        Commands::Status => commands::status::run(&config, store.as_ref(), cli.format),
    }
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<SiteWiseError>())
        .map(SiteWiseError::exit_code)
        .unwrap_or(exit_codes::GENERAL_ERROR)
}
