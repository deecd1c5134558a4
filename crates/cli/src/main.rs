// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! anka-build - build macOS VM images with Anka

mod commands;
mod error;
mod logging;
mod output;
mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{build, validate};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "anka-build",
    version,
    about = "Build macOS VM images with Anka"
)]
struct Cli {
    /// Log every step and anka invocation to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision a VM from config files
    Build(build::BuildArgs),
    /// Check config files and report every problem
    Validate(validate::ValidateArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<error::CliError>() {
                Some(cli_error) => eprint!("{}", cli_error),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    logging::setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Build(args) => build::handle(args).await,
        Commands::Validate(args) => validate::handle(args),
    }
}
