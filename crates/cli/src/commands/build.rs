// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build command: provision a VM with the `anka` tool

use crate::error::CliError;
use crate::output::{self, OutputFormat};
use crate::ui::ConsoleUi;
use anka_adapters::anka::DEFAULT_PROGRAM;
use anka_adapters::{AnkaCli, TracedClient};
use anka_core::Config;
use anka_engine::Builder;
use anyhow::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(clap::Args)]
pub struct BuildArgs {
    /// Config files, later files override earlier ones
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Path to the anka binary
    #[arg(long, env = "ANKA_PATH", default_value = DEFAULT_PROGRAM)]
    anka_path: PathBuf,

    /// Output format for the resulting artifact
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn handle(args: BuildArgs) -> Result<ExitCode> {
    let config = Config::load(&args.files).map_err(CliError::config)?;
    tracing::info!(
        source_vm_name = %config.source_vm_name,
        installer_app = %config.installer_app,
        "starting build"
    );

    let builder = Builder::new(config);
    let client = TracedClient::new(AnkaCli::new(&args.anka_path));
    let ui = Arc::new(ConsoleUi::new(args.format.progress_on_stdout()));

    let artifact = builder
        .run(client, ui)
        .await
        .map_err(|e| CliError::build_failed(e, &args.anka_path))?;

    output::print(&artifact, args.format);
    Ok(ExitCode::SUCCESS)
}
