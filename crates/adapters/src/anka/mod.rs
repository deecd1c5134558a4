// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client backed by the `anka` command-line tool

mod output;

use anka_core::{
    ClientError, CloneParams, CreateDiskParams, CreateParams, DescribeResponse, ShowResponse,
    StartParams, StopParams, VmClient,
};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tokio::process::Command;

/// Default program name, resolved through `PATH`
pub const DEFAULT_PROGRAM: &str = "anka";

/// Runs one `anka --machine-readable` process per operation
#[derive(Debug, Clone)]
pub struct AnkaCli {
    program: PathBuf,
}

impl AnkaCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run `anka --machine-readable <args>` and return the response body
    async fn run(&self, args: &[&str]) -> Result<Value, ClientError> {
        let command = args.first().copied().unwrap_or_default();
        tracing::debug!(program = %self.program.display(), ?args, "invoking anka");

        let output = Command::new(&self.program)
            .arg("--machine-readable")
            .args(args)
            .output()
            .await
            .map_err(|source| ClientError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        output::parse(command, output.status.code(), &output.stdout, &output.stderr)
    }
}

/// Whether a stop failure only says the VM was not running
fn already_stopped(err: &ClientError) -> bool {
    err.tool_message()
        .map(|m| m.to_ascii_lowercase())
        .is_some_and(|m| m.contains("not running") || m.contains("already stopped"))
}

#[async_trait]
impl VmClient for AnkaCli {
    async fn create_disk(&self, params: &CreateDiskParams) -> Result<String, ClientError> {
        let body = self
            .run(&[
                "create-disk",
                "--size",
                &params.disk_size,
                "--app",
                &params.installer_app,
            ])
            .await?;
        output::image_id("create-disk", body)
    }

    async fn create(&self, params: &CreateParams) -> Result<(), ClientError> {
        let cpu_count = params.cpu_count.to_string();
        self.run(&[
            "create",
            "--image-id",
            &params.image_id,
            "--ram-size",
            &params.ram_size,
            "--cpu-count",
            &cpu_count,
            &params.name,
        ])
        .await?;
        Ok(())
    }

    async fn describe(&self, vm_name: &str) -> Result<DescribeResponse, ClientError> {
        let body = self.run(&["describe", vm_name]).await?;
        output::decode("describe", body)
    }

    async fn show(&self, vm_name: &str) -> Result<ShowResponse, ClientError> {
        let body = self.run(&["show", vm_name]).await?;
        output::decode("show", body)
    }

    async fn clone_vm(&self, params: &CloneParams) -> Result<(), ClientError> {
        self.run(&["clone", &params.source_uuid, &params.vm_name]).await?;
        Ok(())
    }

    async fn start(&self, params: &StartParams) -> Result<(), ClientError> {
        self.run(&["start", &params.vm_name]).await?;
        Ok(())
    }

    async fn stop(&self, params: &StopParams) -> Result<(), ClientError> {
        let result = if params.force {
            self.run(&["stop", "--force", &params.vm_name]).await
        } else {
            self.run(&["stop", &params.vm_name]).await
        };

        match result {
            Ok(_) => Ok(()),
            Err(e) if params.force && already_stopped(&e) => {
                tracing::debug!(vm_name = %params.vm_name, "vm already stopped");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn modify(
        &self,
        vm_name: &str,
        verb: &str,
        category: &str,
        flag: &str,
    ) -> Result<(), ClientError> {
        self.run(&["modify", vm_name, verb, category, flag]).await?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
#[path = "anka_tests.rs"]
mod tests;
