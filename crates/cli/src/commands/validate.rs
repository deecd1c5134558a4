// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validate command: check config files without touching any VM

use crate::error::CliError;
use crate::output::{self, OutputFormat};
use anka_core::{Config, ConfigErrors, LoadError};
use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Config files, later files override earlier ones
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Outcome of validating a set of config files
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    fn invalid(errors: &ConfigErrors) -> Self {
        Self {
            valid: false,
            errors: errors.errors.iter().map(ToString::to_string).collect(),
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return write!(f, "Configuration is valid");
        }
        write!(
            f,
            "Configuration validation failed with {} error(s):",
            self.errors.len()
        )?;
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "\n  {}: {}", i + 1, error)?;
        }
        Ok(())
    }
}

pub fn handle(args: ValidateArgs) -> Result<ExitCode> {
    let report = match Config::load(&args.files) {
        Ok(_) => ValidationReport::valid(),
        Err(LoadError::Invalid(errors)) => ValidationReport::invalid(&errors),
        Err(e) => return Err(CliError::config(e).into()),
    };

    output::print(&report, args.format);
    Ok(if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
