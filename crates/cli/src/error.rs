// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Each error says what went wrong, why it might have happened, and how to
//! fix it.

use anka_core::{ClientError, LoadError, StepError};
use anka_engine::BuildError;
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Builders for the failures the commands report.
impl CliError {
    /// Configuration files could not be read, parsed or validated.
    pub fn config(err: LoadError) -> Self {
        match &err {
            LoadError::Read { path, .. } => {
                CliError::new(format!("Cannot read config file {}", path.display()))
                    .with_context(err.to_string())
                    .with_suggestion("Check the path and file permissions")
            }
            LoadError::Parse { path, .. } => {
                CliError::new(format!("Config file {} is not valid TOML", path.display()))
                    .with_context(err.to_string())
                    .with_suggestion(format!(
                        "Check the syntax: anka-build validate {}",
                        path.display()
                    ))
            }
            LoadError::Invalid(errors) => {
                let mut cli = CliError::new("Configuration is invalid");
                for e in &errors.errors {
                    cli = cli.with_context(e.to_string());
                }
                cli.with_suggestion("Fix the settings above and run anka-build validate")
            }
        }
        .with_source(err)
    }

    /// The build pipeline halted.
    pub fn build_failed(err: BuildError, anka_path: &Path) -> Self {
        let cli = CliError::new("Build failed").with_context(err.to_string());

        let cli = match &err {
            BuildError::Step(StepError::Client {
                source: ClientError::Spawn { .. },
                ..
            }) => cli
                .with_context(format!("Could not run {}", anka_path.display()))
                .with_suggestion("Install Anka and make sure `anka` is on PATH")
                .with_suggestion("Point at the binary with --anka-path or ANKA_PATH"),
            BuildError::Step(StepError::Client { .. }) => cli
                .with_suggestion("Check the VM state: anka list")
                .with_suggestion("Re-run with --verbose to see every anka invocation"),
            _ => cli.with_suggestion("Re-run with --verbose for step-by-step logs"),
        };
        cli.with_source(err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
