// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the build engine

use anka_core::StepError;
use thiserror::Error;

/// Errors that end a build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("build halted: {0}")]
    Step(#[source] StepError),
    #[error("build halted without a recorded error")]
    Halted,
}
