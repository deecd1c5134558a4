// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step contract for the provisioning pipeline

use crate::client::{ClientError, VmClient};
use crate::state::BuildState;
use async_trait::async_trait;
use thiserror::Error;

/// What the runner does after a step's run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Continue,
    Halt,
}

/// Errors that stop the pipeline
#[derive(Debug, Error)]
pub enum StepError {
    #[error("{action}: {source}")]
    Client {
        action: &'static str,
        #[source]
        source: ClientError,
    },
    #[error("{0}")]
    Halt(String),
    #[error("{0} was not set by an earlier step")]
    MissingState(&'static str),
}

impl StepError {
    pub fn client(action: &'static str, source: ClientError) -> Self {
        StepError::Client { action, source }
    }
}

/// A unit of provisioning work.
///
/// `run` fails fast: any error is reported and the step returns
/// [`StepAction::Halt`]. `cleanup` is best-effort: errors are reported
/// through the UI and never change the build outcome.
#[async_trait]
pub trait Step<C: VmClient>: Send + Sync {
    /// Step name for logging
    fn name(&self) -> &str;

    async fn run(&self, state: &mut BuildState<C>) -> StepAction;

    async fn cleanup(&self, _state: &mut BuildState<C>) {}
}

/// Record `err` as the reason the build stopped, report it, and halt
pub fn halt<C>(state: &mut BuildState<C>, err: StepError) -> StepAction {
    tracing::error!(error = %err, "step halted");
    state.ui.error(&err.to_string());
    state.error = Some(err);
    StepAction::Halt
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
