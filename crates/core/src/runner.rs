// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential step runner

use crate::client::VmClient;
use crate::state::BuildState;
use crate::step::{Step, StepAction};
use tracing::Instrument;

/// Runs an ordered list of steps against one build's state.
///
/// Steps run one at a time in declared order. The first step to halt stops
/// forward progress. Afterwards every step whose `run` was invoked, the
/// halting one included, gets its `cleanup` in reverse order. Cleanup runs
/// after successful builds too.
pub struct Runner<C: VmClient> {
    steps: Vec<Box<dyn Step<C>>>,
}

impl<C: VmClient> Runner<C> {
    pub fn new(steps: Vec<Box<dyn Step<C>>>) -> Self {
        Self { steps }
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run all steps, returning `Halt` if any step halted
    pub async fn run(&self, state: &mut BuildState<C>) -> StepAction {
        let mut started = 0;
        let mut outcome = StepAction::Continue;

        for step in &self.steps {
            started += 1;

            let span = tracing::info_span!("step", step = step.name());
            let start = std::time::Instant::now();
            let action = step.run(state).instrument(span.clone()).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            if action == StepAction::Halt {
                span.in_scope(|| tracing::warn!(elapsed_ms, "halted"));
                outcome = StepAction::Halt;
                break;
            }
            span.in_scope(|| tracing::info!(elapsed_ms, "completed"));
        }

        for step in self.steps[..started].iter().rev() {
            let span = tracing::info_span!("cleanup", step = step.name());
            step.cleanup(state).instrument(span).await;
        }

        outcome
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
