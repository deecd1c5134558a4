// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builder: validated config in, working VM out

use crate::error::BuildError;
use crate::steps::{StepCreateVm, StepSetHyperthreading};
use anka_core::{
    BuildState, Config, ConfigErrors, NameGen, RandomNameGen, RawConfig, Runner, Step,
    StepAction, StepError, Ui, VmClient,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;

/// Identifies artifacts produced by this builder
pub const BUILDER_ID: &str = "veertu.anka";

/// Result of a successful build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub builder_id: String,
    /// Working VM left behind by the build
    pub vm_name: String,
    /// VM the working VM was cloned from
    pub source_vm_name: String,
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Anka VM {}", self.vm_name)
    }
}

pub struct Builder<G = RandomNameGen> {
    config: Config,
    names: G,
}

impl Builder<RandomNameGen> {
    /// Merge and validate raw settings
    pub fn prepare(raws: &[RawConfig]) -> Result<Self, ConfigErrors> {
        Ok(Self::new(Config::new(raws)?))
    }

    pub fn new(config: Config) -> Self {
        Self::with_names(config, RandomNameGen)
    }
}

impl<G: NameGen + 'static> Builder<G> {
    pub fn with_names(config: Config, names: G) -> Self {
        Self { config, names }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn steps<C: VmClient>(&self) -> Vec<Box<dyn Step<C>>> {
        vec![
            Box::new(StepCreateVm::new(self.names.clone())),
            Box::new(StepSetHyperthreading),
        ]
    }

    /// Run the provisioning pipeline with `client`, reporting through `ui`
    pub async fn run<C: VmClient>(
        &self,
        client: C,
        ui: Arc<dyn Ui>,
    ) -> Result<Artifact, BuildError> {
        let runner = Runner::new(self.steps::<C>());
        let mut state = BuildState::new(self.config.clone(), client, ui);

        let span = tracing::info_span!("build", steps = ?runner.step_names());
        let action = runner.run(&mut state).instrument(span).await;

        if action == StepAction::Halt {
            return Err(state.error.take().map_or(BuildError::Halted, BuildError::Step));
        }

        let vm_name = state
            .vm_name
            .take()
            .ok_or(BuildError::Step(StepError::MissingState("vm_name")))?;
        let source_vm_name = state
            .source_vm_name
            .take()
            .ok_or(BuildError::Step(StepError::MissingState("source_vm_name")))?;
        tracing::info!(vm_name = %vm_name, source_vm_name = %source_vm_name, "build complete");
        Ok(Artifact {
            builder_id: BUILDER_ID.to_string(),
            vm_name,
            source_vm_name,
        })
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
