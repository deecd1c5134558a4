// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-build state shared by the steps of one pipeline run

use crate::config::Config;
use crate::step::StepError;
use crate::ui::Ui;
use std::sync::Arc;

/// State for a single build.
///
/// Created once per build and dropped when the build ends. Only the step
/// currently running touches it. Step outputs start as `None` and are
/// written by the step that produces them; a later step that needs one
/// reads it through an accessor that fails if it was never written.
pub struct BuildState<C> {
    pub config: Config,
    pub client: C,
    pub ui: Arc<dyn Ui>,
    /// VM the working VM was cloned from
    pub source_vm_name: Option<String>,
    /// Working VM, published once it is cloned and running
    pub vm_name: Option<String>,
    /// Error that halted the pipeline
    pub error: Option<StepError>,
}

impl<C> BuildState<C> {
    pub fn new(config: Config, client: C, ui: Arc<dyn Ui>) -> Self {
        Self {
            config,
            client,
            ui,
            source_vm_name: None,
            vm_name: None,
            error: None,
        }
    }

    /// Working VM name, or an error if no step has published it yet
    pub fn vm_name(&self) -> Result<&str, StepError> {
        self.vm_name
            .as_deref()
            .ok_or(StepError::MissingState("vm_name"))
    }

    pub fn halted(&self) -> bool {
        self.error.is_some()
    }
}
