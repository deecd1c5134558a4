// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Create (or reuse) a source VM, then clone and boot the working VM

use anka_core::{
    halt, BuildState, CloneParams, CreateDiskParams, CreateParams, NameGen, RandomNameGen,
    StartParams, Step, StepAction, StepError, StopParams, VmClient, BASE_VM_PREFIX,
    WORK_VM_PREFIX,
};
use async_trait::async_trait;

/// Produces the running working VM and publishes its name.
///
/// Without a configured source VM a base VM is first built from the
/// installer. Cleanup force-stops the working VM, which also succeeds
/// when an earlier step already stopped it.
#[derive(Clone, Default)]
pub struct StepCreateVm<G = RandomNameGen> {
    names: G,
}

impl<G: NameGen> StepCreateVm<G> {
    pub fn new(names: G) -> Self {
        Self { names }
    }

    /// Build a base VM from the installer and return its name
    async fn create_base_vm<C: VmClient>(
        &self,
        state: &BuildState<C>,
    ) -> Result<String, StepError> {
        let config = &state.config;

        state.ui.say("Creating a new disk from installer, this will take a while");
        let image_id = state
            .client
            .create_disk(&CreateDiskParams {
                disk_size: config.disk_size.clone(),
                installer_app: config.installer_app.clone(),
            })
            .await
            .map_err(|e| StepError::client("error creating disk", e))?;
        tracing::info!(
            image_id = %image_id,
            installer_app = %config.installer_app,
            "disk created"
        );

        state.ui.say("Creating a new virtual machine");
        let name = self.names.next(BASE_VM_PREFIX);
        state
            .client
            .create(&CreateParams {
                image_id,
                ram_size: config.ram_size.clone(),
                cpu_count: config.cpu_count,
                name: name.clone(),
            })
            .await
            .map_err(|e| StepError::client("error creating VM", e))?;

        state.ui.say(&format!("VM {} was created", name));
        Ok(name)
    }

    /// Clone `source` into the working VM and start it
    async fn clone_and_start<C: VmClient>(
        &self,
        state: &mut BuildState<C>,
        source: &str,
    ) -> Result<(), StepError> {
        let describe = state
            .client
            .describe(source)
            .await
            .map_err(|e| StepError::client("error describing source VM", e))?;
        if describe.uuid.is_empty() {
            return Err(StepError::Halt(format!("source VM {} has no uuid", source)));
        }

        let vm_name = if state.config.vm_name.is_empty() {
            self.names.next(WORK_VM_PREFIX)
        } else {
            state.config.vm_name.clone()
        };

        state.ui.say(&format!(
            "Cloning source VM {} into a new virtual machine {}",
            source, vm_name
        ));
        state
            .client
            .clone_vm(&CloneParams {
                source_uuid: describe.uuid,
                vm_name: vm_name.clone(),
            })
            .await
            .map_err(|e| StepError::client("error cloning source VM", e))?;

        state.ui.say(&format!("Starting up {}", vm_name));
        state
            .client
            .start(&StartParams {
                vm_name: vm_name.clone(),
            })
            .await
            .map_err(|e| StepError::client("error starting VM", e))?;

        tracing::info!(vm_name = %vm_name, source, "working vm running");
        state.vm_name = Some(vm_name);
        Ok(())
    }
}

#[async_trait]
impl<C: VmClient, G: NameGen + 'static> Step<C> for StepCreateVm<G> {
    fn name(&self) -> &str {
        "create_vm"
    }

    async fn run(&self, state: &mut BuildState<C>) -> StepAction {
        let source = if state.config.creates_base_vm() {
            match self.create_base_vm(state).await {
                Ok(name) => name,
                Err(e) => return halt(state, e),
            }
        } else {
            state.config.source_vm_name.clone()
        };
        state.source_vm_name = Some(source.clone());

        match self.clone_and_start(state, &source).await {
            Ok(()) => StepAction::Continue,
            Err(e) => halt(state, e),
        }
    }

    async fn cleanup(&self, state: &mut BuildState<C>) {
        let Some(vm_name) = state.vm_name.clone() else {
            return;
        };

        tracing::info!(vm_name = %vm_name, "stopping working vm");
        let result = state
            .client
            .stop(&StopParams {
                vm_name,
                force: true,
            })
            .await;
        if let Err(e) = result {
            let err = StepError::client("error stopping VM", e);
            tracing::warn!(error = %err, "cleanup failed");
            state.ui.error(&err.to_string());
        }
    }
}

#[cfg(test)]
#[path = "create_vm_tests.rs"]
mod tests;
