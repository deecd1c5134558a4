// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconcile the working VM's hyperthreading setting with the config

use anka_core::{
    halt, BuildState, StartParams, Step, StepAction, StepError, StopParams, VmClient,
};
use async_trait::async_trait;

/// Turns hyperthreading on or off when `enable_htt` or `disable_htt` asks
/// for it.
///
/// Does nothing when the VM already matches. The VM must be stopped for the
/// change; a VM found running is restarted afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepSetHyperthreading;

impl StepSetHyperthreading {
    async fn reconcile<C: VmClient>(&self, state: &BuildState<C>) -> Result<(), StepError> {
        let config = &state.config;
        if config.enable_htt && config.disable_htt {
            return Err(StepError::Halt(
                "Conflicting setting enable_htt and disable_htt both true".to_string(),
            ));
        }
        if !config.enable_htt && !config.disable_htt {
            return Ok(());
        }

        let enable = config.enable_htt;
        let vm_name = state.vm_name()?;
        let client = &state.client;

        let describe = client
            .describe(vm_name)
            .await
            .map_err(|e| StepError::client("error describing VM", e))?;
        if describe.cpu.hyperthreading_enabled() == enable {
            tracing::debug!(
                vm_name,
                enable,
                threads = describe.cpu.threads,
                cores = describe.cpu.cores,
                "hyperthreading already matches"
            );
            return Ok(());
        }

        let show = client
            .show(vm_name)
            .await
            .map_err(|e| StepError::client("error checking VM status", e))?;
        // Only a running VM is brought back; suspended or failed ones stay stopped
        let restart = show.status.is_running();

        if !show.status.is_stopped() {
            state
                .ui
                .say(&format!("Stopping VM {} to change hyperthreading", vm_name));
            client
                .stop(&StopParams {
                    vm_name: vm_name.to_string(),
                    force: true,
                })
                .await
                .map_err(|e| StepError::client("error stopping VM", e))?;
        }

        let (verb, flag) = if enable {
            ("Enabling", "--htt")
        } else {
            ("Disabling", "--no-htt")
        };
        state
            .ui
            .say(&format!("{} hyperthreading on {}", verb, vm_name));
        client
            .modify(vm_name, "set", "cpu", flag)
            .await
            .map_err(|e| StepError::client("error changing hyperthreading", e))?;

        if restart {
            state.ui.say(&format!("Starting up {}", vm_name));
            client
                .start(&StartParams {
                    vm_name: vm_name.to_string(),
                })
                .await
                .map_err(|e| StepError::client("error starting VM", e))?;
        }

        tracing::info!(vm_name, enable, restarted = restart, "hyperthreading changed");
        Ok(())
    }
}

#[async_trait]
impl<C: VmClient> Step<C> for StepSetHyperthreading {
    fn name(&self) -> &str {
        "set_hyperthreading"
    }

    async fn run(&self, state: &mut BuildState<C>) -> StepAction {
        match self.reconcile(state).await {
            Ok(()) => StepAction::Continue,
            Err(e) => halt(state, e),
        }
    }
}

#[cfg(test)]
#[path = "hyperthreading_tests.rs"]
mod tests;
