// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced client wrapper for consistent observability

use anka_core::{
    ClientError, CloneParams, CreateDiskParams, CreateParams, DescribeResponse, ShowResponse,
    StartParams, StopParams, VmClient,
};
use async_trait::async_trait;
use std::future::Future;
use tracing::{Instrument, Span};

/// Wrapper that adds tracing to any VmClient
#[derive(Clone)]
pub struct TracedClient<C> {
    inner: C,
}

impl<C> TracedClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

/// Run one client call inside `span`, logging duration and outcome
async fn observe<T, F>(span: Span, call: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    async move {
        tracing::info!("starting");

        let start = std::time::Instant::now();
        let result = call.await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::info!(elapsed_ms, "completed"),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "failed"),
        }
        result
    }
    .instrument(span)
    .await
}

// Precondition: every VM-addressed call needs a name
fn require_name(command: &str, vm_name: &str) -> Result<(), ClientError> {
    if vm_name.trim().is_empty() {
        tracing::error!(command, "empty vm name");
        return Err(ClientError::InvalidArgument {
            command: command.to_string(),
            message: "vm name must not be empty".to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl<C: VmClient> VmClient for TracedClient<C> {
    async fn create_disk(&self, params: &CreateDiskParams) -> Result<String, ClientError> {
        let span = tracing::info_span!(
            "anka.create_disk",
            disk_size = %params.disk_size,
            installer_app = %params.installer_app
        );
        if params.installer_app.is_empty() {
            span.in_scope(|| tracing::error!("empty installer path"));
            return Err(ClientError::InvalidArgument {
                command: "create-disk".to_string(),
                message: "installer app must not be empty".to_string(),
            });
        }
        let result = observe(span.clone(), self.inner.create_disk(params)).await;
        if let Ok(image_id) = &result {
            span.in_scope(|| tracing::info!(image_id = %image_id, "disk created"));
        }
        result
    }

    async fn create(&self, params: &CreateParams) -> Result<(), ClientError> {
        require_name("create", &params.name)?;
        let span = tracing::info_span!(
            "anka.create",
            vm_name = %params.name,
            image_id = %params.image_id,
            cpu_count = params.cpu_count,
            ram_size = %params.ram_size
        );
        observe(span, self.inner.create(params)).await
    }

    async fn describe(&self, vm_name: &str) -> Result<DescribeResponse, ClientError> {
        require_name("describe", vm_name)?;
        let span = tracing::info_span!("anka.describe", vm_name);
        let result = observe(span.clone(), self.inner.describe(vm_name)).await;
        if let Ok(describe) = &result {
            span.in_scope(|| {
                tracing::debug!(
                    uuid = %describe.uuid,
                    cores = describe.cpu.cores,
                    threads = describe.cpu.threads,
                    "described"
                )
            });
        }
        result
    }

    async fn show(&self, vm_name: &str) -> Result<ShowResponse, ClientError> {
        require_name("show", vm_name)?;
        let span = tracing::info_span!("anka.show", vm_name);
        let result = observe(span.clone(), self.inner.show(vm_name)).await;
        if let Ok(show) = &result {
            span.in_scope(|| tracing::debug!(status = %show.status, "shown"));
        }
        result
    }

    async fn clone_vm(&self, params: &CloneParams) -> Result<(), ClientError> {
        require_name("clone", &params.vm_name)?;
        let span = tracing::info_span!(
            "anka.clone",
            source_uuid = %params.source_uuid,
            vm_name = %params.vm_name
        );
        observe(span, self.inner.clone_vm(params)).await
    }

    async fn start(&self, params: &StartParams) -> Result<(), ClientError> {
        require_name("start", &params.vm_name)?;
        let span = tracing::info_span!("anka.start", vm_name = %params.vm_name);
        observe(span, self.inner.start(params)).await
    }

    async fn stop(&self, params: &StopParams) -> Result<(), ClientError> {
        require_name("stop", &params.vm_name)?;
        let span = tracing::info_span!(
            "anka.stop",
            vm_name = %params.vm_name,
            force = params.force
        );
        observe(span, self.inner.stop(params)).await
    }

    async fn modify(
        &self,
        vm_name: &str,
        verb: &str,
        category: &str,
        flag: &str,
    ) -> Result<(), ClientError> {
        require_name("modify", vm_name)?;
        let span = tracing::info_span!("anka.modify", vm_name, verb, category, flag);
        observe(span, self.inner.modify(vm_name, verb, category, flag)).await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
