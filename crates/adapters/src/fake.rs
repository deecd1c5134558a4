// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use anka_core::{
    ClientError, CloneParams, CpuInfo, CreateDiskParams, CreateParams, DescribeResponse,
    ShowResponse, StartParams, StopParams, VmClient, VmStatus,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded client call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    CreateDisk(CreateDiskParams),
    Create(CreateParams),
    Describe {
        vm_name: String,
    },
    Show {
        vm_name: String,
    },
    Clone(CloneParams),
    Start(StartParams),
    Stop(StopParams),
    Modify {
        vm_name: String,
        verb: String,
        category: String,
        flag: String,
    },
}

impl ClientCall {
    /// The `anka` subcommand this call maps to
    pub fn op(&self) -> &'static str {
        match self {
            ClientCall::CreateDisk(_) => "create-disk",
            ClientCall::Create(_) => "create",
            ClientCall::Describe { .. } => "describe",
            ClientCall::Show { .. } => "show",
            ClientCall::Clone(_) => "clone",
            ClientCall::Start(_) => "start",
            ClientCall::Stop(_) => "stop",
            ClientCall::Modify { .. } => "modify",
        }
    }
}

/// Fake VM state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeVm {
    pub uuid: String,
    pub status: VmStatus,
    pub cpu: CpuInfo,
    pub ram: String,
}

impl FakeVm {
    /// A stopped 2-core VM without hyperthreading
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            status: VmStatus::Stopped,
            cpu: CpuInfo {
                cores: 2,
                threads: 2,
            },
            ram: "2G".to_string(),
        }
    }

    pub fn status(mut self, status: VmStatus) -> Self {
        self.status = status;
        self
    }

    pub fn cpu(mut self, cores: u32, threads: u32) -> Self {
        self.cpu = CpuInfo { cores, threads };
        self
    }
}

/// Fake client that models VMs in memory
#[derive(Clone, Default)]
pub struct FakeClient {
    vms: Arc<Mutex<HashMap<String, FakeVm>>>,
    images: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<ClientCall>>>,
    failures: Arc<Mutex<HashMap<&'static str, String>>>,
    next_id: Arc<Mutex<u64>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FakeClient::add_vm`]
    pub fn with_vm(self, name: &str, vm: FakeVm) -> Self {
        self.add_vm(name, vm);
        self
    }

    pub fn add_vm(&self, name: &str, vm: FakeVm) {
        self.vms
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), vm);
    }

    /// Get a VM by name
    pub fn vm(&self, name: &str) -> Option<FakeVm> {
        self.vms
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Subcommand names of all recorded calls, in order
    pub fn ops(&self) -> Vec<&'static str> {
        self.calls().iter().map(ClientCall::op).collect()
    }

    /// Make every call to `op` fail with `message`
    pub fn fail_on(&self, op: &'static str, message: &str) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(op, message.to_string());
    }

    fn record(&self, call: ClientCall) -> Result<(), ClientError> {
        let op = call.op();
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);

        match self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(op)
        {
            Some(message) => Err(failed(op, message.clone())),
            None => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut next = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
        *next += 1;
        format!("{}-{}", prefix, *next)
    }

    fn with_vm_mut<T>(
        &self,
        op: &'static str,
        name: &str,
        f: impl FnOnce(&mut FakeVm) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let mut vms = self.vms.lock().unwrap_or_else(|e| e.into_inner());
        match vms.get_mut(name) {
            Some(vm) => f(vm),
            None => Err(not_found(op, name)),
        }
    }
}

fn failed(op: &str, message: String) -> ClientError {
    ClientError::CommandFailed {
        command: op.to_string(),
        message,
    }
}

fn not_found(op: &str, name: &str) -> ClientError {
    failed(op, format!("{}: VM not found", name))
}

#[async_trait]
impl VmClient for FakeClient {
    async fn create_disk(&self, params: &CreateDiskParams) -> Result<String, ClientError> {
        self.record(ClientCall::CreateDisk(params.clone()))?;
        let image_id = self.next_id("image");
        self.images
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(image_id.clone());
        Ok(image_id)
    }

    async fn create(&self, params: &CreateParams) -> Result<(), ClientError> {
        self.record(ClientCall::Create(params.clone()))?;

        let known_image = self
            .images
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&params.image_id);
        if !known_image {
            return Err(failed(
                "create",
                format!("{}: image not found", params.image_id),
            ));
        }
        if self.vm(&params.name).is_some() {
            return Err(failed("create", format!("{}: already exists", params.name)));
        }

        let mut vm = FakeVm::new(self.next_id("uuid")).cpu(params.cpu_count, params.cpu_count);
        vm.ram = params.ram_size.clone();
        self.add_vm(&params.name, vm);
        Ok(())
    }

    async fn describe(&self, vm_name: &str) -> Result<DescribeResponse, ClientError> {
        self.record(ClientCall::Describe {
            vm_name: vm_name.to_string(),
        })?;
        let vm = self
            .vm(vm_name)
            .ok_or_else(|| not_found("describe", vm_name))?;
        Ok(DescribeResponse {
            uuid: vm.uuid,
            name: vm_name.to_string(),
            cpu: vm.cpu,
            ram: vm.ram,
        })
    }

    async fn show(&self, vm_name: &str) -> Result<ShowResponse, ClientError> {
        self.record(ClientCall::Show {
            vm_name: vm_name.to_string(),
        })?;
        let vm = self.vm(vm_name).ok_or_else(|| not_found("show", vm_name))?;
        Ok(ShowResponse {
            uuid: vm.uuid,
            name: vm_name.to_string(),
            status: vm.status,
        })
    }

    async fn clone_vm(&self, params: &CloneParams) -> Result<(), ClientError> {
        self.record(ClientCall::Clone(params.clone()))?;

        let source = self
            .vms
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .find(|vm| vm.uuid == params.source_uuid)
            .cloned()
            .ok_or_else(|| not_found("clone", &params.source_uuid))?;
        if self.vm(&params.vm_name).is_some() {
            return Err(failed(
                "clone",
                format!("{}: already exists", params.vm_name),
            ));
        }

        let clone = FakeVm {
            uuid: self.next_id("uuid"),
            status: VmStatus::Stopped,
            ..source
        };
        self.add_vm(&params.vm_name, clone);
        Ok(())
    }

    async fn start(&self, params: &StartParams) -> Result<(), ClientError> {
        self.record(ClientCall::Start(params.clone()))?;
        self.with_vm_mut("start", &params.vm_name, |vm| {
            vm.status = VmStatus::Running;
            Ok(())
        })
    }

    async fn stop(&self, params: &StopParams) -> Result<(), ClientError> {
        self.record(ClientCall::Stop(params.clone()))?;
        let force = params.force;
        self.with_vm_mut("stop", &params.vm_name, |vm| {
            if !vm.status.is_running() && !force {
                return Err(failed(
                    "stop",
                    format!("{} is not running", params.vm_name),
                ));
            }
            vm.status = VmStatus::Stopped;
            Ok(())
        })
    }

    async fn modify(
        &self,
        vm_name: &str,
        verb: &str,
        category: &str,
        flag: &str,
    ) -> Result<(), ClientError> {
        self.record(ClientCall::Modify {
            vm_name: vm_name.to_string(),
            verb: verb.to_string(),
            category: category.to_string(),
            flag: flag.to_string(),
        })?;
        self.with_vm_mut("modify", vm_name, |vm| {
            if !vm.status.is_stopped() {
                return Err(failed(
                    "modify",
                    format!("{} must be stopped to modify", vm_name),
                ));
            }
            match (verb, category, flag) {
                ("set", "cpu", "--htt") => vm.cpu.threads = vm.cpu.cores * 2,
                ("set", "cpu", "--no-htt") => vm.cpu.threads = vm.cpu.cores,
                _ => {}
            }
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
