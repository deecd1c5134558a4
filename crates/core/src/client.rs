// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client trait over the external `anka` control program

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Requests
// =============================================================================

/// Arguments for building a base disk from an installer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDiskParams {
    pub disk_size: String,
    pub installer_app: String,
}

/// Arguments for instantiating a VM from a disk image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateParams {
    pub image_id: String,
    pub ram_size: String,
    pub cpu_count: u32,
    pub name: String,
}

/// Arguments for cloning an existing VM into a new one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneParams {
    pub source_uuid: String,
    pub vm_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartParams {
    pub vm_name: String,
}

/// Arguments for stopping a VM.
///
/// A forced stop succeeds when the VM is already stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopParams {
    pub vm_name: String,
    pub force: bool,
}

// =============================================================================
// Responses
// =============================================================================

/// CPU topology as reported by `describe`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuInfo {
    pub cores: u32,
    pub threads: u32,
}

impl CpuInfo {
    /// More than one thread per core means hyperthreading is on
    pub fn hyperthreading_enabled(&self) -> bool {
        self.threads > self.cores
    }
}

/// Static VM configuration as reported by `describe`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeResponse {
    pub uuid: String,
    pub name: String,
    pub cpu: CpuInfo,
    pub ram: String,
}

/// Run status of a VM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VmStatus {
    Running,
    Stopped,
    Suspended,
    Failed,
    /// Any status string this client does not model, kept verbatim
    Unknown(String),
}

impl VmStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, VmStatus::Running)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, VmStatus::Stopped)
    }

    pub fn as_str(&self) -> &str {
        match self {
            VmStatus::Running => "running",
            VmStatus::Stopped => "stopped",
            VmStatus::Suspended => "suspended",
            VmStatus::Failed => "failed",
            VmStatus::Unknown(raw) => raw,
        }
    }
}

impl Default for VmStatus {
    fn default() -> Self {
        VmStatus::Unknown(String::new())
    }
}

impl From<String> for VmStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "running" => VmStatus::Running,
            "stopped" => VmStatus::Stopped,
            "suspended" => VmStatus::Suspended,
            "failed" => VmStatus::Failed,
            _ => VmStatus::Unknown(raw),
        }
    }
}

impl From<VmStatus> for String {
    fn from(status: VmStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for VmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current run state as reported by `show`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowResponse {
    pub uuid: String,
    pub name: String,
    pub status: VmStatus,
}

// =============================================================================
// Errors
// =============================================================================

/// Errors from client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("anka {command} failed: {message}")]
    CommandFailed { command: String, message: String },
    #[error("anka {command} returned unreadable output: {message}")]
    InvalidOutput { command: String, message: String },
    #[error("invalid argument for anka {command}: {message}")]
    InvalidArgument { command: String, message: String },
}

impl ClientError {
    /// Diagnostic text from the external tool, if it produced one
    pub fn tool_message(&self) -> Option<&str> {
        match self {
            ClientError::CommandFailed { message, .. } => Some(message),
            _ => None,
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// Typed façade over the `anka` control program.
///
/// Each call spawns exactly one external process and waits for it to
/// exit. Clients never retry.
#[async_trait]
pub trait VmClient: Clone + Send + Sync + 'static {
    /// Build a base disk image from an installer, returning its image ID
    async fn create_disk(&self, params: &CreateDiskParams) -> Result<String, ClientError>;

    /// Instantiate a VM from a disk image
    async fn create(&self, params: &CreateParams) -> Result<(), ClientError>;

    /// Introspect static VM configuration
    async fn describe(&self, vm_name: &str) -> Result<DescribeResponse, ClientError>;

    /// Introspect current run status
    async fn show(&self, vm_name: &str) -> Result<ShowResponse, ClientError>;

    /// Clone an existing VM into a new named VM
    async fn clone_vm(&self, params: &CloneParams) -> Result<(), ClientError>;

    async fn start(&self, params: &StartParams) -> Result<(), ClientError>;

    async fn stop(&self, params: &StopParams) -> Result<(), ClientError>;

    /// Generic settings mutation, e.g. `modify <vm> set cpu --htt`
    async fn modify(
        &self,
        vm_name: &str,
        verb: &str,
        category: &str,
        flag: &str,
    ) -> Result<(), ClientError>;
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
