// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! anka-core: Core library for the Anka image builder
//!
//! This crate provides:
//! - Build configuration with accumulated validation
//! - The `VmClient` trait over the external `anka` control program
//! - The per-build state, the `Step` contract, and the sequential `Runner`
//! - The `Ui` sink and VM name generation

pub mod client;
pub mod config;
pub mod id;
pub mod runner;
pub mod state;
pub mod step;
pub mod ui;

// Re-exports
pub use client::{
    CloneParams, ClientError, CpuInfo, CreateDiskParams, CreateParams, DescribeResponse,
    ShowResponse, StartParams, StopParams, VmClient, VmStatus,
};
pub use config::{Config, ConfigError, ConfigErrors, LoadError, RawConfig};
pub use id::{NameGen, RandomNameGen, BASE_VM_PREFIX, WORK_VM_PREFIX};
pub use runner::Runner;
pub use state::BuildState;
pub use step::{halt, Step, StepAction, StepError};
pub use ui::Ui;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use id::SequentialNameGen;
#[cfg(any(test, feature = "test-support"))]
pub use ui::{RecordingUi, UiMessage};
