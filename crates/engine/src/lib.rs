// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Anka image build engine: provisioning steps and the builder that runs them

mod builder;
mod error;
pub mod steps;

pub use builder::{Artifact, Builder, BUILDER_ID};
pub use error::BuildError;
pub use steps::{StepCreateVm, StepSetHyperthreading};
