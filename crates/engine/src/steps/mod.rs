// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provisioning steps

mod create_vm;
mod hyperthreading;

pub use create_vm::StepCreateVm;
pub use hyperthreading::StepSetHyperthreading;
