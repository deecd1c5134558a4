// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! VM name generation

use rand::Rng;
#[cfg(any(test, feature = "test-support"))]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(any(test, feature = "test-support"))]
use std::sync::Arc;

/// Prefix for a base VM created from an installer
pub const BASE_VM_PREFIX: &str = "anka-disk-base";

/// Prefix for the working VM cloned for a build
pub const WORK_VM_PREFIX: &str = "anka-packer";

/// Length of the random suffix appended to generated names
pub const SUFFIX_LEN: usize = 10;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates VM names of the form `<prefix>-<suffix>`
pub trait NameGen: Clone + Send + Sync {
    fn next(&self, prefix: &str) -> String;
}

/// Random-suffix generator for production use.
///
/// Names are not checked against existing VMs; collisions across
/// 52^10 suffixes are accepted as negligible.
#[derive(Clone, Default)]
pub struct RandomNameGen;

impl NameGen for RandomNameGen {
    fn next(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, random_suffix(SUFFIX_LEN))
    }
}

fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}

/// Sequential generator for testing
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct SequentialNameGen {
    counter: Arc<AtomicU64>,
}

#[cfg(any(test, feature = "test-support"))]
impl SequentialNameGen {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl NameGen for SequentialNameGen {
    fn next(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", prefix, n)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
