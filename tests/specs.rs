//! Behavioral specifications for the anka-build CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes. Builds run against a scripted `anka`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/help.rs"]
mod cli_help;

// config/
#[path = "specs/config/validate.rs"]
mod config_validate;

// build/
#[cfg(unix)]
#[path = "specs/build/pipeline.rs"]
mod build_pipeline;
#[cfg(unix)]
#[path = "specs/build/errors.rs"]
mod build_errors;
