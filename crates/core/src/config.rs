// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build configuration.
//!
//! Raw settings are loaded from one or more TOML files and merged field by
//! field, later sources winning. [`Config::new`] then applies defaults and
//! validates the merged result. Validation never stops at the first
//! problem: every error is collected into [`ConfigErrors`] so the user sees
//! all of them in one pass.

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DISK_SIZE: &str = "25G";
pub const DEFAULT_RAM_SIZE: &str = "2G";
pub const DEFAULT_CPU_COUNT: u32 = 2;
pub const DEFAULT_COMMUNICATOR: &str = "anka";

/// Unvalidated settings as they appear in a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub installer_app: Option<String>,
    pub source_vm_name: Option<String>,
    pub vm_name: Option<String>,
    pub disk_size: Option<String>,
    pub ram_size: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub cpu_count: Option<String>,
    pub enable_htt: Option<bool>,
    pub disable_htt: Option<bool>,
    pub communicator: Option<String>,
}

impl RawConfig {
    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay every field that `other` sets onto `self`
    pub fn merge(&mut self, other: &RawConfig) {
        fn overlay<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if src.is_some() {
                dst.clone_from(src);
            }
        }

        overlay(&mut self.installer_app, &other.installer_app);
        overlay(&mut self.source_vm_name, &other.source_vm_name);
        overlay(&mut self.vm_name, &other.vm_name);
        overlay(&mut self.disk_size, &other.disk_size);
        overlay(&mut self.ram_size, &other.ram_size);
        overlay(&mut self.cpu_count, &other.cpu_count);
        overlay(&mut self.enable_htt, &other.enable_htt);
        overlay(&mut self.disable_htt, &other.disable_htt);
        overlay(&mut self.communicator, &other.communicator);
    }
}

/// Accept `cpu_count = 2` as well as `cpu_count = "2"`
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }),
    )
}

/// Validated build configuration, immutable once constructed.
///
/// Empty strings mean "not supplied". Exactly one of `installer_app` and
/// `source_vm_name` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub installer_app: String,
    pub source_vm_name: String,
    /// Name for the working VM; generated when empty
    pub vm_name: String,
    pub disk_size: String,
    pub ram_size: String,
    pub cpu_count: u32,
    pub enable_htt: bool,
    pub disable_htt: bool,
    pub communicator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            installer_app: String::new(),
            source_vm_name: String::new(),
            vm_name: String::new(),
            disk_size: DEFAULT_DISK_SIZE.to_string(),
            ram_size: DEFAULT_RAM_SIZE.to_string(),
            cpu_count: DEFAULT_CPU_COUNT,
            enable_htt: false,
            disable_htt: false,
            communicator: DEFAULT_COMMUNICATOR.to_string(),
        }
    }
}

impl Config {
    /// Merge raw settings in order, apply defaults, and validate
    pub fn new(raws: &[RawConfig]) -> Result<Self, ConfigErrors> {
        let mut merged = RawConfig::default();
        for raw in raws {
            merged.merge(raw);
        }
        Self::from_raw(merged)
    }

    /// Load and validate a set of config files
    pub fn load(paths: &[PathBuf]) -> Result<Self, LoadError> {
        let raws = paths
            .iter()
            .map(|path| RawConfig::load(path))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(&raws)?)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigErrors> {
        let mut errors = Vec::new();

        let installer_app = supplied(raw.installer_app).unwrap_or_default();
        let source_vm_name = supplied(raw.source_vm_name).unwrap_or_default();
        match (installer_app.is_empty(), source_vm_name.is_empty()) {
            (true, true) => errors.push(ConfigError::MissingSource),
            (false, false) => errors.push(ConfigError::ConflictingSource),
            _ => {}
        }

        let disk_size =
            supplied(raw.disk_size).unwrap_or_else(|| DEFAULT_DISK_SIZE.to_string());
        if !is_valid_size(&disk_size) {
            errors.push(ConfigError::InvalidSize {
                field: "disk_size",
                value: disk_size.clone(),
            });
        }

        let ram_size = supplied(raw.ram_size).unwrap_or_else(|| DEFAULT_RAM_SIZE.to_string());
        if !is_valid_size(&ram_size) {
            errors.push(ConfigError::InvalidSize {
                field: "ram_size",
                value: ram_size.clone(),
            });
        }

        let cpu_count = match supplied(raw.cpu_count) {
            None => DEFAULT_CPU_COUNT,
            Some(value) => match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    errors.push(ConfigError::InvalidCpuCount(value));
                    DEFAULT_CPU_COUNT
                }
            },
        };

        let enable_htt = raw.enable_htt.unwrap_or(false);
        let disable_htt = raw.disable_htt.unwrap_or(false);
        if enable_htt && disable_htt {
            errors.push(ConfigError::ConflictingHtt);
        }

        if !errors.is_empty() {
            return Err(ConfigErrors { errors });
        }

        Ok(Self {
            installer_app,
            source_vm_name,
            vm_name: supplied(raw.vm_name).unwrap_or_default(),
            disk_size,
            ram_size,
            cpu_count,
            enable_htt,
            disable_htt,
            communicator: supplied(raw.communicator)
                .unwrap_or_else(|| DEFAULT_COMMUNICATOR.to_string()),
        })
    }

    /// Whether the build starts from an installer rather than an existing VM
    pub fn creates_base_vm(&self) -> bool {
        self.source_vm_name.is_empty()
    }
}

fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `<digits>` with an optional K, M, G or T unit, e.g. `25G`
fn is_valid_size(value: &str) -> bool {
    let digits =
        value.trim_end_matches(|c: char| matches!(c.to_ascii_uppercase(), 'K' | 'M' | 'G' | 'T'));
    value.len() - digits.len() <= 1
        && !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
}

/// A single configuration problem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("installer_app or source_vm_name must be specified")]
    MissingSource,
    #[error("installer_app and source_vm_name are mutually exclusive")]
    ConflictingSource,
    #[error("enable_htt and disable_htt cannot both be true")]
    ConflictingHtt,
    #[error("cpu_count must be a positive integer, got '{0}'")]
    InvalidCpuCount(String),
    #[error("{field} must be a number with an optional K/M/G/T unit, got '{value}'")]
    InvalidSize { field: &'static str, value: String },
}

/// Every problem found while validating a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErrors {
    pub errors: Vec<ConfigError>,
}

impl std::fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Configuration validation failed with {} error(s):",
            self.errors.len()
        )?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}: {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

/// Errors loading config files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0}")]
    Invalid(#[from] ConfigErrors),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
