//! Config validation specs
//!
//! Verify that every configuration problem is reported in one pass.

use crate::prelude::*;

#[test]
fn source_vm_config_is_valid() {
    let temp = Project::empty();
    temp.file("build.toml", SOURCE_CONFIG);

    temp.anka_build()
        .args(&["validate", "build.toml"])
        .passes()
        .stdout_eq("Configuration is valid\n");
}

#[test]
fn installer_config_is_valid() {
    let temp = Project::empty();
    temp.file(
        "build.toml",
        "installer_app = \"/Applications/Install macOS.app\"\ncpu_count = 4\nram_size = \"8G\"\n",
    );

    temp.anka_build()
        .args(&["validate", "build.toml"])
        .passes()
        .stdout_eq("Configuration is valid\n");
}

#[test]
fn missing_source_names_both_fields() {
    let temp = Project::empty();
    temp.file("build.toml", "disk_size = \"40G\"\n");

    temp.anka_build()
        .args(&["validate", "build.toml"])
        .fails()
        .stdout_has("installer_app or source_vm_name must be specified");
}

#[test]
fn all_problems_are_reported_together() {
    let temp = Project::empty();
    temp.file(
        "build.toml",
        "enable_htt = true\ndisable_htt = true\ndisk_size = \"lots\"\n",
    );

    temp.anka_build()
        .args(&["validate", "build.toml"])
        .fails()
        .stdout_has("failed with 3 error(s)")
        .stdout_has("installer_app or source_vm_name must be specified")
        .stdout_has("disk_size")
        .stdout_has("enable_htt and disable_htt cannot both be true");
}

#[test]
fn later_files_override_earlier_ones() {
    let temp = Project::empty();
    temp.file("base.toml", "enable_htt = true\n");
    temp.file("override.toml", "enable_htt = false\ndisable_htt = true\n");
    temp.file("source.toml", SOURCE_CONFIG);

    temp.anka_build()
        .args(&["validate", "base.toml", "override.toml", "source.toml"])
        .passes()
        .stdout_eq("Configuration is valid\n");
}

#[test]
fn json_report_lists_errors() {
    let temp = Project::empty();
    temp.file(
        "build.toml",
        "installer_app = \"/Install.app\"\nsource_vm_name = \"base\"\n",
    );

    temp.anka_build()
        .args(&["validate", "build.toml", "--format", "json"])
        .fails()
        .stdout_has("\"valid\": false")
        .stdout_has("installer_app and source_vm_name are mutually exclusive");
}

#[test]
fn unreadable_file_is_reported_with_path() {
    let temp = Project::empty();

    temp.anka_build()
        .args(&["validate", "missing.toml"])
        .fails()
        .stderr_has("Cannot read config file missing.toml");
}

#[test]
fn malformed_toml_is_reported() {
    let temp = Project::empty();
    temp.file("build.toml", "source_vm_name = \n");

    temp.anka_build()
        .args(&["validate", "build.toml"])
        .fails()
        .stderr_has("is not valid TOML");
}
