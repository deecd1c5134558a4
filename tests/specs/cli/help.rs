//! Help and usage specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();

    temp.anka_build()
        .args(&["--help"])
        .passes()
        .stdout_has("build")
        .stdout_has("validate");
}

#[test]
fn build_help_shows_default_anka_path() {
    let temp = Project::empty();

    temp.anka_build()
        .args(&["build", "--help"])
        .passes()
        .stdout_has("--anka-path <ANKA_PATH>")
        .stdout_has("[default: anka]");
}

#[test]
fn no_command_is_a_usage_error() {
    let temp = Project::empty();

    temp.anka_build().args(&[]).fails().stderr_has("Usage");
}

#[test]
fn build_requires_config_file() {
    let temp = Project::empty();

    temp.anka_build()
        .args(&["build"])
        .fails()
        .stderr_has("<FILES>");
}
