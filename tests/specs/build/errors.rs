//! Build failure specs

use crate::prelude::*;

#[test]
fn tool_error_halts_build_with_its_message() {
    let temp = Project::empty();
    let anka = temp.anka_script(BROKEN_ANKA);
    temp.file("build.toml", SOURCE_CONFIG);

    temp.anka_build()
        .args(&["build", "build.toml"])
        .env("ANKA_PATH", &anka)
        .fails()
        .stderr_has("==> anka: error describing source VM: anka describe failed: macos-base: VM not found")
        .stderr_has("error: Build failed");

    assert_eq!(temp.anka_calls(), vec!["describe macos-base"]);
}

#[test]
fn anka_is_found_on_path_by_default() {
    let temp = Project::empty();
    let anka = temp.anka_script(FAKE_ANKA);
    temp.file("build.toml", SOURCE_CONFIG);

    let mut path = std::ffi::OsString::from(anka.parent().unwrap());
    if let Some(inherited) = std::env::var_os("PATH") {
        path.push(":");
        path.push(inherited);
    }

    temp.anka_build()
        .args(&["build", "build.toml"])
        .env("PATH", path)
        .passes();

    assert_eq!(temp.anka_calls()[0], "describe macos-base");
}

#[test]
fn missing_anka_binary_suggests_anka_path() {
    let temp = Project::empty();
    temp.file("build.toml", SOURCE_CONFIG);

    temp.anka_build()
        .args(&["build", "build.toml", "--anka-path", "/nonexistent/anka"])
        .fails()
        .stderr_has("Could not run /nonexistent/anka")
        .stderr_has("--anka-path");
}

#[test]
fn invalid_config_never_invokes_anka() {
    let temp = Project::empty();
    let anka = temp.anka_script(FAKE_ANKA);
    temp.file("build.toml", "enable_htt = true\ndisable_htt = true\n");

    temp.anka_build()
        .args(&["build", "build.toml"])
        .env("ANKA_PATH", &anka)
        .fails()
        .stderr_has("Configuration is invalid")
        .stderr_has("enable_htt and disable_htt cannot both be true");

    assert!(temp.anka_calls().is_empty());
}
