//! Build pipeline specs
//!
//! Drive full builds against a scripted `anka` and check the exact
//! sequence of invocations.

use crate::prelude::*;

#[test]
fn build_from_source_clones_starts_and_stops() {
    let temp = Project::empty();
    let anka = temp.anka_script(FAKE_ANKA);
    temp.file(
        "build.toml",
        "source_vm_name = \"macos-base\"\nvm_name = \"ci-image\"\n",
    );

    temp.anka_build()
        .args(&["build", "build.toml"])
        .env("ANKA_PATH", &anka)
        .passes()
        .stdout_has("==> anka: Cloning source VM macos-base into a new virtual machine ci-image")
        .stdout_has("==> anka: Starting up ci-image")
        .stdout_has("Anka VM ci-image");

    similar_asserts::assert_eq!(
        temp.anka_calls(),
        vec![
            "describe macos-base",
            "clone u-base ci-image",
            "start ci-image",
            "stop --force ci-image",
        ]
    );
}

#[test]
fn build_from_installer_creates_base_vm_first() {
    let temp = Project::empty();
    let anka = temp.anka_script(
        &FAKE_ANKA.replace(
            "  *)\n",
            "  create-disk)\n    echo '{\"status\": \"OK\", \"body\": {\"image_id\": \"img-1\"}}'\n    ;;\n  *)\n",
        ),
    );
    temp.file(
        "build.toml",
        "installer_app = \"/Install.app\"\nvm_name = \"ci-image\"\n",
    );

    temp.anka_build()
        .args(&["build", "build.toml", "--anka-path"])
        .args(&[anka.to_str().unwrap()])
        .passes()
        .stdout_has("==> anka: Creating a new disk from installer, this will take a while");

    let calls = temp.anka_calls();
    assert_eq!(calls[0], "create-disk --size 25G --app /Install.app");
    assert!(
        calls[1].starts_with("create --image-id img-1 --ram-size 2G --cpu-count 2 anka-disk-base-"),
        "{:?}",
        calls
    );
    assert!(calls[2].starts_with("describe anka-disk-base-"), "{:?}", calls);
    assert_eq!(calls[3], "clone u-base ci-image");
}

#[test]
fn build_with_hyperthreading_restarts_running_vm() {
    let temp = Project::empty();
    let anka = temp.anka_script(FAKE_ANKA);
    temp.file(
        "build.toml",
        "source_vm_name = \"macos-base\"\nvm_name = \"ci-image\"\nenable_htt = true\n",
    );

    temp.anka_build()
        .args(&["build", "build.toml"])
        .env("ANKA_PATH", &anka)
        .passes()
        .stdout_has("==> anka: Enabling hyperthreading on ci-image");

    similar_asserts::assert_eq!(
        temp.anka_calls(),
        vec![
            "describe macos-base",
            "clone u-base ci-image",
            "start ci-image",
            "describe ci-image",
            "show ci-image",
            "stop --force ci-image",
            "modify ci-image set cpu --htt",
            "start ci-image",
            "stop --force ci-image",
        ]
    );
}

#[test]
fn generated_vm_name_has_packer_prefix() {
    let temp = Project::empty();
    let anka = temp.anka_script(FAKE_ANKA);
    temp.file("build.toml", SOURCE_CONFIG);

    temp.anka_build()
        .args(&["build", "build.toml"])
        .env("ANKA_PATH", &anka)
        .passes()
        .stdout_has("Anka VM anka-packer-");
}

#[test]
fn json_artifact_keeps_progress_off_stdout() {
    let temp = Project::empty();
    let anka = temp.anka_script(FAKE_ANKA);
    temp.file(
        "build.toml",
        "source_vm_name = \"macos-base\"\nvm_name = \"ci-image\"\n",
    );

    temp.anka_build()
        .args(&["build", "build.toml", "--format", "json"])
        .env("ANKA_PATH", &anka)
        .passes()
        .stdout_has("\"builder_id\": \"veertu.anka\"")
        .stdout_has("\"vm_name\": \"ci-image\"")
        .stdout_has("\"source_vm_name\": \"macos-base\"")
        .stdout_lacks("==> anka:")
        .stderr_has("==> anka: Starting up ci-image");
}
