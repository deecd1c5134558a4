//! Shared helpers for behavioral specs

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

static ANKA_BUILD_BIN: OnceLock<PathBuf> = OnceLock::new();

/// Path to the `anka-build` binary, built once per test run.
///
/// The binary lives in another workspace package, so cargo does not build
/// it for these specs on its own.
pub fn anka_build_bin() -> &'static Path {
    ANKA_BUILD_BIN.get_or_init(|| {
        // target/<profile>/deps/specs-<hash>
        let exe = std::env::current_exe().unwrap();
        let profile_dir = exe.parent().and_then(Path::parent).unwrap().to_path_buf();

        let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
        let mut build = std::process::Command::new(cargo);
        build
            .args(["build", "--quiet", "-p", "anka-build"])
            .current_dir(env!("CARGO_MANIFEST_DIR"));
        if profile_dir.file_name().is_some_and(|name| name == "release") {
            build.arg("--release");
        }
        let status = build.status().unwrap();
        assert!(status.success(), "cargo build -p anka-build failed: {status}");

        profile_dir.join(format!("anka-build{}", std::env::consts::EXE_SUFFIX))
    })
}

/// Minimal config that clones an existing VM
pub const SOURCE_CONFIG: &str = r#"source_vm_name = "macos-base"
"#;

/// Stand-in for `anka` that logs every invocation and answers like a
/// machine with one running 2-core VM.
pub const FAKE_ANKA: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/calls.log"
case "$2" in
  describe)
    echo '{"status": "OK", "body": {"uuid": "u-base", "name": "'"$3"'", "cpu": {"cores": 2, "threads": 2}}}'
    ;;
  show)
    echo '{"status": "OK", "body": {"uuid": "u-base", "name": "'"$3"'", "status": "running"}}'
    ;;
  *)
    echo '{"status": "OK", "body": {}}'
    ;;
esac
"#;

/// Stand-in for `anka` whose every command fails
pub const BROKEN_ANKA: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/calls.log"
echo '{"status": "ERROR", "code": 2, "message": "'"$3"': VM not found"}'
exit 1
"#;

/// Temporary working directory for one spec
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Write `content` to `rel`, creating parent directories
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Install an executable script as `bin/anka`
    #[cfg(unix)]
    pub fn anka_script(&self, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.file("bin/anka", script);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Invocations recorded by a scripted `anka`, without the leading
    /// `--machine-readable`
    pub fn anka_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("bin/calls.log"))
            .unwrap_or_default()
            .lines()
            .map(|line| {
                line.strip_prefix("--machine-readable ")
                    .unwrap_or(line)
                    .to_string()
            })
            .collect()
    }

    /// Command for the `anka-build` binary, run inside the project
    pub fn anka_build(&self) -> CliBuilder {
        let mut cmd = Command::new(anka_build_bin());
        cmd.current_dir(self.dir.path()).env_remove("ANKA_PATH").env_remove("RUST_LOG");
        CliBuilder { cmd }
    }
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and require exit status 0
    pub fn passes(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert { output };
        assert!(
            run.output.status.success(),
            "expected success, got {:?}\nstdout:\n{}\nstderr:\n{}",
            run.output.status,
            run.stdout(),
            run.stderr()
        );
        run
    }

    /// Run and require a non-zero exit status
    pub fn fails(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert { output };
        assert!(
            !run.output.status.success(),
            "expected failure\nstdout:\n{}\nstderr:\n{}",
            run.stdout(),
            run.stderr()
        );
        run
    }
}

pub struct RunAssert {
    output: std::process::Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).to_string()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).to_string()
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(needle),
            "stdout missing {:?}:\n{}",
            needle,
            stdout
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(needle),
            "stdout unexpectedly has {:?}:\n{}",
            needle,
            stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(needle),
            "stderr missing {:?}:\n{}",
            needle,
            stderr
        );
        self
    }
}
