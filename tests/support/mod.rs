#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;
use tm::model::{Task, Workspace};
use tm::registry::WorkspaceStore;
use tm::tasks::TaskStore;

/// An isolated tm home plus a root for workspace directories
pub struct TestEnv {
    home: TempDir,
    root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("failed to create home tempdir"),
            root: tempfile::tempdir().expect("failed to create root tempdir"),
        }
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// Create (if needed) and return a workspace directory under the root
    pub fn dir(&self, name: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::create_dir_all(&path).expect("failed to create workspace dir");
        path
    }

    /// `tm` running in `cwd` against this env's home
    pub fn tm(&self, cwd: &Path) -> Command {
        let mut cmd = Command::cargo_bin("tm").expect("binary");
        cmd.current_dir(cwd)
            .env("TM_HOME", self.home())
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run `tm init` in a new directory and return its path
    pub fn init_workspace(&self, name: &str) -> PathBuf {
        let path = self.dir(name);
        self.tm(&path).arg("init").assert().success();
        path
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.home().join("config.toml");
        fs::write(&path, contents).expect("failed to write config");
        path
    }

    pub fn registry(&self) -> Vec<Workspace> {
        WorkspaceStore::new(self.home()).load().expect("registry")
    }

    pub fn tasks(&self, workspace: &Path) -> Vec<Task> {
        TaskStore::for_workspace(workspace).load().expect("tasks")
    }

    /// Run a command with `--json` and parse its stdout
    pub fn json(&self, cwd: &Path, args: &[&str]) -> Value {
        let output = self
            .tm(cwd)
            .args(args)
            .arg("--json")
            .output()
            .expect("run tm");
        serde_json::from_slice(&output.stdout).expect("json output")
    }
}
