#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub fn rplan_cmd() -> Command {
    let mut cmd = Command::cargo_bin("rplan").expect("rplan binary");
    cmd.env_remove("RPLAN_DIR");
    cmd.env_remove("RUST_LOG");
    cmd
}

pub struct TestPlanner {
    dir: TempDir,
}

impl TestPlanner {
    /// Empty directory, not yet initialized
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    /// Directory initialized through `rplan init`
    pub fn init() -> Result<Self, Box<dyn std::error::Error>> {
        let planner = Self::empty();
        planner.cmd().arg("init").assert().success();
        Ok(planner)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("rplan.json")
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = rplan_cmd();
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run a command with `--json`, expect success, return the `data` field
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("json envelope");
        assert_eq!(value["status"], "success");
        value["data"].clone()
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_records(&self, records: &Value) -> std::io::Result<()> {
        let body = serde_json::to_string_pretty(records).expect("serialize records");
        fs::write(self.store_path(), body)
    }

    pub fn read_records(&self) -> Result<Value, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.store_path())?;
        Ok(serde_json::from_str(&contents)?)
    }
}
