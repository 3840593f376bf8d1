//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

pub const HEADER: &str = "name,type,flowrate,pressure,temperature";

/// Builder for equipment CSV text
pub struct CsvBuilder {
    lines: Vec<String>,
}

impl CsvBuilder {
    /// Start with the standard header line
    pub fn new() -> Self {
        Self { lines: vec![HEADER.to_string()] }
    }

    pub fn row(mut self, name: &str, kind: &str, flowrate: f64, pressure: f64, temp: f64) -> Self {
        self.lines.push(format!("{},{},{},{},{}", name, kind, flowrate, pressure, temp));
        self
    }

    /// Append a line verbatim (malformed rows, blank lines)
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// `count` pump rows with increasing flowrate
    pub fn pumps(mut self, count: usize) -> Self {
        for i in 0..count {
            self = self.row(&format!("P-{:03}", i + 1), "Pump", 10.0 + i as f64, 5.0, 80.0);
        }
        self
    }

    pub fn build(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

impl Default for CsvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The three-row plant used across tests: 2 pumps and a valve
pub fn sample_plant() -> CsvBuilder {
    CsvBuilder::new()
        .row("P-101", "Pump", 10.0, 5.0, 80.0)
        .row("P-102", "Pump", 12.5, 6.0, 85.0)
        .row("V-201", "Valve", 5.0, 2.0, 60.0)
}

/// Isolated data, session and report directories for one test
pub struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    /// Includes an empty config file so the user's own config is never read
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("config.toml"), "").expect("Failed to write config");
        Self { temp_dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path().join("data")
    }

    pub fn store_dir(&self) -> PathBuf {
        self.data_dir().join("store")
    }

    pub fn session_dir(&self) -> PathBuf {
        self.path().join("session")
    }

    pub fn report_dir(&self) -> PathBuf {
        self.path().join("reports")
    }

    /// Write a CSV (or any) file into the workspace
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// The binary, pointed at this workspace and isolated from the user's config
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_chemvis"));
        cmd.arg("--data-dir")
            .arg(self.data_dir())
            .arg("--session-dir")
            .arg(self.session_dir())
            .env("CHEMVIS_CONFIG", self.config_path())
            .env("CHEMVIS_REPORT_DIR", self.report_dir())
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
