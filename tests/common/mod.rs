//! Shared test utilities and fixtures
//!
//! Runs the built `culprit` binary with an isolated home directory so a
//! developer's own `~/.culprit/config.toml` never leaks into assertions.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Captured result of one `culprit` invocation.
pub struct Run {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Run {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<Output> for Run {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Sandbox for one test: a fake home plus scratch space for files.
pub struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp home"),
        }
    }

    pub fn path(&self) -> &Path {
        self.home.path()
    }

    /// Write `content` to `name` inside the sandbox and return its path as a string.
    pub fn file(&self, name: &str, content: &str) -> String {
        let path = self.home.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write fixture");
        path.to_str().expect("utf-8 temp path").to_string()
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_culprit"));
        command
            .env("HOME", self.home.path())
            .env_remove("RUST_LOG")
            .current_dir(self.home.path());
        command
    }

    pub fn run(&self, args: &[&str]) -> Run {
        self.command()
            .args(args)
            .output()
            .expect("spawn culprit")
            .into()
    }
}
