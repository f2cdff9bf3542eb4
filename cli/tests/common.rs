//! # ChatMind CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Every test runs
//! the real `chatmind` binary inside its own temporary workspace, so no user
//! or project configuration on the host machine can leak into the results.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SCENARIO_CSV: &str = "Question,Answer\nhi,hello!\nbye,goodbye!\n";

/// Command for the compiled `chatmind` binary, with no environment influence.
pub fn chatmind_cmd() -> Command {
    let mut cmd = Command::cargo_bin("chatmind").expect("Failed to find chatmind binary for testing");
    cmd.env_remove("OPENWEATHER_API_KEY").env_remove("RUST_LOG");
    cmd
}

/// A temporary directory that acts as both the working directory and `$HOME`.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    /// Creates the workspace. A `.git` directory stops the project config search here.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::create_dir(dir.path().join(".git")).expect("Failed to create .git marker");
        Self { dir }
    }

    /// Creates the workspace with `chat_data.csv` holding the two-row scenario corpus.
    pub fn with_scenario_corpus() -> Self {
        let ws = Self::new();
        ws.write("chat_data.csv", SCENARIO_CSV);
        ws
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }

    /// `chatmind_cmd()` running inside this workspace.
    pub fn cmd(&self) -> Command {
        let mut cmd = chatmind_cmd();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"));
        cmd
    }
}
