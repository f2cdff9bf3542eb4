//! # ChatMind CLI Serve Integration Tests
//!
//! File: cli/tests/serve.rs
//!
//! ## Overview
//!
//! `chatmind serve` runs until it is signalled, so these tests only cover the
//! paths that end on their own: startup failures. The endpoints themselves are
//! tested in-process in `server_logic.rs`.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_serve_missing_corpus_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["serve", "--port", "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read corpus"));
}

#[test]
fn test_serve_rejects_bad_host() {
    let ws = Workspace::with_scenario_corpus();
    ws.cmd()
        .args(["serve", "--host", "not-an-ip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
