//! Smoke tests for the todo-sync binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("todo-sync.toml");
        std::fs::write(&config, "").unwrap();
        Self { dir, config }
    }

    fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("todo-sync").unwrap();
        cmd.arg("--data-dir")
            .arg(self.data_dir())
            .arg("--config")
            .arg(&self.config)
            .env_remove("RUST_LOG");
        cmd
    }

    /// Add a task and return the short id printed by the command.
    fn add(&self, args: &[&str]) -> String {
        let output = self.cmd().arg("add").args(args).output().unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        stdout
            .split_whitespace()
            .nth(1)
            .unwrap()
            .trim_end_matches(':')
            .to_string()
    }
}

#[test]
fn add_then_list_today() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["add", "Buy milk", "--category", "shopping", "--priority", "high"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Added "));

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"))
        .stdout(predicate::str::contains("High"))
        .stdout(predicate::str::contains("Shopping"));

    assert!(ws.data_dir().join("todos.json").exists());
}

#[test]
fn empty_list_says_so() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks."));
}

#[test]
fn toggle_by_prefix_marks_done() {
    let ws = Workspace::new();
    let id = ws.add(&["Stretch"]);

    ws.cmd()
        .args(["toggle", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("done: Stretch"));

    ws.cmd()
        .args(["list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x]"));
}

#[test]
fn delete_removes_task() {
    let ws = Workspace::new();
    let keep = ws.add(&["Keep me"]);
    let gone = ws.add(&["Remove me"]);
    assert_ne!(keep, gone);

    ws.cmd().args(["delete", &gone]).assert().success();

    ws.cmd()
        .args(["list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep me"))
        .stdout(predicate::str::contains("Remove me").not());
}

#[test]
fn unknown_id_fails() {
    let ws = Workspace::new();
    ws.add(&["Only task"]);

    ws.cmd()
        .args(["toggle", "zzzzzzzz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No task matches"));
}

#[test]
fn roles_keep_separate_lists() {
    let ws = Workspace::new();
    ws.add(&["Phone task"]);

    ws.cmd()
        .args(["--role", "companion", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks."));

    assert!(!ws.data_dir().join("watch_todos.json").exists());
}

#[test]
fn stats_counts_completion() {
    let ws = Workspace::new();
    let id = ws.add(&["One"]);
    ws.add(&["Two"]);
    ws.cmd().args(["toggle", &id]).assert().success();

    ws.cmd()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total:     2"))
        .stdout(predicate::str::contains("Progress:  50%"));
}

#[test]
fn invalid_priority_is_rejected() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["add", "x", "--priority", "urgent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown priority"));
}

#[test]
fn past_date_is_rejected() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["add", "Too late", "--date", "2000-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("in the past"));
}

#[test]
fn corrupt_list_file_reads_as_empty() {
    let ws = Workspace::new();
    std::fs::write(ws.data_dir().join("todos.json"), "{ not json").unwrap();

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks."));
}

#[test]
fn bad_config_file_fails() {
    let ws = Workspace::new();
    std::fs::write(&ws.config, "[sync]\ndebounce_ms = \"soon\"\n").unwrap();

    ws.cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
