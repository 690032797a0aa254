//! CLI integration tests for leadboard admin and client commands.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::PathBuf;

use assert_cmd::Command;
use leadboard::store::{SqliteStore, Store};
use predicates::prelude::*;
use tempfile::TempDir;

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn db_path(&self) -> PathBuf {
        self.temp_dir.path().join("data").join("leadboard.db")
    }

    fn database_url(&self) -> String {
        self.db_path().to_string_lossy().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("leadboard").expect("failed to find binary");
        cmd.env("NO_COLOR", "1")
            .env_remove("DATABASE_URL")
            .env_remove("LEADBOARD_URL")
            .env_remove("PORT")
            .env_remove("HOST");
        cmd
    }

    fn init(&self) -> assert_cmd::assert::Assert {
        self.cmd()
            .args(["admin", "init", "--database-url", &self.database_url()])
            .assert()
    }
}

#[test]
fn test_init_creates_database() {
    let ctx = TestContext::new();

    ctx.init()
        .success()
        .stdout(predicate::str::contains("Initialized lead database"));
    assert!(ctx.db_path().exists());

    // Idempotent
    ctx.init().success();
}

#[test]
fn test_init_accepts_sqlite_scheme() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args([
            "admin",
            "init",
            "--database-url",
            &format!("sqlite://{}", ctx.database_url()),
        ])
        .assert()
        .success();
    assert!(ctx.db_path().exists());
}

#[test]
fn test_reset_requires_confirmation() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.cmd()
        .args(["admin", "reset", "--database-url", &ctx.database_url()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_reset_clears_leads() {
    let ctx = TestContext::new();
    ctx.init().success();

    {
        let store = SqliteStore::new(ctx.db_path()).expect("open store");
        let now = leadboard::types::timestamp_now();
        let lead = leadboard::types::validate_new_lead(&leadboard::types::LeadDraft {
            name: Some("Alice".into()),
            email: Some("alice@example.com".into()),
            ..Default::default()
        })
        .expect("valid lead")
        .into_lead(uuid::Uuid::new_v4().to_string(), now);
        store.create_lead(&lead).expect("create lead");
        store.close().expect("close store");
    }

    ctx.cmd()
        .args(["admin", "reset", "--database-url", &ctx.database_url(), "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 lead(s)"));
}

#[test]
fn test_reset_without_database_fails() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["admin", "reset", "--database-url", &ctx.database_url(), "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database not found"));
}

#[test]
fn test_serve_fails_when_store_cannot_open() {
    let ctx = TestContext::new();
    let blocker = ctx.temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").expect("write blocker file");
    let database_url = blocker.join("leadboard.db");

    ctx.cmd()
        .args([
            "serve",
            "--port",
            "0",
            "--database-url",
            &database_url.to_string_lossy(),
        ])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure();
}

#[test]
fn test_leads_command_reports_unreachable_server() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["leads", "stats", "--server", "http://127.0.0.1:1"])
        .timeout(std::time::Duration::from_secs(60))
        .assert()
        .failure();
}

#[test]
fn test_help_lists_commands() {
    let ctx = TestContext::new();

    ctx.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("leads"))
        .stdout(predicate::str::contains("admin"));
}
