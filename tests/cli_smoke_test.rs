//! Smoke tests for the bearing binary: version, help and argument errors.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_version() {
    TestEnv::new()
        .bearing()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bearing"));
}

#[test]
fn test_help_lists_commands() {
    TestEnv::new()
        .bearing()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("task"))
        .stdout(predicate::str::contains("risk"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("chat"));
}

#[test]
fn test_unknown_fallback_policy_rejected() {
    TestEnv::new()
        .bearing()
        .args(["--fallback", "sometimes", "dashboard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sometimes"));
}

#[test]
fn test_missing_api_key_is_a_config_error() {
    TestEnv::new()
        .bearing()
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("BEARING_API_KEY"));
}

#[test]
fn test_missing_api_key_human() {
    TestEnv::new()
        .bearing()
        .args(["dashboard", "-H"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: "));
}
