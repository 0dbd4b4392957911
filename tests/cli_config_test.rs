//! Integration tests for `bearing config`: file location and precedence.

mod common;

use common::{TestEnv, stdout_json};
use serde_json::Value;

fn setting<'a>(show: &'a Value, key: &str) -> &'a Value {
    show["settings"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["key"] == key)
        .unwrap()
}

#[test]
fn test_config_path_honours_env() {
    let env = TestEnv::new();
    let output = env.bearing().args(["config", "path"]).output().unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["path"], env.config_path().display().to_string());
    assert_eq!(json["exists"], false);
}

#[test]
fn test_config_show_defaults() {
    let env = TestEnv::new();
    let output = env.bearing().args(["config", "show"]).output().unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    let base = setting(&json, "base_url");
    assert_eq!(base["value"], "https://api.dify.ai/v1");
    assert_eq!(base["source"], "default");
    assert_eq!(setting(&json, "api_key")["value"], "(not set)");
    assert_eq!(setting(&json, "fallback")["value"], "mock");
}

#[test]
fn test_config_precedence_cli_over_env_over_file() {
    let env = TestEnv::new();
    env.write_config(
        r#"
base_url = "https://file.example/v1"
timeout_secs = 12
user = "file-user"
fallback = "off"
"#,
    );

    let output = env
        .bearing()
        .env("BEARING_TIMEOUT_SECS", "20")
        .env("BEARING_USER", "env-user")
        .args(["--user", "cli-user", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["config_exists"], true);

    let base = setting(&json, "base_url");
    assert_eq!(base["value"], "https://file.example/v1");
    assert_eq!(base["source"], "file");

    let timeout = setting(&json, "timeout_secs");
    assert_eq!(timeout["value"], "20");
    assert_eq!(timeout["source"], "env:BEARING_TIMEOUT_SECS");

    let user = setting(&json, "user");
    assert_eq!(user["value"], "cli-user");
    assert_eq!(user["source"], "cli");

    assert_eq!(setting(&json, "fallback")["value"], "off");
}

#[test]
fn test_config_show_masks_api_key() {
    let env = TestEnv::new();
    let output = env
        .bearing()
        .env("BEARING_API_KEY", "app-1234567890abcdef")
        .args(["config", "show"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("app-...cdef"));
    assert!(!stdout.contains("1234567890"));
}

#[test]
fn test_malformed_config_file_fails() {
    let env = TestEnv::new();
    env.write_config("base_url = [not toml");
    env.bearing()
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("\"error\""));
}
