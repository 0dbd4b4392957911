//! Common test utilities for bearing integration tests.
//!
//! Provides `TestEnv` for isolated runs that never read the user's config
//! file, and `StubService`, a stand-in for the workflow service.

#![allow(dead_code)]

use assert_cmd::Command;
use axum::{Json, Router, body::Bytes, extract::State, http::StatusCode, http::Uri};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
pub use tempfile::TempDir;

/// Environment variables that would leak the developer's setup into tests.
const BEARING_VARS: [&str; 10] = [
    "BEARING_BASE_URL",
    "BEARING_API_KEY",
    "BEARING_TIMEOUT_SECS",
    "BEARING_FALLBACK",
    "BEARING_CHAT_ENDPOINT",
    "BEARING_USER",
    "BEARING_OUTPUT",
    "BEARING_LOG",
    "BEARING_LOG_FORMAT",
    "BEARING_CONFIG",
];

/// A test environment with an isolated config file location.
///
/// The `bearing()` method returns a `Command` that points `BEARING_CONFIG`
/// into a temp directory, making tests parallel-safe.
pub struct TestEnv {
    pub config_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
        }
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.config_dir.path().join("config.toml")
    }

    /// Write the config file.
    pub fn write_config(&self, toml: &str) {
        std::fs::write(self.config_path(), toml).unwrap();
    }

    /// Command for the bearing binary with no inherited bearing settings.
    pub fn bearing(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_bearing"));
        for var in BEARING_VARS {
            cmd.env_remove(var);
        }
        cmd.env("BEARING_CONFIG", self.config_path());
        cmd
    }

    /// Command wired to a service at `base_url` with a test key.
    pub fn bearing_at(&self, base_url: &str) -> Command {
        let mut cmd = self.bearing();
        cmd.env("BEARING_BASE_URL", base_url);
        cmd.env("BEARING_API_KEY", "app-integration-key");
        cmd.env("BEARING_TIMEOUT_SECS", "5");
        cmd
    }
}

type Handler = dyn Fn(&str, &Value) -> (u16, Value) + Send + Sync;

#[derive(Clone)]
struct StubState {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// Workflow service stub on its own thread and runtime, so plain `#[test]`
/// functions can drive the binary against it.
pub struct StubService {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl StubService {
    /// `handler(path, body)` returns the status and JSON body to send.
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> (u16, Value) + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            handler: Arc::new(handler),
            requests: requests.clone(),
        };
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                let app = Router::new().fallback(answer).with_state(state);
                let _ = axum::serve(listener, app).await;
            });
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            requests,
        }
    }

    /// Stub answering every workflow run with the given outputs.
    pub fn outputs(outputs: Value) -> Self {
        Self::start(move |_, _| (200, workflow_body(outputs.clone())))
    }

    /// Stub answering every call with the same status and body.
    pub fn status(code: u16, body: Value) -> Self {
        Self::start(move |_, _| (code, body.clone()))
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

async fn answer(State(state): State<StubState>, uri: Uri, body: Bytes) -> (StatusCode, Json<Value>) {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(body.clone());
    let path = uri.path().trim_start_matches("/v1").to_string();
    let (code, reply) = (state.handler)(&path, &body);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(reply),
    )
}

/// Wrap outputs the way a blocking workflow run returns them.
pub fn workflow_body(outputs: Value) -> Value {
    json!({
        "workflow_run_id": "run-1",
        "task_id": "task-1",
        "data": {
            "id": "run-1",
            "status": "succeeded",
            "outputs": outputs,
            "created_at": 1705486200
        }
    })
}

/// A base URL where nothing is listening.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1", addr)
}

/// Parse a command's stdout as JSON.
pub fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
