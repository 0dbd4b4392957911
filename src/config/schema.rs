//! TOML schema for `config.toml`.
//!
//! This module provides:
//! - Rust structs representing the file schema
//! - Loading from disk (a missing file is an empty config)
//! - Validation functions
//! - The small enums shared with the CLI (fallback policy, chat wire shape,
//!   output format)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the facade does when a remote call fails.
///
/// `Mock` substitutes deterministic sample data and marks the result as
/// fallback data. `Off` hands the failure to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    #[default]
    Mock,
    Off,
}

impl FallbackPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mock" | "on" | "sample" => Some(FallbackPolicy::Mock),
            "off" | "none" | "strict" => Some(FallbackPolicy::Off),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackPolicy::Mock => "mock",
            FallbackPolicy::Off => "off",
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wire shape used for assistant messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatEndpoint {
    /// `POST /workflows/run` with the prompt in `inputs`
    #[default]
    Workflow,
    /// `POST /chat-messages` with a top-level `query` and `conversation_id`
    ChatMessages,
}

impl ChatEndpoint {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "workflow" | "workflows" => Some(ChatEndpoint::Workflow),
            "chat-messages" | "chat" => Some(ChatEndpoint::ChatMessages),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatEndpoint::Workflow => "workflow",
            ChatEndpoint::ChatMessages => "chat-messages",
        }
    }

    /// Path of the endpoint relative to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            ChatEndpoint::Workflow => "/workflows/run",
            ChatEndpoint::ChatMessages => "/chat-messages",
        }
    }
}

impl fmt::Display for ChatEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Contents of `config.toml`. Every key is optional.
///
/// ```toml
/// base_url = "https://api.dify.ai/v1"
/// api_key = "app-..."
/// timeout_secs = 30
/// fallback = "mock"          # or "off"
/// chat_endpoint = "workflow" # or "chat-messages"
/// user = "pm-dashboard"
/// output_format = "human"    # or "json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// API key for the workflow service. Prefer the environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_endpoint: Option<ChatEndpoint>,

    /// End-user identifier sent with every call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
}

impl BearingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: BearingConfig = toml::from_str(text)?;
        config.validate().map_err(Error::Config)?;
        Ok(config)
    }

    /// Load a config file. A missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text).map_err(|e| match e {
                Error::Toml(inner) => {
                    Error::Config(format!("{}: {}", path.display(), inner.message()))
                }
                Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
                other => other,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(ref url) = self.base_url {
            validate_base_url(url)?;
        }
        if let Some(secs) = self.timeout_secs {
            validate_timeout(secs)?;
        }
        if let Some(ref user) = self.user {
            if user.trim().is_empty() {
                return Err("user must not be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Check that a base URL is an absolute http(s) URL.
pub fn validate_base_url(url: &str) -> std::result::Result<(), String> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| format!("base_url must start with http:// or https://, got '{}'", url))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(format!("base_url has no host: '{}'", url));
    }
    Ok(())
}

/// Timeouts outside 1..=600 seconds are rejected.
pub fn validate_timeout(secs: u64) -> std::result::Result<(), String> {
    if !(1..=600).contains(&secs) {
        return Err(format!("timeout_secs must be 1-600, got {}", secs));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = BearingConfig::from_toml(
            r#"
            base_url = "http://localhost:5001/v1"
            api_key = "app-test"
            timeout_secs = 10
            fallback = "off"
            chat_endpoint = "chat-messages"
            user = "ops"
            output_format = "human"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:5001/v1"));
        assert_eq!(config.fallback, Some(FallbackPolicy::Off));
        assert_eq!(config.chat_endpoint, Some(ChatEndpoint::ChatMessages));
        assert_eq!(config.output_format, Some(OutputFormat::Human));
    }

    #[test]
    fn test_empty_config_is_valid() {
        assert_eq!(BearingConfig::from_toml("").unwrap(), BearingConfig::new());
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let err = BearingConfig::from_toml("timeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(BearingConfig::from_toml(r#"base_url = "ftp://x""#).is_err());
        assert!(validate_base_url("https://").is_err());
        assert!(validate_base_url("https://api.example.com/v1").is_ok());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = BearingConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, BearingConfig::new());
    }

    #[test]
    fn test_load_malformed_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        let err = BearingConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_enum_parsers() {
        assert_eq!(FallbackPolicy::parse("OFF"), Some(FallbackPolicy::Off));
        assert_eq!(ChatEndpoint::parse("chat_messages"), Some(ChatEndpoint::ChatMessages));
        assert_eq!(ChatEndpoint::Workflow.path(), "/workflows/run");
        assert_eq!(OutputFormat::parse("Human"), Some(OutputFormat::Human));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }
}
