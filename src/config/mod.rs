//! Configuration for Bearing.
//!
//! Settings live in one TOML file, `config.toml`, located at:
//! - `$BEARING_CONFIG` when set
//! - otherwise `~/.config/bearing/config.toml` (platform config directory)
//!
//! Contains:
//! - `base_url` - Workflow service base URL
//! - `api_key` - Workflow service API key (the env var is preferred)
//! - `timeout_secs` - Uniform request timeout
//! - `fallback` - "mock" (sample data on failure, flagged) or "off"
//! - `chat_endpoint` - "workflow" or "chat-messages"
//! - `user` - End-user identifier sent with every call
//! - `output_format` - "json" or "human"
//!
//! ## Precedence
//!
//! CLI flag > environment variable > config file > defaults
//!
//! Use the [`resolver`] module for unified precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    API_KEY_ENV, BASE_URL_ENV, CHAT_ENDPOINT_ENV, CONFIG_PATH_ENV, ConfigOverrides,
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, FALLBACK_ENV, Resolved, ResolvedConfig, TIMEOUT_ENV,
    USER_ENV, ValueSource, config_path, resolve_config, resolve_config_with,
};
pub use schema::{BearingConfig, ChatEndpoint, FallbackPolicy, OutputFormat};
