//! Unified precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment variables (`BEARING_*`)
//! 3. Config file (`$BEARING_CONFIG` or `<config dir>/bearing/config.toml`)
//! 4. Built-in defaults
//!
//! The API key has no default: it must come from the environment or the
//! config file.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::schema::{
    BearingConfig, ChatEndpoint, FallbackPolicy, OutputFormat, validate_base_url,
    validate_timeout,
};
use crate::{Error, Result};

pub const CONFIG_PATH_ENV: &str = "BEARING_CONFIG";
pub const BASE_URL_ENV: &str = "BEARING_BASE_URL";
pub const API_KEY_ENV: &str = "BEARING_API_KEY";
pub const TIMEOUT_ENV: &str = "BEARING_TIMEOUT_SECS";
pub const FALLBACK_ENV: &str = "BEARING_FALLBACK";
pub const CHAT_ENDPOINT_ENV: &str = "BEARING_CHAT_ENDPOINT";
pub const USER_ENV: &str = "BEARING_USER";
pub const OUTPUT_FORMAT_ENV: &str = "BEARING_OUTPUT";

pub const DEFAULT_BASE_URL: &str = "https://api.dify.ai/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from the config file
    File,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::File => write!(f, "file"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Values supplied on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    /// Name of an environment variable to read the key from instead of
    /// `BEARING_API_KEY`
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
    pub fallback: Option<FallbackPolicy>,
    pub chat_endpoint: Option<ChatEndpoint>,
    pub user: Option<String>,
    pub output_format: Option<OutputFormat>,
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config_path: PathBuf,
    pub base_url: Resolved<String>,
    pub api_key: Option<Resolved<String>>,
    pub timeout_secs: Resolved<u64>,
    pub fallback: Resolved<FallbackPolicy>,
    pub chat_endpoint: Resolved<ChatEndpoint>,
    pub user: Resolved<String>,
    pub output_format: Resolved<OutputFormat>,
}

impl ResolvedConfig {
    pub fn base_url(&self) -> &str {
        &self.base_url.value
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|r| r.value.as_str())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.value)
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback.value
    }

    pub fn chat_endpoint(&self) -> ChatEndpoint {
        self.chat_endpoint.value
    }

    pub fn user(&self) -> &str {
        &self.user.value
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    /// The API key, or a configuration error naming where to put it.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key().ok_or_else(|| {
            Error::Config(format!(
                "no API key configured: set {} or add api_key to {}",
                API_KEY_ENV,
                self.config_path.display()
            ))
        })
    }

    /// Get the masked API key for display purposes.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key().map(mask_secret)
    }
}

/// Mask a secret, keeping at most four characters at each end.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        let head: String = chars.iter().take(4.min(chars.len())).collect();
        format!("{}...", head)
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

/// Location of the config file: `$BEARING_CONFIG`, else the platform config
/// directory.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bearing")
        .join("config.toml")
}

/// Resolve configuration from the process environment and the config file.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let path = config_path();
    let file = BearingConfig::load(&path)?;
    resolve_config_with(overrides, path, &file, |name| std::env::var(name).ok())
}

/// Resolve configuration from explicit inputs (testable, no process state).
pub fn resolve_config_with<F>(
    overrides: &ConfigOverrides,
    config_path: PathBuf,
    file: &BearingConfig,
    env: F,
) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env_value = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    let base_url = pick(
        overrides.base_url.clone(),
        env_value(BASE_URL_ENV).map(|v| (BASE_URL_ENV, v)),
        file.base_url.clone(),
        DEFAULT_BASE_URL.to_string(),
    );
    validate_base_url(&base_url.value)
        .map_err(|e| Error::Config(format!("{} ({})", e, base_url.source)))?;
    let base_url = Resolved::new(
        base_url.value.trim().trim_end_matches('/').to_string(),
        base_url.source,
    );

    let key_env = overrides
        .api_key_env
        .clone()
        .unwrap_or_else(|| API_KEY_ENV.to_string());
    let api_key = match env_value(key_env.as_str()) {
        Some(key) => Some(Resolved::new(
            key.trim().to_string(),
            ValueSource::EnvVar(key_env),
        )),
        None => file
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .map(|k| Resolved::new(k, ValueSource::File)),
    };

    let timeout_env = match env_value(TIMEOUT_ENV) {
        Some(raw) => Some((
            TIMEOUT_ENV,
            raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("{} must be a number, got '{}'", TIMEOUT_ENV, raw))
            })?,
        )),
        None => None,
    };
    let timeout_secs = pick(
        overrides.timeout_secs,
        timeout_env,
        file.timeout_secs,
        DEFAULT_TIMEOUT_SECS,
    );
    validate_timeout(timeout_secs.value)
        .map_err(|e| Error::Config(format!("{} ({})", e, timeout_secs.source)))?;

    let fallback = pick(
        overrides.fallback,
        parse_env(&env_value, FALLBACK_ENV, FallbackPolicy::parse)?,
        file.fallback,
        FallbackPolicy::default(),
    );

    let chat_endpoint = pick(
        overrides.chat_endpoint,
        parse_env(&env_value, CHAT_ENDPOINT_ENV, ChatEndpoint::parse)?,
        file.chat_endpoint,
        ChatEndpoint::default(),
    );

    let user = pick(
        overrides.user.clone(),
        env_value(USER_ENV).map(|v| (USER_ENV, v)),
        file.user.clone(),
        generated_user_id(),
    );

    let output_format = pick(
        overrides.output_format,
        parse_env(&env_value, OUTPUT_FORMAT_ENV, OutputFormat::parse)?,
        file.output_format,
        OutputFormat::default(),
    );

    Ok(ResolvedConfig {
        config_path,
        base_url,
        api_key,
        timeout_secs,
        fallback,
        chat_endpoint,
        user,
        output_format,
    })
}

/// Per-process end-user id, e.g. `bearing-1a2b3c4d`.
pub fn generated_user_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("bearing-{}", &id[..8])
}

fn pick<T>(
    cli: Option<T>,
    env: Option<(&str, T)>,
    file: Option<T>,
    default: T,
) -> Resolved<T> {
    if let Some(v) = cli {
        return Resolved::new(v, ValueSource::CliFlag);
    }
    if let Some((name, v)) = env {
        return Resolved::new(v, ValueSource::EnvVar(name.to_string()));
    }
    if let Some(v) = file {
        return Resolved::new(v, ValueSource::File);
    }
    Resolved::new(default, ValueSource::Default)
}

fn parse_env<'a, T, G>(
    env_value: &G,
    name: &'a str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<(&'a str, T)>>
where
    G: Fn(&str) -> Option<String>,
{
    match env_value(name) {
        Some(raw) => parse(&raw)
            .map(|v| Some((name, v)))
            .ok_or_else(|| Error::Config(format!("invalid value for {}: '{}'", name, raw))),
        None => Ok(None),
    }
}
