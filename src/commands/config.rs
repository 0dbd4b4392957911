//! Configuration commands.

use serde::Serialize;
use std::path::PathBuf;

use super::{Output, to_json};
use crate::config::{ResolvedConfig, ValueSource};

/// One resolved setting and where it came from.
#[derive(Serialize)]
pub struct Setting {
    pub key: &'static str,
    pub value: String,
    pub source: String,
}

impl Setting {
    fn new(key: &'static str, value: impl ToString, source: &ValueSource) -> Self {
        Self {
            key,
            value: value.to_string(),
            source: source.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ConfigShow {
    pub config_path: PathBuf,
    pub config_exists: bool,
    pub settings: Vec<Setting>,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let exists = if self.config_exists { "" } else { " (not found)" };
        let mut lines = vec![format!("Config file: {}{}", self.config_path.display(), exists)];
        for s in &self.settings {
            lines.push(format!("  {:<14} {:<40} [{}]", s.key, s.value, s.source));
        }
        lines.join("\n")
    }
}

/// Resolved settings; the API key is masked.
pub fn config_show(config: &ResolvedConfig) -> ConfigShow {
    let api_key = match (&config.api_key, config.masked_api_key()) {
        (Some(resolved), Some(masked)) => Setting::new("api_key", masked, &resolved.source),
        _ => Setting {
            key: "api_key",
            value: "(not set)".to_string(),
            source: "none".to_string(),
        },
    };
    ConfigShow {
        config_path: config.config_path.clone(),
        config_exists: config.config_path.is_file(),
        settings: vec![
            Setting::new("base_url", config.base_url(), &config.base_url.source),
            api_key,
            Setting::new(
                "timeout_secs",
                config.timeout_secs.value,
                &config.timeout_secs.source,
            ),
            Setting::new("fallback", config.fallback(), &config.fallback.source),
            Setting::new(
                "chat_endpoint",
                config.chat_endpoint(),
                &config.chat_endpoint.source,
            ),
            Setting::new("user", config.user(), &config.user.source),
            Setting::new(
                "output_format",
                config.output_format(),
                &config.output_format.source,
            ),
        ],
    }
}

#[derive(Serialize)]
pub struct ConfigPath {
    pub path: PathBuf,
    pub exists: bool,
}

impl Output for ConfigPath {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        self.path.display().to_string()
    }
}

pub fn config_path(config: &ResolvedConfig) -> ConfigPath {
    ConfigPath {
        path: config.config_path.clone(),
        exists: config.config_path.is_file(),
    }
}
