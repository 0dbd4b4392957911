//! Diagnostic logging to stderr.
//!
//! The filter comes from `BEARING_LOG` (standard `EnvFilter` directives),
//! defaulting to `warn`, or `debug` with `--verbose`. Setting
//! `BEARING_LOG_FORMAT=json` switches to one JSON object per line.

use std::env;
use std::io;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "BEARING_LOG";
pub const LOG_FORMAT_ENV: &str = "BEARING_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match env::var(LOG_FORMAT_ENV).ok().as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Filter directives: `BEARING_LOG` wins, then `--verbose`, then `warn`.
fn filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "bearing=debug,info" } else { "warn" };
    match env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => {
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(fallback))
        }
        _ => EnvFilter::new(fallback),
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let filter = filter(verbose);
    let result = match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_format_from_env() {
        unsafe { env::set_var(LOG_FORMAT_ENV, "JSON") };
        assert_eq!(LogFormat::from_env(), LogFormat::Json);
        unsafe { env::set_var(LOG_FORMAT_ENV, "pretty") };
        assert_eq!(LogFormat::from_env(), LogFormat::Text);
        unsafe { env::remove_var(LOG_FORMAT_ENV) };
        assert_eq!(LogFormat::from_env(), LogFormat::Text);
    }

    #[test]
    #[serial]
    fn test_filter_prefers_env_directives() {
        unsafe { env::set_var(LOG_ENV, "bearing=trace") };
        assert_eq!(filter(false).to_string(), "bearing=trace");
        unsafe { env::remove_var(LOG_ENV) };
        assert_eq!(filter(false).to_string(), "warn");
        assert!(filter(true).to_string().contains("bearing=debug"));
    }

    #[test]
    #[serial]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
