//! Bearing - a project dashboard over a hosted workflow API.
//!
//! This library provides the core functionality for the `bearing` CLI and
//! web dashboard: the HTTP client wrapper, the domain API facade (tasks,
//! risks, reports, assistant chat), page controllers with client-side
//! filtering, and the navigation shell.

pub mod api;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;
pub mod shell;
pub mod views;
#[cfg(feature = "web")]
pub mod web;

pub use client::ApiError;


/// Library-level error type for Bearing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Bearing operations.
pub type Result<T> = std::result::Result<T, Error>;
