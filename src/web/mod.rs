//! Browser dashboard served by `bearing serve`.
//!
//! Pages are rendered on the server inside the navigation shell; forms post
//! back and redirect. JSON endpoints under `/api` expose the facade directly.

pub mod pages;
pub mod render;
pub mod server;
pub mod theme;

pub use server::{AppState, router, start_server};
