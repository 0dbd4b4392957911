//! Theme constants for the web dashboard.
//!
//! Colors are Rust constants so page renderers and the stylesheet agree.

use crate::models::{OverallHealth, Priority, Severity, TaskStatus};

/// Background colors
pub mod background {
    /// Page background
    pub const PRIMARY: &str = "#f5f7fa";
    /// Cards and sidebar
    pub const SURFACE: &str = "#ffffff";
    /// Sidebar
    pub const NAV: &str = "#1a2332";
    /// Highlighted nav item
    pub const NAV_ACTIVE: &str = "#2d4059";
}

/// Text colors
pub mod text {
    pub const PRIMARY: &str = "#1f2933";
    pub const SECONDARY: &str = "#616e7c";
    /// Text on the dark sidebar
    pub const INVERTED: &str = "#e8edf3";
}

pub mod accent {
    pub const BLUE: &str = "#4a90e2";
    pub const LIGHT: &str = "#6aa8f0";
}

pub mod border {
    pub const DEFAULT: &str = "#dde3ea";
}

/// Status colors
pub mod status {
    /// Success color (green)
    pub const SUCCESS: &str = "#5cb85c";
    /// Warning color (orange)
    pub const WARNING: &str = "#f0ad4e";
    /// Danger color (red)
    pub const DANGER: &str = "#d9534f";
    /// Info color (light blue)
    pub const INFO: &str = "#5bc0de";
    /// Neutral color (grey)
    pub const NEUTRAL: &str = "#9aa5b1";
}

pub fn task_status_color(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => status::NEUTRAL,
        TaskStatus::InProgress => accent::BLUE,
        TaskStatus::Done => status::SUCCESS,
    }
}

pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => status::INFO,
        Priority::Medium => status::WARNING,
        Priority::High => status::DANGER,
    }
}

pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => status::INFO,
        Severity::Medium => status::WARNING,
        Severity::High => status::DANGER,
    }
}

pub fn health_color(health: OverallHealth) -> &'static str {
    match health {
        OverallHealth::Excellent => status::SUCCESS,
        OverallHealth::Good => accent::BLUE,
        OverallHealth::Fair => status::WARNING,
        OverallHealth::Poor => status::DANGER,
    }
}

/// Stylesheet embedded in every page.
pub fn stylesheet() -> String {
    format!(
        r#"
* {{ box-sizing: border-box; }}
body {{ margin: 0; font-family: system-ui, sans-serif; background: {bg}; color: {text}; }}
.app {{ display: flex; min-height: 100vh; }}
nav {{ width: 220px; background: {nav}; color: {inverted}; padding: 16px 0; }}
nav .brand {{ font-weight: 700; font-size: 18px; padding: 0 20px 16px; }}
nav a {{ display: block; padding: 10px 20px; color: {inverted}; text-decoration: none; }}
nav a.current {{ background: {nav_active}; border-left: 3px solid {blue}; }}
main {{ flex: 1; padding: 24px 32px; }}
header h1 {{ margin: 0; font-size: 24px; }}
header p {{ margin: 4px 0 20px; color: {muted}; }}
.card {{ background: {surface}; border: 1px solid {border}; border-radius: 8px;
         padding: 16px; margin-bottom: 16px; }}
.grid {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 16px; }}
.stat .value {{ font-size: 28px; font-weight: 700; }}
.stat .label {{ color: {muted}; }}
.banner {{ padding: 10px 14px; border-radius: 6px; margin-bottom: 16px; }}
.banner.sample {{ background: #fff8e6; border: 1px solid {warning}; }}
.banner.error {{ background: #fdecea; border: 1px solid {danger}; }}
.badge {{ display: inline-block; padding: 2px 8px; border-radius: 10px; color: #fff;
          font-size: 12px; }}
table {{ width: 100%; border-collapse: collapse; }}
th, td {{ text-align: left; padding: 8px; border-bottom: 1px solid {border}; }}
.bar {{ display: flex; align-items: center; gap: 8px; margin: 4px 0; }}
.bar .label {{ width: 140px; }}
.bar .fill {{ height: 14px; background: {blue}; border-radius: 3px; }}
.msg {{ padding: 10px 12px; border-radius: 8px; margin: 8px 0; white-space: pre-wrap; }}
.msg.user {{ background: {light}; color: #fff; margin-left: 20%; }}
.msg.ai {{ background: {surface}; border: 1px solid {border}; margin-right: 20%; }}
.msg.error {{ border-color: {danger}; }}
form.inline {{ display: inline; }}
input, select, textarea, button {{ font: inherit; padding: 6px 8px; }}
"#,
        bg = background::PRIMARY,
        surface = background::SURFACE,
        nav = background::NAV,
        nav_active = background::NAV_ACTIVE,
        text = text::PRIMARY,
        muted = text::SECONDARY,
        inverted = text::INVERTED,
        blue = accent::BLUE,
        light = accent::LIGHT,
        border = border::DEFAULT,
        warning = status::WARNING,
        danger = status::DANGER,
    )
}
