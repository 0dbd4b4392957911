//! HTML building blocks: escaping, the shell frame, banners and charts.

use std::fmt::Write;

use super::theme;
use crate::shell::{Route, nav_items};
use crate::views::{BarPoint, PageStatus};

/// Escape text for HTML element content and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Percent-encode an id for use as one URL path segment.
pub fn path_segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Wrap page content in the persistent sidebar and header.
pub fn frame(route: Route, body: &str) -> String {
    let mut nav = String::new();
    for item in nav_items(route) {
        let class = if item.current { " class=\"current\"" } else { "" };
        let _ = write!(
            nav,
            "<a href=\"{}\"{} data-icon=\"{}\">{}</a>",
            item.href,
            class,
            item.icon,
            escape(item.label)
        );
    }
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title} - Bearing</title><style>{css}</style></head>\
         <body><div class=\"app\"><nav><div class=\"brand\">Bearing</div>{nav}</nav>\
         <main><header><h1>{title}</h1><p>{subtitle}</p></header>{body}</main></div>\
         </body></html>",
        title = escape(route.label()),
        subtitle = escape(route.subtitle()),
        css = theme::stylesheet(),
        nav = nav,
        body = body,
    )
}

/// Sample-data or failure notice, with a link that forces a reload.
pub fn status_banner(status: &PageStatus, retry_href: &str) -> String {
    let Some(text) = status.banner() else {
        return String::new();
    };
    let class = match status {
        PageStatus::Sample { .. } => "sample",
        _ => "error",
    };
    format!(
        "<div class=\"banner {}\">{} <a href=\"{}?refresh=1\">Retry</a></div>",
        class,
        escape(&text),
        retry_href
    )
}

/// Error notice for a rejected action.
pub fn error_banner(message: &str) -> String {
    format!("<div class=\"banner error\">{}</div>", escape(message))
}

/// Colored pill.
pub fn badge(label: &str, color: &str) -> String {
    format!(
        "<span class=\"badge\" style=\"background:{}\">{}</span>",
        color,
        escape(label)
    )
}

/// Headline number card.
pub fn stat_card(label: &str, value: impl std::fmt::Display) -> String {
    format!(
        "<div class=\"card stat\"><div class=\"value\">{}</div><div class=\"label\">{}</div></div>",
        escape(&value.to_string()),
        escape(label)
    )
}

/// Horizontal bar chart scaled to the largest value (or `max` when given).
pub fn bar_chart(title: &str, points: &[BarPoint], max: Option<f64>) -> String {
    let max = max.unwrap_or_else(|| points.iter().map(|p| p.value).fold(0.0, f64::max));
    let mut rows = String::new();
    for point in points {
        let width = if max > 0.0 {
            (point.value / max * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let _ = write!(
            rows,
            "<div class=\"bar\"><span class=\"label\">{}</span>\
             <span class=\"fill\" style=\"width:{:.1}%\"></span><span>{}</span></div>",
            escape(&point.label),
            width,
            format_number(point.value)
        );
    }
    format!(
        "<div class=\"card\"><h3>{}</h3>{}</div>",
        escape(title),
        rows
    )
}

/// Drop a trailing `.0` from whole numbers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// `<option>` list with one entry selected.
pub fn options<'a>(choices: impl IntoIterator<Item = (&'a str, &'a str)>, selected: &str) -> String {
    let mut out = String::new();
    for (value, label) in choices {
        let sel = if value == selected { " selected" } else { "" };
        let _ = write!(
            out,
            "<option value=\"{}\"{}>{}</option>",
            escape(value),
            sel,
            escape(label)
        );
    }
    out
}
