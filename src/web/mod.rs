//! Server-rendered HTML surface.
//!
//! One module per view, each owning its route handlers and page
//! rendering. Pages are assembled as strings into a shared layout; all
//! dynamic text goes through [`escape`]. Required-field checks live
//! here, at the boundary; storage only sees well-formed inserts.

use std::sync::Arc;

use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;

use crate::db::EntityOption;
use crate::state::AppState;

pub mod activities;
pub mod companies;
pub mod contacts;
pub mod dashboard;
pub mod deals;
pub mod settings;
pub mod transfer;

const NAV: [(&str, &str); 7] = [
    ("/", "Dashboard"),
    ("/companies", "Companies"),
    ("/contacts", "Contacts"),
    ("/deals", "Deals"),
    ("/activities", "Activities"),
    ("/transfer", "Import/Export"),
    ("/settings", "Settings"),
];

const STYLE: &str = "
body { font-family: system-ui, sans-serif; margin: 0; color: #222; }
header { padding: 0.8rem 1.2rem; border-bottom: 1px solid #ddd; display: flex; align-items: baseline; gap: 1.5rem; }
header h1 { font-size: 1.1rem; margin: 0; }
nav a { margin-right: 0.9rem; text-decoration: none; color: #2a5db0; }
nav a.active { font-weight: 600; color: #222; }
main { padding: 1.2rem; max-width: 72rem; }
table { border-collapse: collapse; margin: 0.8rem 0; }
th, td { border: 1px solid #ddd; padding: 0.3rem 0.6rem; text-align: left; }
th { background: #f5f5f5; }
form.entity label { display: block; margin: 0.4rem 0; }
form.entity input, form.entity select, form.entity textarea { margin-left: 0.4rem; }
.flash.ok { background: #e6f4e6; border: 1px solid #9c9; padding: 0.5rem 0.8rem; }
.flash.err { background: #fbeaea; border: 1px solid #d99; padding: 0.5rem 0.8rem; }
.tiles { display: flex; gap: 1rem; margin-bottom: 1rem; }
.tile { border: 1px solid #ddd; padding: 0.6rem 1rem; min-width: 10rem; }
.tile strong { display: block; font-size: 1.4rem; }
.bar-row { display: flex; align-items: center; gap: 0.6rem; margin: 0.25rem 0; }
.bar-label { width: 6.5rem; }
.bar { background: #2a5db0; height: 1rem; }
";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard::page))
        .route("/companies", get(companies::page).post(companies::create))
        .route("/contacts", get(contacts::page).post(contacts::create))
        .route("/deals", get(deals::page).post(deals::create))
        .route("/activities", get(activities::page).post(activities::create))
        .route("/transfer", get(transfer::page))
        .route("/transfer/export", get(transfer::export))
        .route("/transfer/import", post(transfer::import))
        .route("/settings", get(settings::page))
        .route("/settings/init", post(settings::init))
        .with_state(state)
}

/// A one-shot inline banner rendered above the page body.
pub(crate) enum Flash {
    Success(String),
    Error(String),
}

impl Flash {
    pub(crate) fn success(msg: impl Into<String>) -> Self {
        Self::Success(msg.into())
    }

    pub(crate) fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    fn to_html(&self) -> String {
        match self {
            Self::Success(msg) => format!("<p class=\"flash ok\">{}</p>", escape(msg)),
            Self::Error(msg) => format!("<p class=\"flash err\">{}</p>", escape(msg)),
        }
    }
}

/// Wrap a page body in the shared chrome. `active` is the nav path of
/// the current view.
pub(crate) fn layout(active: &str, body: &str) -> Html<String> {
    let title = NAV
        .iter()
        .find(|(path, _)| *path == active)
        .map(|(_, label)| *label)
        .unwrap_or("minicrm");

    let mut nav = String::new();
    for (path, label) in NAV {
        if path == active {
            nav.push_str(&format!("<a class=\"active\" href=\"{path}\">{label}</a>"));
        } else {
            nav.push_str(&format!("<a href=\"{path}\">{label}</a>"));
        }
    }

    let mut page = String::with_capacity(body.len() + STYLE.len() + 512);
    page.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{title} \u{b7} minicrm</title>\n"));
    page.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));
    page.push_str(&format!(
        "<header><h1>minicrm</h1><nav>{nav}</nav></header>\n<main>\n"
    ));
    page.push_str(body);
    page.push_str("\n</main>\n</body>\n</html>\n");
    Html(page)
}

/// Body shown when the storage lock cannot be taken.
pub(crate) fn lock_error(active: &str) -> Html<String> {
    error_page(active, "Storage is unavailable: lock poisoned.")
}

/// A bare page carrying only an error banner. Used when even the list
/// query fails and there is nothing else to show.
pub(crate) fn error_page(active: &str, msg: &str) -> Html<String> {
    layout(active, &Flash::error(msg).to_html())
}

pub(crate) fn flash_html(flash: &Option<Flash>) -> String {
    flash.as_ref().map(Flash::to_html).unwrap_or_default()
}

/// Minimal HTML escaping for text nodes and attribute values.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escaped table cell for an optional column.
pub(crate) fn cell(value: &Option<String>) -> String {
    escape(value.as_deref().unwrap_or(""))
}

/// Trim a form field; empty becomes None.
pub(crate) fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an association picker value. Empty selections ("" or "-")
/// mean no association.
pub(crate) fn parse_id(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    trimmed.parse().ok()
}

/// Amount with thousands separators, no decimals.
pub(crate) fn format_amount(value: f64) -> String {
    let whole = value.round() as i64;
    let raw = whole.abs().to_string();
    let mut out = String::new();
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if whole < 0 {
        out.insert(0, '-');
    }
    out
}

/// An association dropdown with a leading "none" entry.
pub(crate) fn select_html(name: &str, options: &[EntityOption]) -> String {
    let mut html = format!("<select name=\"{name}\"><option value=\"\">-</option>");
    for option in options {
        html.push_str(&format!(
            "<option value=\"{}\">{}</option>",
            option.id,
            escape(&option.label)
        ));
    }
    html.push_str("</select>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_covers_markup_characters() {
        assert_eq!(
            escape("<b>\"Fischer & Söhne\"</b>"),
            "&lt;b&gt;&quot;Fischer &amp; Söhne&quot;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_optional_trims_and_drops_empty() {
        assert_eq!(optional("  ".to_string()), None);
        assert_eq!(optional(String::new()), None);
        assert_eq!(optional(" Freiburg ".to_string()), Some("Freiburg".to_string()));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("-"), None);
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("nope"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(950.0), "950");
        assert_eq!(format_amount(180_000.0), "180,000");
        assert_eq!(format_amount(1_234_567.4), "1,234,567");
        assert_eq!(format_amount(-4200.0), "-4,200");
    }

    #[test]
    fn test_select_html_escapes_labels() {
        let options = vec![EntityOption {
            id: 7,
            label: "A & B".to_string(),
        }];
        let html = select_html("company_id", &options);
        assert!(html.contains("<option value=\"7\">A &amp; B</option>"));
        assert!(html.starts_with("<select name=\"company_id\">"));
    }
}
