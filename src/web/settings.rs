//! Settings: database location + initialize/seed action.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use tracing::warn;

use crate::seed::ensure_sample_data;
use crate::state::AppState;

use super::{escape, flash_html, layout, lock_error, Flash};

pub async fn page(State(state): State<Arc<AppState>>) -> Html<String> {
    render(&state, None)
}

/// `POST /settings/init`: idempotent schema creation plus seeding of
/// any still-empty tables.
pub async fn init(State(state): State<Arc<AppState>>) -> Html<String> {
    let flash = {
        let Ok(db) = state.db.lock() else {
            return lock_error("/settings");
        };
        let result = db.ensure_schema().and_then(|()| ensure_sample_data(&db));
        match result {
            Ok(()) => Flash::success("Database initialized; sample data loaded where empty."),
            Err(e) => {
                warn!(error = %e, "initialize/seed failed");
                Flash::error(e.to_string())
            }
        }
    };
    render(&state, Some(flash))
}

fn render(state: &AppState, flash: Option<Flash>) -> Html<String> {
    let mut body = String::new();
    body.push_str("<h2>Settings</h2>\n");
    body.push_str(&flash_html(&flash));

    body.push_str(&format!(
        "<p>Data lives in a single SQLite file: <code>{}</code></p>\n",
        escape(&state.db_path.display().to_string())
    ));

    body.push_str(
        "<form method=\"post\" action=\"/settings/init\">\n\
         <button type=\"submit\">Initialize database / load sample data</button>\n\
         </form>\n\
         <p>Schema creation is idempotent; sample rows are inserted only into \
         empty tables.</p>\n",
    );

    layout("/settings", &body)
}
