//! CSV import/export page.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::TABLES;
use crate::state::AppState;
use crate::transfer::{export_csv, import_csv};

use super::{error_page, flash_html, layout, lock_error, Flash};

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    table: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportForm {
    #[serde(default)]
    table: String,
    #[serde(default)]
    data: String,
}

pub async fn page(State(_state): State<Arc<AppState>>) -> Html<String> {
    render(None)
}

/// `GET /transfer/export?table=...` returns the whole table as a CSV download.
pub async fn export(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
) -> Response {
    let Ok(db) = state.db.lock() else {
        return lock_error("/transfer").into_response();
    };
    match export_csv(&db, &params.table) {
        Ok(csv) => {
            // A successful export means the table name is one of the
            // known four, so it is safe in the filename.
            (
                [
                    (
                        header::CONTENT_TYPE,
                        "text/csv; charset=utf-8".to_string(),
                    ),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}.csv\"", params.table),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(e) => {
            warn!(table = %params.table, error = %e, "export failed");
            error_page("/transfer", &e.to_string()).into_response()
        }
    }
}

/// `POST /transfer/import` appends pasted CSV rows to a table.
pub async fn import(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ImportForm>,
) -> Html<String> {
    if form.data.trim().is_empty() {
        return render(Some(Flash::error("Paste CSV data to import.")));
    }

    let flash = {
        let Ok(db) = state.db.lock() else {
            return lock_error("/transfer");
        };
        match import_csv(&db, &form.table, &form.data) {
            Ok(count) => {
                info!(table = %form.table, rows = count, "import finished");
                Flash::success(format!("Imported {count} rows into '{}'.", form.table))
            }
            Err(e) => {
                warn!(table = %form.table, error = %e, "import failed");
                Flash::error(e.to_string())
            }
        }
    };
    render(Some(flash))
}

fn table_options() -> String {
    let mut options = String::new();
    for table in TABLES {
        options.push_str(&format!("<option value=\"{table}\">{table}</option>"));
    }
    options
}

fn render(flash: Option<Flash>) -> Html<String> {
    let options = table_options();

    let mut body = String::new();
    body.push_str("<h2>Import / Export (CSV)</h2>\n");
    body.push_str(&flash_html(&flash));

    body.push_str("<h3>Export</h3>\n");
    body.push_str(&format!(
        "<form method=\"get\" action=\"/transfer/export\">\n\
         <label>Table <select name=\"table\">{options}</select></label>\n\
         <button type=\"submit\">Export CSV</button>\n\
         </form>\n"
    ));

    body.push_str("<h3>Import</h3>\n");
    body.push_str(&format!(
        "<form class=\"entity\" method=\"post\" action=\"/transfer/import\">\n\
         <label>Table <select name=\"table\">{options}</select></label>\n\
         <label>CSV data<textarea name=\"data\" rows=\"10\" cols=\"80\" \
         placeholder=\"header row, then data rows\"></textarea></label>\n\
         <button type=\"submit\">Import CSV</button>\n\
         </form>\n\
         <p>The header row must match the table's column names. An <code>id</code> \
         column is ignored; identities are regenerated. Rows before the first \
         failing row stay imported.</p>\n"
    ));

    layout("/transfer", &body)
}
