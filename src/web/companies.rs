//! Company list + create form.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use tracing::warn;

use crate::db::NewCompany;
use crate::state::AppState;

use super::{cell, error_page, escape, flash_html, layout, lock_error, optional, Flash};

#[derive(Debug, Deserialize)]
pub struct CompanyForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    industry: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    website: String,
}

pub async fn page(State(state): State<Arc<AppState>>) -> Html<String> {
    render(&state, None)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CompanyForm>,
) -> Html<String> {
    let name = form.name.trim().to_string();
    if name.is_empty() {
        return render(&state, Some(Flash::error("Name is required.")));
    }

    let flash = {
        let Ok(db) = state.db.lock() else {
            return lock_error("/companies");
        };
        match db.insert_company(&NewCompany {
            name: name.clone(),
            industry: optional(form.industry),
            city: optional(form.city),
            country: optional(form.country),
            website: optional(form.website),
        }) {
            Ok(id) => Flash::success(format!("Company '{name}' created (#{id}).")),
            Err(e) => {
                warn!(company = %name, error = %e, "company insert failed");
                Flash::error(e.to_string())
            }
        }
    };
    render(&state, Some(flash))
}

fn render(state: &AppState, flash: Option<Flash>) -> Html<String> {
    let Ok(db) = state.db.lock() else {
        return lock_error("/companies");
    };
    let companies = match db.list_companies() {
        Ok(companies) => companies,
        Err(e) => return error_page("/companies", &e.to_string()),
    };
    drop(db);

    let mut body = String::new();
    body.push_str("<h2>Companies</h2>\n");
    body.push_str(&flash_html(&flash));

    if companies.is_empty() {
        body.push_str("<p>No companies yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>ID</th><th>Name</th><th>Industry</th><th>City</th>\
             <th>Country</th><th>Website</th><th>Created</th></tr>\n",
        );
        for company in &companies {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                company.id,
                escape(&company.name),
                cell(&company.industry),
                cell(&company.city),
                cell(&company.country),
                cell(&company.website),
                escape(&company.created_at),
            ));
        }
        body.push_str("</table>\n");
    }

    body.push_str(
        "<h3>New company</h3>\n\
         <form class=\"entity\" method=\"post\" action=\"/companies\">\n\
         <label>Name *<input name=\"name\" required></label>\n\
         <label>Industry<input name=\"industry\"></label>\n\
         <label>City<input name=\"city\"></label>\n\
         <label>Country<input name=\"country\" value=\"DE\"></label>\n\
         <label>Website<input name=\"website\" type=\"url\"></label>\n\
         <button type=\"submit\">Create company</button>\n\
         </form>\n",
    );

    layout("/companies", &body)
}
