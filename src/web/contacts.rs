//! Contact list + create form.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use tracing::warn;

use crate::db::NewContact;
use crate::state::AppState;

use super::{
    cell, error_page, escape, flash_html, layout, lock_error, optional, parse_id, select_html,
    Flash,
};

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    company_id: String,
}

pub async fn page(State(state): State<Arc<AppState>>) -> Html<String> {
    render(&state, None)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ContactForm>,
) -> Html<String> {
    let flash = {
        let Ok(db) = state.db.lock() else {
            return lock_error("/contacts");
        };
        match db.insert_contact(&NewContact {
            first_name: optional(form.first_name),
            last_name: optional(form.last_name),
            email: optional(form.email),
            phone: optional(form.phone),
            role: optional(form.role),
            company_id: parse_id(&form.company_id),
        }) {
            Ok(id) => Flash::success(format!("Contact created (#{id}).")),
            Err(e) => {
                warn!(error = %e, "contact insert failed");
                Flash::error(e.to_string())
            }
        }
    };
    render(&state, Some(flash))
}

fn render(state: &AppState, flash: Option<Flash>) -> Html<String> {
    let Ok(db) = state.db.lock() else {
        return lock_error("/contacts");
    };
    let contacts = match db.list_contacts() {
        Ok(contacts) => contacts,
        Err(e) => return error_page("/contacts", &e.to_string()),
    };
    let companies = match db.company_options() {
        Ok(companies) => companies,
        Err(e) => return error_page("/contacts", &e.to_string()),
    };
    drop(db);

    let mut body = String::new();
    body.push_str("<h2>Contacts</h2>\n");
    body.push_str(&flash_html(&flash));

    if contacts.is_empty() {
        body.push_str("<p>No contacts yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>ID</th><th>First name</th><th>Last name</th><th>Email</th>\
             <th>Phone</th><th>Role</th><th>Company</th><th>Created</th></tr>\n",
        );
        for contact in &contacts {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                contact.id,
                cell(&contact.first_name),
                cell(&contact.last_name),
                cell(&contact.email),
                cell(&contact.phone),
                cell(&contact.role),
                cell(&contact.company),
                escape(&contact.created_at),
            ));
        }
        body.push_str("</table>\n");
    }

    body.push_str("<h3>New contact</h3>\n");
    body.push_str("<form class=\"entity\" method=\"post\" action=\"/contacts\">\n");
    body.push_str("<label>First name<input name=\"first_name\"></label>\n");
    body.push_str("<label>Last name<input name=\"last_name\"></label>\n");
    body.push_str("<label>Email<input name=\"email\" type=\"email\"></label>\n");
    body.push_str("<label>Phone<input name=\"phone\"></label>\n");
    body.push_str("<label>Role<input name=\"role\"></label>\n");
    body.push_str(&format!(
        "<label>Company{}</label>\n",
        select_html("company_id", &companies)
    ));
    body.push_str("<button type=\"submit\">Create contact</button>\n</form>\n");

    layout("/contacts", &body)
}
