//! Activity list + create form.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use tracing::warn;

use crate::db::{ActivityKind, NewActivity};
use crate::state::AppState;

use super::{
    cell, error_page, escape, flash_html, layout, lock_error, optional, parse_id, select_html,
    Flash,
};

#[derive(Debug, Deserialize)]
pub struct ActivityForm {
    #[serde(default)]
    activity_type: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    due_date: String,
    #[serde(default)]
    done: Option<String>,
    #[serde(default)]
    company_id: String,
    #[serde(default)]
    deal_id: String,
    #[serde(default)]
    contact_id: String,
}

pub async fn page(State(state): State<Arc<AppState>>) -> Html<String> {
    render(&state, None)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ActivityForm>,
) -> Html<String> {
    let title = form.title.trim().to_string();
    if title.is_empty() {
        return render(&state, Some(Flash::error("Title is required.")));
    }

    let kind: ActivityKind = match form.activity_type.parse() {
        Ok(kind) => kind,
        Err(e) => return render(&state, Some(Flash::error(e.to_string()))),
    };

    let flash = {
        let Ok(db) = state.db.lock() else {
            return lock_error("/activities");
        };
        match db.insert_activity(&NewActivity {
            deal_id: parse_id(&form.deal_id),
            contact_id: parse_id(&form.contact_id),
            company_id: parse_id(&form.company_id),
            kind,
            title: title.clone(),
            description: optional(form.description),
            due_date: optional(form.due_date),
            done: form.done.is_some(),
        }) {
            Ok(id) => Flash::success(format!("Activity '{title}' created (#{id}).")),
            Err(e) => {
                warn!(activity = %title, error = %e, "activity insert failed");
                Flash::error(e.to_string())
            }
        }
    };
    render(&state, Some(flash))
}

fn render(state: &AppState, flash: Option<Flash>) -> Html<String> {
    let Ok(db) = state.db.lock() else {
        return lock_error("/activities");
    };
    let activities = match db.list_activities() {
        Ok(activities) => activities,
        Err(e) => return error_page("/activities", &e.to_string()),
    };
    let companies = match db.company_options() {
        Ok(companies) => companies,
        Err(e) => return error_page("/activities", &e.to_string()),
    };
    let deals = match db.deal_options() {
        Ok(deals) => deals,
        Err(e) => return error_page("/activities", &e.to_string()),
    };
    let contacts = match db.contact_options() {
        Ok(contacts) => contacts,
        Err(e) => return error_page("/activities", &e.to_string()),
    };
    drop(db);

    let mut body = String::new();
    body.push_str("<h2>Activities</h2>\n");
    body.push_str(&flash_html(&flash));

    if activities.is_empty() {
        body.push_str("<p>No activities yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>ID</th><th>Type</th><th>Title</th><th>Description</th>\
             <th>Due</th><th>Done</th><th>Company</th><th>Deal</th><th>Contact</th>\
             <th>Created</th></tr>\n",
        );
        for activity in &activities {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                 <td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                activity.id,
                activity.kind,
                escape(&activity.title),
                cell(&activity.description),
                cell(&activity.due_date),
                if activity.done { "yes" } else { "no" },
                cell(&activity.company),
                cell(&activity.deal),
                cell(&activity.contact),
                escape(&activity.created_at),
            ));
        }
        body.push_str("</table>\n");
    }

    let mut kind_options = String::new();
    for kind in ActivityKind::ALL {
        kind_options.push_str(&format!("<option value=\"{kind}\">{kind}</option>"));
    }

    body.push_str("<h3>New activity</h3>\n");
    body.push_str("<form class=\"entity\" method=\"post\" action=\"/activities\">\n");
    body.push_str(&format!(
        "<label>Type<select name=\"activity_type\">{kind_options}</select></label>\n"
    ));
    body.push_str("<label>Title *<input name=\"title\" required></label>\n");
    body.push_str("<label>Description<textarea name=\"description\" rows=\"3\"></textarea></label>\n");
    body.push_str("<label>Due date<input name=\"due_date\" type=\"date\"></label>\n");
    body.push_str("<label>Done<input name=\"done\" type=\"checkbox\"></label>\n");
    body.push_str(&format!(
        "<label>Company{}</label>\n",
        select_html("company_id", &companies)
    ));
    body.push_str(&format!(
        "<label>Deal{}</label>\n",
        select_html("deal_id", &deals)
    ));
    body.push_str(&format!(
        "<label>Contact{}</label>\n",
        select_html("contact_id", &contacts)
    ));
    body.push_str("<button type=\"submit\">Create activity</button>\n</form>\n");

    layout("/activities", &body)
}
