//! Deal list + create form.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use tracing::warn;

use crate::db::{NewDeal, Stage};
use crate::state::AppState;

use super::{
    cell, error_page, escape, flash_html, format_amount, layout, lock_error, optional, parse_id,
    select_html, Flash,
};

#[derive(Debug, Deserialize)]
pub struct DealForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    company_id: String,
    #[serde(default)]
    contact_id: String,
    #[serde(default)]
    amount: String,
    #[serde(default)]
    stage: String,
    #[serde(default)]
    probability: String,
    #[serde(default)]
    expected_close: String,
}

pub async fn page(State(state): State<Arc<AppState>>) -> Html<String> {
    render(&state, None)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DealForm>,
) -> Html<String> {
    let name = form.name.trim().to_string();
    if name.is_empty() {
        return render(&state, Some(Flash::error("Deal name is required.")));
    }

    let amount: f64 = match form.amount.trim() {
        "" => 0.0,
        raw => match raw.parse() {
            Ok(amount) => amount,
            Err(_) => return render(&state, Some(Flash::error("Amount must be a number."))),
        },
    };

    let stage: Stage = match form.stage.parse() {
        Ok(stage) => stage,
        Err(e) => return render(&state, Some(Flash::error(e.to_string()))),
    };

    let probability: i64 = form
        .probability
        .trim()
        .parse()
        .unwrap_or(10)
        .clamp(0, 100);

    let flash = {
        let Ok(db) = state.db.lock() else {
            return lock_error("/deals");
        };
        match db.insert_deal(&NewDeal {
            name: name.clone(),
            company_id: parse_id(&form.company_id),
            contact_id: parse_id(&form.contact_id),
            amount,
            stage,
            probability,
            expected_close: optional(form.expected_close),
        }) {
            Ok(id) => Flash::success(format!("Deal '{name}' created (#{id}).")),
            Err(e) => {
                warn!(deal = %name, error = %e, "deal insert failed");
                Flash::error(e.to_string())
            }
        }
    };
    render(&state, Some(flash))
}

fn render(state: &AppState, flash: Option<Flash>) -> Html<String> {
    let Ok(db) = state.db.lock() else {
        return lock_error("/deals");
    };
    let deals = match db.list_deals() {
        Ok(deals) => deals,
        Err(e) => return error_page("/deals", &e.to_string()),
    };
    let companies = match db.company_options() {
        Ok(companies) => companies,
        Err(e) => return error_page("/deals", &e.to_string()),
    };
    let contacts = match db.contact_options() {
        Ok(contacts) => contacts,
        Err(e) => return error_page("/deals", &e.to_string()),
    };
    drop(db);

    let mut body = String::new();
    body.push_str("<h2>Deals</h2>\n");
    body.push_str(&flash_html(&flash));

    if deals.is_empty() {
        body.push_str("<p>No deals yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>ID</th><th>Name</th><th>Company</th><th>Contact</th>\
             <th>Amount</th><th>Stage</th><th>Probability</th><th>Expected close</th>\
             <th>Created</th></tr>\n",
        );
        for deal in &deals {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                 <td>{}%</td><td>{}</td><td>{}</td></tr>\n",
                deal.id,
                escape(&deal.name),
                cell(&deal.company),
                cell(&deal.contact),
                format_amount(deal.amount),
                deal.stage,
                deal.probability,
                cell(&deal.expected_close),
                escape(&deal.created_at),
            ));
        }
        body.push_str("</table>\n");
    }

    let mut stage_options = String::new();
    for stage in Stage::ALL {
        stage_options.push_str(&format!("<option value=\"{stage}\">{stage}</option>"));
    }

    body.push_str("<h3>New deal</h3>\n");
    body.push_str("<form class=\"entity\" method=\"post\" action=\"/deals\">\n");
    body.push_str("<label>Name *<input name=\"name\" required></label>\n");
    body.push_str(&format!(
        "<label>Company{}</label>\n",
        select_html("company_id", &companies)
    ));
    body.push_str(&format!(
        "<label>Contact{}</label>\n",
        select_html("contact_id", &contacts)
    ));
    body.push_str(
        "<label>Amount<input name=\"amount\" type=\"number\" min=\"0\" step=\"1000\" value=\"0\"></label>\n",
    );
    body.push_str(&format!(
        "<label>Stage<select name=\"stage\">{stage_options}</select></label>\n"
    ));
    body.push_str(
        "<label>Probability (%)<input name=\"probability\" type=\"number\" min=\"0\" max=\"100\" step=\"5\" value=\"10\"></label>\n",
    );
    body.push_str("<label>Expected close<input name=\"expected_close\" type=\"date\"></label>\n");
    body.push_str("<button type=\"submit\">Create deal</button>\n</form>\n");

    layout("/deals", &body)
}
