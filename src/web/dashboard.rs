//! Dashboard: headline numbers, pipeline bars, upcoming activities.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

use crate::state::AppState;

use super::{error_page, escape, format_amount, layout, lock_error};

pub async fn page(State(state): State<Arc<AppState>>) -> Html<String> {
    let Ok(db) = state.db.lock() else {
        return lock_error("/");
    };
    let totals = match db.deal_totals() {
        Ok(totals) => totals,
        Err(e) => return error_page("/", &e.to_string()),
    };
    let pipeline = match db.pipeline_by_stage() {
        Ok(pipeline) => pipeline,
        Err(e) => return error_page("/", &e.to_string()),
    };
    let upcoming = match db.upcoming_activities(10) {
        Ok(upcoming) => upcoming,
        Err(e) => return error_page("/", &e.to_string()),
    };
    drop(db);

    let mut body = String::new();
    body.push_str("<h2>Dashboard</h2>\n");

    body.push_str(&format!(
        "<div class=\"tiles\">\n\
         <div class=\"tile\"><span>Deals</span><strong>{}</strong></div>\n\
         <div class=\"tile\"><span>Pipeline (open)</span><strong>{}</strong></div>\n\
         <div class=\"tile\"><span>Won (total)</span><strong>{}</strong></div>\n\
         </div>\n",
        totals.deal_count,
        format_amount(totals.open_total),
        format_amount(totals.won_total),
    ));

    body.push_str("<h3>Pipeline by stage</h3>\n");
    if pipeline.is_empty() {
        body.push_str("<p>No deals yet.</p>\n");
    } else {
        let max = pipeline.iter().map(|t| t.total).fold(0.0_f64, f64::max);
        for entry in &pipeline {
            let width = if max > 0.0 {
                (entry.total / max * 100.0).round() as i64
            } else {
                0
            };
            body.push_str(&format!(
                "<div class=\"bar-row\"><span class=\"bar-label\">{}</span>\
                 <div class=\"bar\" style=\"width: {width}%\"></div><span>{}</span></div>\n",
                entry.stage,
                format_amount(entry.total),
            ));
        }
    }

    body.push_str("<h3>Upcoming activities</h3>\n");
    if upcoming.is_empty() {
        body.push_str("<p>No open activities.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Due</th><th>Type</th><th>Title</th></tr>\n");
        for activity in &upcoming {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&activity.due_date),
                activity.kind,
                escape(&activity.title),
            ));
        }
        body.push_str("</table>\n");
    }

    layout("/", &body)
}
