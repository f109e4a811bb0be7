use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::modules::utilisation::core::window::DisplayWindow;
use crate::modules::utilisation::use_cases::view_utilisation_report::handler::ReportQuery;
use crate::shell::state::AppState;

/// Flags count as set when present, whatever their value.
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub week_start: Option<String>,
    pub week_count: Option<String>,
    pub force_refresh: Option<String>,
    pub hide_fully_scheduled_projects: Option<String>,
}

impl ReportParams {
    pub fn to_query(&self, today: NaiveDate) -> ReportQuery {
        ReportQuery {
            window: DisplayWindow::resolve(
                self.week_start.as_deref(),
                self.week_count.as_deref(),
                today,
            ),
            force_refresh: self.force_refresh.is_some(),
            hide_fully_scheduled: self.hide_fully_scheduled_projects.is_some(),
        }
    }
}

pub async fn handle(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> impl IntoResponse {
    let query = params.to_query(state.report_handler.today());
    match state.report_handler.handle(&query).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => e.into_response(),
    }
}
