use axum::{
    Form, Json,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::modules::utilisation::core::window::DisplayWindow;
use crate::modules::utilisation::use_cases::set_week_requirement::command::RequirementSubmission;
use crate::shell::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RequirementBody {
    #[serde(flatten)]
    pub submission: RequirementSubmission,
    #[serde(default)]
    pub week_start: Option<String>,
    #[serde(default)]
    pub week_count: Option<serde_json::Value>,
}

impl RequirementBody {
    fn window(&self, state: &AppState) -> DisplayWindow {
        let week_count = match &self.week_count {
            Some(serde_json::Value::String(count)) => Some(count.clone()),
            Some(serde_json::Value::Number(count)) => Some(count.to_string()),
            _ => None,
        };
        DisplayWindow::resolve(
            self.week_start.as_deref(),
            week_count.as_deref(),
            state.report_handler.today(),
        )
    }
}

/// Accepts a JSON body or a urlencoded form; anything unreadable is a 422.
pub async fn handle(State(state): State<AppState>, request: Request) -> Response {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    let body = if is_json {
        Json::<RequirementBody>::from_request(request, &())
            .await
            .map(|Json(body)| body)
            .map_err(|rejection| rejection.body_text())
    } else {
        Form::<RequirementBody>::from_request(request, &())
            .await
            .map(|Form(body)| body)
            .map_err(|rejection| rejection.body_text())
    };

    let body = match body {
        Ok(body) => body,
        Err(reason) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": reason })),
            )
                .into_response();
        }
    };

    let window = body.window(&state);
    match state
        .set_requirement_handler
        .handle(&body.submission, window)
        .await
    {
        Ok(report) => Json(report.project_table_data).into_response(),
        Err(e) => e.into_response(),
    }
}
