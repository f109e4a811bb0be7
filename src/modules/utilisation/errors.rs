use crate::shared::infrastructure::json_store::JsonStoreError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementRejection {
    #[error("project_id must be a whole number")]
    ProjectId,

    #[error("week must be a date formatted YYYY-MM-DD")]
    Week,

    #[error("requirement must be a non-negative number")]
    Requirement,
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Store(#[from] JsonStoreError),

    #[error("rejected: {0}")]
    Rejected(#[from] RequirementRejection),
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApplicationError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApplicationError::Store(e) => {
                tracing::error!(error = %e, "storage failure while serving request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod application_error_response_tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    #[rstest]
    #[case(ApplicationError::Rejected(RequirementRejection::Week), StatusCode::BAD_REQUEST)]
    #[case(
        ApplicationError::Store(JsonStoreError::Backend("down".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[tokio::test]
    async fn it_should_map_errors_to_status_and_json_body(
        #[case] error: ApplicationError,
        #[case] expected: StatusCode,
    ) {
        let message = error.to_string();

        let response = error.into_response();

        assert_eq!(response.status(), expected);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": message }));
    }
}
