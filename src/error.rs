use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::MAX_UNFINISHED_COUNT;

#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("The requested Todo is not found. (id={id})")]
    NotFound { id: i64 },

    #[error("{0}")]
    BusinessRule(String),

    #[error("{0}")]
    Validation(String),

    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl TodoError {
    pub fn unfinished_cap_reached() -> Self {
        Self::BusinessRule(format!(
            "The count of un-finished Todo must not be over {MAX_UNFINISHED_COUNT}."
        ))
    }

    pub fn already_finished(id: i64) -> Self {
        Self::BusinessRule(format!(
            "The requested Todo is already finished. (id={id})"
        ))
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Storage(_) | Self::Task(_) => "INTERNAL_ERROR",
        }
    }
}

/// The one place error kinds become HTTP status codes.
pub fn status_for(error: &TodoError) -> StatusCode {
    match error {
        TodoError::NotFound { .. } => StatusCode::NOT_FOUND,
        TodoError::BusinessRule(_) => StatusCode::CONFLICT,
        TodoError::Validation(_) => StatusCode::BAD_REQUEST,
        TodoError::Storage(_) | TodoError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let message = match &self {
            Self::Storage(_) | Self::Task(_) => {
                tracing::error!(error = %self, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody {
            code: self.code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TodoError::NotFound { id: 3 }, StatusCode::NOT_FOUND)]
    #[case(TodoError::unfinished_cap_reached(), StatusCode::CONFLICT)]
    #[case(TodoError::already_finished(1), StatusCode::CONFLICT)]
    #[case(TodoError::Validation("bad".to_string()), StatusCode::BAD_REQUEST)]
    #[case(
        TodoError::Storage(rusqlite::Error::QueryReturnedNoRows),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn maps_each_kind_to_one_status(#[case] error: TodoError, #[case] expected: StatusCode) {
        assert_eq!(status_for(&error), expected);
        assert_eq!(error.into_response().status(), expected);
    }

    #[tokio::test]
    async fn failed_blocking_task_is_an_internal_error() {
        let join_error = tokio::task::spawn_blocking(|| panic!("worker died"))
            .await
            .unwrap_err();

        let response = TodoError::from(join_error).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn messages_carry_the_id() {
        assert_eq!(
            TodoError::NotFound { id: 42 }.to_string(),
            "The requested Todo is not found. (id=42)"
        );
        assert!(TodoError::already_finished(7).to_string().contains("(id=7)"));
        assert_eq!(
            TodoError::unfinished_cap_reached().to_string(),
            "The count of un-finished Todo must not be over 5."
        );
    }
}
