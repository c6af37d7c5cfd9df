use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use overseace_form::{NormalizeError, SubmissionKind};
use thiserror::Error;

use crate::pipeline::DispatchResult;

pub const DISPATCH_FAILED_MESSAGE: &str =
    "Failed to send message. Please try again or contact us directly.";

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Invalid(#[from] NormalizeError),

    #[error("{}", DISPATCH_FAILED_MESSAGE)]
    Dispatch { kind: SubmissionKind },

    #[error("Too many requests. Please try again later.")]
    RateLimited,

    #[error("Failed to render email: {0}")]
    Render(#[from] askama::Error),

    #[error("Failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl SubmissionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SubmissionError::Invalid(_) => StatusCode::BAD_REQUEST,
            SubmissionError::Dispatch { .. }
            | SubmissionError::Render(_)
            | SubmissionError::Timestamp(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SubmissionError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let body = match self {
            SubmissionError::Dispatch { kind } => DispatchResult {
                success: false,
                message: DISPATCH_FAILED_MESSAGE.to_string(),
                form_type: Some(kind),
            },
            SubmissionError::Render(e) => {
                tracing::error!(error = %e, "Failed to render notification email");
                DispatchResult::failure(DISPATCH_FAILED_MESSAGE)
            }
            SubmissionError::Timestamp(e) => {
                tracing::error!(error = %e, "Failed to format submission timestamp");
                DispatchResult::failure(DISPATCH_FAILED_MESSAGE)
            }
            other => DispatchResult::failure(other.to_string()),
        };

        (status_code, Json(body)).into_response()
    }
}
