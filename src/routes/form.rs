use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use overseace_form::RawSubmission;

use crate::{error::SubmissionError, pipeline::DispatchResult, routes::AppState};

/// POST /process-form - contact or quote request, JSON or form-encoded
pub async fn action(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<Json<DispatchResult>, SubmissionError> {
    let raw = RawSubmission::from_body(&body);
    let result = app_state.pipeline.process(&raw).await?;

    Ok(Json(result))
}

/// OPTIONS /process-form - empty 200 for pre-flight checks
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> SubmissionError {
    SubmissionError::MethodNotAllowed
}
