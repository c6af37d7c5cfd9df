use thiserror::Error;

/// Reasons a submission is rejected before anything is rendered or sent.
///
/// The `Display` output is the user-facing message returned in the JSON
/// response body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Invalid email address")]
    InvalidEmail,
}

pub type FormResult<T> = Result<T, NormalizeError>;
