pub mod error;
pub mod input;
pub mod kind;
pub mod normalize;
pub mod sanitize;
pub mod submission;

pub use error::{FormResult, NormalizeError};
pub use input::{FieldValue, RawSubmission};
pub use kind::SubmissionKind;
pub use normalize::{REQUIRED_FIELDS, normalize};
pub use sanitize::{Sanitized, sanitize_email};
pub use submission::SanitizedSubmission;
