use validator::Validate;

use crate::{
    FieldValue, FormResult, NormalizeError, RawSubmission, Sanitized, SanitizedSubmission,
    sanitize_email,
};

/// Checked in this order; the first one missing is reported.
pub const REQUIRED_FIELDS: [&str; 2] = ["name", "email"];

/// Turns a raw body into a [`SanitizedSubmission`].
///
/// Required fields are checked on the raw input, every field is sanitized,
/// and the email address is validated last.
pub fn normalize(raw: &RawSubmission) -> FormResult<SanitizedSubmission> {
    for field in REQUIRED_FIELDS {
        if raw.text(field).is_none_or(|value| value.trim().is_empty()) {
            return Err(NormalizeError::MissingField(field));
        }
    }

    let text = |key: &str| raw.text(key).map(Sanitized::new).unwrap_or_default();

    let services = raw
        .get("services")
        .or_else(|| raw.get("service"))
        .map(FieldValue::to_list)
        .unwrap_or_default()
        .into_iter()
        .map(Sanitized::new)
        .collect();

    let submission = SanitizedSubmission {
        name: text("name"),
        email: raw.text("email").map(sanitize_email).unwrap_or_default(),
        phone: text("phone"),
        company: text("company"),
        subject: text("subject"),
        message: text("message"),
        services,
        origin: text("origin"),
        destination: text("destination"),
        cargo_type: text("cargo-type"),
        weight: text("weight"),
        distance: text("distance"),
        timeline: text("timeline"),
        details: text("details"),
        estimated_total: text("estimated_total"),
    };

    submission
        .validate()
        .map_err(|_| NormalizeError::InvalidEmail)?;

    Ok(submission)
}
