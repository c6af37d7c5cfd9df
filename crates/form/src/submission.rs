use validator::Validate;

use crate::{Sanitized, SubmissionKind};

/// A validated submission. Every free-text field is [`Sanitized`]; `email`
/// has had illegal characters removed and passed syntax validation.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct SanitizedSubmission {
    pub name: Sanitized,
    #[validate(email)]
    pub email: String,
    pub phone: Sanitized,
    pub company: Sanitized,
    pub subject: Sanitized,
    pub message: Sanitized,
    pub services: Vec<Sanitized>,
    pub origin: Sanitized,
    pub destination: Sanitized,
    pub cargo_type: Sanitized,
    pub weight: Sanitized,
    pub distance: Sanitized,
    pub timeline: Sanitized,
    pub details: Sanitized,
    pub estimated_total: Sanitized,
}

impl SanitizedSubmission {
    /// Selected services as displayed in the email ("Shipping, Customs").
    pub fn services_display(&self) -> Sanitized {
        Sanitized::join(&self.services)
    }

    pub fn kind(&self) -> SubmissionKind {
        SubmissionKind::classify(self.services_display().as_str())
    }
}
