use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Whether a submission is a plain contact message or a quote request.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubmissionKind {
    #[default]
    Contact,
    Quote,
}

impl SubmissionKind {
    /// A quote request is any submission that selected at least one service.
    pub fn classify(services: &str) -> Self {
        if services.is_empty() {
            SubmissionKind::Contact
        } else {
            SubmissionKind::Quote
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            SubmissionKind::Contact => "Message sent successfully!",
            SubmissionKind::Quote => "Quote request sent successfully!",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(SubmissionKind::classify(""), SubmissionKind::Contact);
        assert_eq!(SubmissionKind::classify("Shipping"), SubmissionKind::Quote);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(SubmissionKind::Quote.to_string(), "quote");
        assert_eq!(SubmissionKind::from_str("contact"), Ok(SubmissionKind::Contact));
        assert_eq!(
            serde_json::to_string(&SubmissionKind::Quote).unwrap(),
            "\"quote\""
        );
        assert_eq!(SubmissionKind::VARIANTS.len(), 2);
    }
}
