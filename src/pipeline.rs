//! Runs one submission through validation, rendering, dispatch and audit.

use std::sync::Arc;

use overseace_form::{RawSubmission, SubmissionKind, normalize};
use overseace_notification::{Mailer, OutgoingEmail};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time_tz::{Tz, timezones};

use crate::{
    audit::{AuditLog, format_timestamp},
    config::FormsConfig,
    error::SubmissionError,
};

/// JSON body returned for every submission, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<SubmissionKind>,
}

impl DispatchResult {
    pub fn sent(kind: SubmissionKind) -> Self {
        Self {
            success: true,
            message: kind.success_message().to_string(),
            form_type: Some(kind),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            form_type: None,
        }
    }
}

#[derive(Clone)]
pub struct FormPipeline {
    forms: FormsConfig,
    mailer: Arc<dyn Mailer>,
    audit: Option<AuditLog>,
    timezone: Option<&'static Tz>,
}

impl FormPipeline {
    pub fn new(forms: FormsConfig, mailer: Arc<dyn Mailer>, audit: Option<AuditLog>) -> Self {
        let timezone = timezones::get_by_name(&forms.timezone);
        if timezone.is_none() {
            tracing::warn!(timezone = %forms.timezone, "Unknown timezone, timestamps use UTC");
        }

        Self {
            forms,
            mailer,
            audit,
            timezone,
        }
    }

    /// Validation errors return before anything is sent or logged. Once the
    /// email has been handed to the mailer the audit line is written whatever
    /// the outcome.
    #[tracing::instrument(skip_all, fields(form_type = tracing::field::Empty))]
    pub async fn process(&self, raw: &RawSubmission) -> Result<DispatchResult, SubmissionError> {
        let submission = normalize(raw)?;
        let kind = submission.kind();
        tracing::Span::current().record("form_type", tracing::field::display(kind));

        let submitted_at = format_timestamp(OffsetDateTime::now_utc(), self.timezone)?;
        let rendered =
            overseace_notification::render(&submission, &self.forms.company_name, &submitted_at)?;

        let outcome = self
            .mailer
            .send(OutgoingEmail {
                to: self.forms.recipient.clone(),
                reply_to: submission.email.clone(),
                subject: rendered.subject,
                html_body: rendered.html_body,
            })
            .await;

        if let Some(audit) = &self.audit {
            let entry = AuditLog::format_entry(&submitted_at, kind, &submission);
            if let Err(e) = audit.append(&entry).await {
                tracing::warn!(
                    error = %e,
                    path = %audit.path().display(),
                    "Failed to append form submission to audit log"
                );
            }
        }

        match outcome {
            Ok(()) => {
                tracing::info!("Form submission dispatched");
                Ok(DispatchResult::sent(kind))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to dispatch form submission");
                Err(SubmissionError::Dispatch { kind })
            }
        }
    }
}
