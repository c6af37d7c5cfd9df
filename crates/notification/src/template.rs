use overseace_form::{Sanitized, SanitizedSubmission, SubmissionKind};

/// Submission fields are emitted with `|safe`: they are [`Sanitized`] and
/// already escaped. Everything else goes through askama's HTML escaping.
#[derive(askama::Template)]
#[template(path = "contact.html")]
pub struct ContactHtmlTemplate<'a> {
    pub company_name: &'a str,
    pub submission: &'a SanitizedSubmission,
    pub submitted_at: &'a str,
}

#[derive(askama::Template)]
#[template(path = "quote.html")]
pub struct QuoteHtmlTemplate<'a> {
    pub company_name: &'a str,
    pub submission: &'a SanitizedSubmission,
    pub services: Sanitized,
    pub submitted_at: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html_body: String,
    pub kind: SubmissionKind,
}

pub fn email_subject(kind: SubmissionKind, name: &Sanitized) -> String {
    match kind {
        SubmissionKind::Contact => format!("New Contact Form Submission from {name}"),
        SubmissionKind::Quote => format!("New Quote Request from {name}"),
    }
}

/// Picks the template matching the submission kind and renders it.
pub fn render(
    submission: &SanitizedSubmission,
    company_name: &str,
    submitted_at: &str,
) -> Result<RenderedEmail, askama::Error> {
    use askama::Template;

    let kind = submission.kind();
    let html_body = match kind {
        SubmissionKind::Contact => ContactHtmlTemplate {
            company_name,
            submission,
            submitted_at,
        }
        .render()?,
        SubmissionKind::Quote => QuoteHtmlTemplate {
            company_name,
            submission,
            services: submission.services_display(),
            submitted_at,
        }
        .render()?,
    };

    Ok(RenderedEmail {
        subject: email_subject(kind, &submission.name),
        html_body,
        kind,
    })
}
