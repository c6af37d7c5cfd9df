mod mailer;
mod service;
pub mod template;

pub use mailer::*;
pub use service::*;
pub use template::{RenderedEmail, email_subject, render};
