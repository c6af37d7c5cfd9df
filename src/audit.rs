//! Append-only submission log, one line per dispatched form.

use std::{path::PathBuf, sync::Arc};

use overseace_form::{SanitizedSubmission, SubmissionKind};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use time_tz::{ToTimezone, Tz};
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// `now` as wall-clock time in `timezone`, UTC when none is set.
pub fn format_timestamp(
    now: OffsetDateTime,
    timezone: Option<&Tz>,
) -> Result<String, time::error::Format> {
    let local = match timezone {
        Some(tz) => now.to_timezone(tz),
        None => now,
    };

    local.format(TIMESTAMP_FORMAT)
}

/// Cloning shares the same lock, so every clone appends through one writer.
#[derive(Clone, Debug)]
pub struct AuditLog {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// `2026-10-17 09:30:00 - quote submission from Bob (bob@x.com)`
    ///
    /// Control characters in submitted values become spaces, so an entry is
    /// always exactly one line.
    pub fn format_entry(
        timestamp: &str,
        kind: SubmissionKind,
        submission: &SanitizedSubmission,
    ) -> String {
        format!(
            "{timestamp} - {kind} submission from {} ({})\n",
            single_line(submission.name.as_str()),
            single_line(&submission.email)
        )
    }

    /// Writes the whole line in one call while holding the lock.
    pub async fn append(&self, entry: &str) -> std::io::Result<()> {
        let _guard = self.lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(entry.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
