use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// How long update confirmations and update errors stay on screen.
pub const TRANSIENT_NOTICE_SECS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

/// Inline banner shown next to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    kind: NoticeKind,
    message: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Notice {
    pub fn transient(kind: NoticeKind, message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: Some(now + Duration::seconds(TRANSIENT_NOTICE_SECS)),
        }
    }

    pub fn persistent(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
