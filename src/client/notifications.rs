use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    pub fn default_duration(self) -> Duration {
        Duration::from_millis(match self {
            NoticeKind::Success => 5_000,
            NoticeKind::Error => 7_000,
            NoticeKind::Warning => 6_000,
            NoticeKind::Info => 4_000,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub title: String,
    pub message: Option<String>,
    /// `None` keeps the notice until it is dismissed.
    pub duration: Option<Duration>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Notice {
    pub fn expired_at(&self, now: OffsetDateTime) -> bool {
        match self.duration {
            Some(d) => now - self.created_at >= d,
            None => false,
        }
    }
}

/// Queue of transient user notifications, oldest first.
#[derive(Debug, Default)]
pub struct Notifications {
    items: Vec<Notice>,
}

impl Notifications {
    pub fn notify(&mut self, kind: NoticeKind, title: impl Into<String>, message: Option<String>) -> Uuid {
        self.push(kind, title, message, Some(kind.default_duration()))
    }

    pub fn push(
        &mut self,
        kind: NoticeKind,
        title: impl Into<String>,
        message: Option<String>,
        duration: Option<Duration>,
    ) -> Uuid {
        let notice = Notice {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            message,
            duration: duration.filter(|d| !d.is_zero()),
            created_at: OffsetDateTime::now_utc(),
        };
        let id = notice.id;
        self.items.push(notice);
        id
    }

    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drops every notice whose duration has elapsed by `now`.
    pub fn expire(&mut self, now: OffsetDateTime) {
        self.items.retain(|n| !n.expired_at(now));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Notice] {
        &self.items
    }
}
