use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A single-line operator message that dismisses itself once `expires_at`
/// passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: Uuid,
    pub message: String,
    pub posted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notice {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Holds the most recent notice. Posting replaces whatever was showing.
pub struct Notifier {
    ttl: TimeDelta,
    current: RwLock<Option<Notice>>,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            current: RwLock::new(None),
        }
    }

    pub async fn post(&self, message: impl Into<String>) -> Notice {
        self.post_at(message, Utc::now()).await
    }

    pub async fn post_at(&self, message: impl Into<String>, now: DateTime<Utc>) -> Notice {
        let notice = Notice {
            id: Uuid::new_v4(),
            message: message.into(),
            posted_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        *self.current.write().await = Some(notice.clone());
        notice
    }

    pub async fn current(&self) -> Option<Notice> {
        self.current_at(Utc::now()).await
    }

    pub async fn current_at(&self, now: DateTime<Utc>) -> Option<Notice> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|notice| notice.is_active_at(now))
            .cloned()
    }
}
