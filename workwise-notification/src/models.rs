use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use workwise_shared::errors::{AppError, AppResult, ErrorCode};

use crate::schema::notifications;

pub const TITLE_MAX_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Serialize)]
#[diesel(table_name = notifications)]
pub struct Notification {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    /// Insertion sequence. Defines list order; `created_at` is informational.
    #[serde(skip)]
    pub seq: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub message: String,
}

impl NewNotification {
    /// Build an insertable record, rejecting blank or oversized fields.
    pub fn new(owner_id: Uuid, title: &str, message: &str) -> AppResult<Self> {
        let title = title.trim();
        let message = message.trim();

        if title.is_empty() {
            return Err(AppError::new(ErrorCode::ValidationError, "title must not be empty"));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(AppError::new(
                ErrorCode::ValidationError,
                format!("title must be at most {TITLE_MAX_LEN} characters"),
            ));
        }
        if message.is_empty() {
            return Err(AppError::new(ErrorCode::ValidationError, "message must not be empty"));
        }

        Ok(Self {
            id: Uuid::now_v7(),
            owner_id,
            title: title.to_string(),
            message: message.to_string(),
        })
    }
}

/// Read-state selector for list and count queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFilter {
    #[default]
    All,
    Unread,
    Read,
}

impl ReadFilter {
    /// The `is_read` value rows must have, if any.
    pub fn is_read(self) -> Option<bool> {
        match self {
            ReadFilter::All => None,
            ReadFilter::Unread => Some(false),
            ReadFilter::Read => Some(true),
        }
    }

    pub fn matches(self, notification: &Notification) -> bool {
        self.is_read().map_or(true, |r| notification.is_read == r)
    }
}
