use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use workwise_shared::errors::{AppError, AppResult};

use super::{not_found, NotificationStore};
use crate::models::{NewNotification, Notification, ReadFilter};

/// Process-local store. One lock acquisition per operation.
#[derive(Default)]
pub struct MemoryNotificationStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    rows: Vec<Notification>,
    next_seq: i64,
    last_created_at: Option<DateTime<Utc>>,
}

impl Inner {
    /// Wall-clock time, never earlier than the previous insert.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created_at = Some(ts);
        ts
    }

    fn find_mut(&mut self, id: Uuid, owner: Uuid) -> AppResult<&mut Notification> {
        self.rows
            .iter_mut()
            .find(|n| n.id == id && n.owner_id == owner)
            .ok_or_else(not_found)
    }
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| AppError::internal("notification store lock poisoned"))
    }
}

impl NotificationStore for MemoryNotificationStore {
    fn insert(&self, owner: Uuid, title: &str, message: &str) -> AppResult<Notification> {
        let new = NewNotification::new(owner, title, message)?;
        let mut inner = self.lock()?;

        inner.next_seq += 1;
        let notification = Notification {
            id: new.id,
            owner_id: new.owner_id,
            title: new.title,
            message: new.message,
            is_read: false,
            created_at: inner.next_timestamp(),
            seq: inner.next_seq,
        };
        inner.rows.push(notification.clone());

        tracing::debug!(
            notification_id = %notification.id,
            owner_id = %owner,
            "notification created"
        );

        Ok(notification)
    }

    fn get(&self, id: Uuid, owner: Uuid) -> AppResult<Notification> {
        let mut inner = self.lock()?;
        inner.find_mut(id, owner).map(|n| n.clone())
    }

    fn list(&self, owner: Uuid, filter: ReadFilter, limit: Option<i64>) -> AppResult<Vec<Notification>> {
        let inner = self.lock()?;

        let mut items: Vec<Notification> = inner
            .rows
            .iter()
            .filter(|n| n.owner_id == owner && filter.matches(n))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.seq.cmp(&a.seq));

        if let Some(limit) = limit {
            items.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        }

        Ok(items)
    }

    fn count(&self, owner: Uuid, filter: ReadFilter) -> AppResult<i64> {
        let inner = self.lock()?;
        let total = inner
            .rows
            .iter()
            .filter(|n| n.owner_id == owner && filter.matches(n))
            .count();
        Ok(total as i64)
    }

    fn update_read_state(&self, id: Uuid, owner: Uuid, is_read: bool) -> AppResult<Notification> {
        let mut inner = self.lock()?;
        let notification = inner.find_mut(id, owner)?;
        notification.is_read = is_read;
        Ok(notification.clone())
    }

    fn bulk_update_read_state(&self, owner: Uuid, to_state: bool) -> AppResult<usize> {
        let mut inner = self.lock()?;
        let mut updated = 0;
        for n in inner
            .rows
            .iter_mut()
            .filter(|n| n.owner_id == owner && n.is_read != to_state)
        {
            n.is_read = to_state;
            updated += 1;
        }
        Ok(updated)
    }

    fn delete(&self, id: Uuid, owner: Uuid) -> AppResult<()> {
        let mut inner = self.lock()?;
        let before = inner.rows.len();
        inner.rows.retain(|n| !(n.id == id && n.owner_id == owner));
        if inner.rows.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    fn delete_all(&self, owner: Uuid) -> AppResult<usize> {
        let mut inner = self.lock()?;
        let before = inner.rows.len();
        inner.rows.retain(|n| n.owner_id != owner);
        Ok(before - inner.rows.len())
    }

    fn ping(&self) -> AppResult<()> {
        self.lock().map(|_| ())
    }
}
