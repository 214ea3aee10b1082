//! Notification persistence.
//!
//! Every method scopes by owner: a record owned by someone else is reported
//! exactly like a missing one. Each call is a single atomic unit against the
//! backing store, so concurrent calls for the same owner never lose updates.

use std::sync::Arc;

use uuid::Uuid;

use workwise_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Notification, ReadFilter};

mod memory;
mod pg;

pub use memory::MemoryNotificationStore;
pub use pg::PgNotificationStore;

pub trait NotificationStore: Send + Sync {
    /// Insert a new unread notification for `owner`.
    fn insert(&self, owner: Uuid, title: &str, message: &str) -> AppResult<Notification>;

    fn get(&self, id: Uuid, owner: Uuid) -> AppResult<Notification>;

    /// Records for `owner` newest first, optionally truncated to `limit`.
    fn list(&self, owner: Uuid, filter: ReadFilter, limit: Option<i64>) -> AppResult<Vec<Notification>>;

    fn count(&self, owner: Uuid, filter: ReadFilter) -> AppResult<i64>;

    fn update_read_state(&self, id: Uuid, owner: Uuid, is_read: bool) -> AppResult<Notification>;

    /// Set `is_read = to_state` on every record of `owner` currently in the
    /// opposite state. Returns the number of records changed.
    fn bulk_update_read_state(&self, owner: Uuid, to_state: bool) -> AppResult<usize>;

    fn delete(&self, id: Uuid, owner: Uuid) -> AppResult<()>;

    fn delete_all(&self, owner: Uuid) -> AppResult<usize>;

    /// Liveness check used by `/health`.
    fn ping(&self) -> AppResult<()>;
}

pub type DynNotificationStore = Arc<dyn NotificationStore>;

pub(crate) fn not_found() -> AppError {
    AppError::new(ErrorCode::NotificationNotFound, "notification not found")
}
