use uuid::Uuid;

use workwise_shared::errors::AppResult;
use workwise_shared::types::auth::AuthUser;

use crate::models::{Notification, ReadFilter};
use crate::store::DynNotificationStore;

pub const DEFAULT_RECENT_LIMIT: i64 = 5;
pub const MAX_LIST_LIMIT: i64 = 100;

/// Fields a client may supply when creating a notification.
///
/// `claimed_owner` carries any owner/user field present in the payload. It is
/// only used for logging; the stored owner is always the caller.
#[derive(Debug, Clone, Default)]
pub struct NewNotificationInput {
    pub title: String,
    pub message: String,
    pub claimed_owner: Option<String>,
}

/// Owner-scoped notification operations. Every call takes the caller
/// explicitly and never reads ownership from client input.
#[derive(Clone)]
pub struct NotificationService {
    store: DynNotificationStore,
    recent_limit: i64,
}

impl NotificationService {
    pub fn new(store: DynNotificationStore) -> Self {
        Self {
            store,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn with_recent_limit(mut self, limit: i64) -> Self {
        self.recent_limit = clamp_limit(limit);
        self
    }

    pub fn recent_limit(&self) -> i64 {
        self.recent_limit
    }

    pub fn store(&self) -> &DynNotificationStore {
        &self.store
    }

    pub fn create(&self, caller: &AuthUser, input: NewNotificationInput) -> AppResult<Notification> {
        if let Some(claimed) = input.claimed_owner.as_deref() {
            if claimed != caller.id.to_string() {
                tracing::debug!(
                    caller_id = %caller.id,
                    claimed_owner = %claimed,
                    "ignoring client-supplied owner on create"
                );
            }
        }

        let notification = self.store.insert(caller.id, &input.title, &input.message)?;

        tracing::info!(
            notification_id = %notification.id,
            owner_id = %caller.id,
            "notification created"
        );

        Ok(notification)
    }

    pub fn get(&self, caller: &AuthUser, id: Uuid) -> AppResult<Notification> {
        self.store.get(id, caller.id)
    }

    pub fn list_all(
        &self,
        caller: &AuthUser,
        filter: ReadFilter,
        limit: Option<i64>,
    ) -> AppResult<Vec<Notification>> {
        self.store.list(caller.id, filter, limit.map(clamp_limit))
    }

    pub fn list_unread(&self, caller: &AuthUser) -> AppResult<Vec<Notification>> {
        self.store.list(caller.id, ReadFilter::Unread, None)
    }

    /// The `n` most recent notifications, newest first. `None` uses the
    /// configured default.
    pub fn list_recent(&self, caller: &AuthUser, n: Option<i64>) -> AppResult<Vec<Notification>> {
        let limit = n.map(clamp_limit).unwrap_or(self.recent_limit);
        self.store.list(caller.id, ReadFilter::All, Some(limit))
    }

    pub fn unread_count(&self, caller: &AuthUser) -> AppResult<i64> {
        self.store.count(caller.id, ReadFilter::Unread)
    }

    pub fn mark_read(&self, caller: &AuthUser, id: Uuid) -> AppResult<Notification> {
        self.set_read_state(caller, id, true)
    }

    pub fn mark_unread(&self, caller: &AuthUser, id: Uuid) -> AppResult<Notification> {
        self.set_read_state(caller, id, false)
    }

    /// Idempotent: setting the state a notification already has succeeds.
    pub fn set_read_state(&self, caller: &AuthUser, id: Uuid, is_read: bool) -> AppResult<Notification> {
        let notification = self.store.update_read_state(id, caller.id, is_read)?;

        tracing::debug!(
            notification_id = %id,
            owner_id = %caller.id,
            is_read,
            "notification read state updated"
        );

        Ok(notification)
    }

    pub fn mark_all_read(&self, caller: &AuthUser) -> AppResult<usize> {
        let count = self.store.bulk_update_read_state(caller.id, true)?;
        tracing::info!(owner_id = %caller.id, count, "marked all notifications read");
        Ok(count)
    }

    pub fn delete(&self, caller: &AuthUser, id: Uuid) -> AppResult<()> {
        self.store.delete(id, caller.id)?;
        tracing::info!(notification_id = %id, owner_id = %caller.id, "notification deleted");
        Ok(())
    }

    pub fn delete_all(&self, caller: &AuthUser) -> AppResult<usize> {
        let count = self.store.delete_all(caller.id)?;
        tracing::info!(owner_id = %caller.id, count, "deleted all notifications");
        Ok(count)
    }
}

fn clamp_limit(n: i64) -> i64 {
    n.clamp(1, MAX_LIST_LIMIT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use workwise_shared::errors::ErrorCode;

    use super::*;
    use crate::store::MemoryNotificationStore;

    fn service() -> NotificationService {
        NotificationService::new(Arc::new(MemoryNotificationStore::new()))
    }

    fn input(title: &str) -> NewNotificationInput {
        NewNotificationInput {
            title: title.to_string(),
            message: format!("{title} body"),
            claimed_owner: None,
        }
    }

    #[test]
    fn created_notifications_are_unread_and_owned_by_caller() {
        let svc = service();
        let caller = AuthUser::new(Uuid::now_v7());
        let n = svc.create(&caller, input("Filter change")).unwrap();
        assert!(!n.is_read);
        assert_eq!(n.owner_id, caller.id);
    }

    #[test]
    fn claimed_owner_is_overridden_by_caller() {
        let svc = service();
        let (a, b) = (AuthUser::new(Uuid::now_v7()), AuthUser::new(Uuid::now_v7()));

        let n = svc
            .create(
                &a,
                NewNotificationInput {
                    claimed_owner: Some(b.id.to_string()),
                    ..input("Spoofed")
                },
            )
            .unwrap();

        assert_eq!(n.owner_id, a.id);
        assert!(svc.list_all(&b, ReadFilter::All, None).unwrap().is_empty());
        assert_eq!(svc.list_all(&a, ReadFilter::All, None).unwrap().len(), 1);
    }

    #[test]
    fn recent_returns_newest_five() {
        let svc = service();
        let a = AuthUser::new(Uuid::now_v7());
        for i in 0..10 {
            svc.create(&a, input(&format!("N{i}"))).unwrap();
        }

        let recent = svc.list_recent(&a, None).unwrap();
        let titles: Vec<&str> = recent.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["N9", "N8", "N7", "N6", "N5"]);
        assert!(recent.windows(2).all(|w| w[0].seq > w[1].seq));
    }

    #[test]
    fn recent_with_fewer_records_returns_all() {
        let svc = service();
        let a = AuthUser::new(Uuid::now_v7());
        for i in 0..3 {
            svc.create(&a, input(&format!("N{i}"))).unwrap();
        }
        assert_eq!(svc.list_recent(&a, None).unwrap().len(), 3);
        assert_eq!(svc.list_recent(&a, Some(2)).unwrap().len(), 2);
        assert!(svc.list_recent(&AuthUser::new(Uuid::now_v7()), None).unwrap().is_empty());
    }

    #[test]
    fn read_transitions_are_idempotent() {
        let svc = service();
        let a = AuthUser::new(Uuid::now_v7());
        let n = svc.create(&a, input("Pressure drop")).unwrap();

        assert!(svc.mark_read(&a, n.id).unwrap().is_read);
        assert!(svc.mark_read(&a, n.id).unwrap().is_read);
        assert!(!svc.mark_unread(&a, n.id).unwrap().is_read);
        assert!(!svc.mark_unread(&a, n.id).unwrap().is_read);
    }

    #[test]
    fn other_callers_get_not_found() {
        let svc = service();
        let (a, b) = (AuthUser::new(Uuid::now_v7()), AuthUser::new(Uuid::now_v7()));
        let n = svc.create(&a, input("Private")).unwrap();

        for err in [
            svc.get(&b, n.id).unwrap_err(),
            svc.mark_read(&b, n.id).unwrap_err(),
            svc.mark_unread(&b, n.id).unwrap_err(),
            svc.delete(&b, n.id).unwrap_err(),
        ] {
            assert_eq!(err.code(), ErrorCode::NotificationNotFound);
        }
        assert!(!svc.get(&a, n.id).unwrap().is_read);
    }

    #[test]
    fn mark_all_read_empties_unread() {
        let svc = service();
        let a = AuthUser::new(Uuid::now_v7());
        for i in 0..4 {
            svc.create(&a, input(&format!("N{i}"))).unwrap();
        }
        let first = svc.list_all(&a, ReadFilter::All, None).unwrap()[0].id;
        svc.mark_read(&a, first).unwrap();

        assert_eq!(svc.mark_all_read(&a).unwrap(), 3);
        assert!(svc.list_unread(&a).unwrap().is_empty());
        assert_eq!(svc.unread_count(&a).unwrap(), 0);
        assert_eq!(svc.mark_all_read(&a).unwrap(), 0);
    }

    #[test]
    fn delete_all_reports_prior_total() {
        let svc = service();
        let a = AuthUser::new(Uuid::now_v7());
        for i in 0..6 {
            svc.create(&a, input(&format!("N{i}"))).unwrap();
        }

        assert_eq!(svc.delete_all(&a).unwrap(), 6);
        assert!(svc.list_all(&a, ReadFilter::All, None).unwrap().is_empty());
    }

    #[test]
    fn single_delete_removes_only_target() {
        let svc = service();
        let a = AuthUser::new(Uuid::now_v7());
        let keep = svc.create(&a, input("keep")).unwrap();
        let drop = svc.create(&a, input("drop")).unwrap();

        svc.delete(&a, drop.id).unwrap();
        assert_eq!(svc.get(&a, drop.id).unwrap_err().code(), ErrorCode::NotificationNotFound);
        assert_eq!(svc.get(&a, keep.id).unwrap().id, keep.id);
    }

    #[test]
    fn limits_are_clamped() {
        let svc = service().with_recent_limit(0);
        assert_eq!(svc.recent_limit(), 1);
        let svc = service().with_recent_limit(10_000);
        assert_eq!(svc.recent_limit(), MAX_LIST_LIMIT);
    }
}
