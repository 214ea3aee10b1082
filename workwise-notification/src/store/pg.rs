use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use uuid::Uuid;

use workwise_shared::clients::db::DbPool;
use workwise_shared::errors::{AppError, AppResult, ErrorCode};

use super::{not_found, NotificationStore};
use crate::models::{NewNotification, Notification, ReadFilter};
use crate::schema::notifications;

/// PostgreSQL-backed store. Every operation is a single SQL statement.
#[derive(Clone)]
pub struct PgNotificationStore {
    pool: DbPool,
}

impl PgNotificationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> AppResult<PooledConnection<ConnectionManager<PgConnection>>> {
        self.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection");
            AppError::new(ErrorCode::ServiceUnavailable, "database connection error")
        })
    }
}

fn map_not_found(e: diesel::result::Error) -> AppError {
    match e {
        diesel::result::Error::NotFound => not_found(),
        other => AppError::Database(other),
    }
}

impl NotificationStore for PgNotificationStore {
    fn insert(&self, owner: Uuid, title: &str, message: &str) -> AppResult<Notification> {
        let new_notification = NewNotification::new(owner, title, message)?;
        let mut conn = self.conn()?;

        let notification = diesel::insert_into(notifications::table)
            .values(&new_notification)
            .get_result::<Notification>(&mut conn)?;

        tracing::debug!(
            notification_id = %notification.id,
            owner_id = %owner,
            "notification created"
        );

        Ok(notification)
    }

    fn get(&self, id: Uuid, owner: Uuid) -> AppResult<Notification> {
        let mut conn = self.conn()?;

        notifications::table
            .filter(notifications::id.eq(id))
            .filter(notifications::owner_id.eq(owner))
            .first::<Notification>(&mut conn)
            .map_err(map_not_found)
    }

    fn list(&self, owner: Uuid, filter: ReadFilter, limit: Option<i64>) -> AppResult<Vec<Notification>> {
        let mut conn = self.conn()?;

        let mut query = notifications::table
            .filter(notifications::owner_id.eq(owner))
            .order(notifications::seq.desc())
            .into_boxed();

        if let Some(is_read) = filter.is_read() {
            query = query.filter(notifications::is_read.eq(is_read));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        Ok(query.load::<Notification>(&mut conn)?)
    }

    fn count(&self, owner: Uuid, filter: ReadFilter) -> AppResult<i64> {
        let mut conn = self.conn()?;

        let owned = notifications::table.filter(notifications::owner_id.eq(owner));

        let total: i64 = match filter.is_read() {
            Some(is_read) => owned
                .filter(notifications::is_read.eq(is_read))
                .count()
                .get_result(&mut conn)?,
            None => owned.count().get_result(&mut conn)?,
        };

        Ok(total)
    }

    fn update_read_state(&self, id: Uuid, owner: Uuid, is_read: bool) -> AppResult<Notification> {
        let mut conn = self.conn()?;

        diesel::update(
            notifications::table
                .filter(notifications::id.eq(id))
                .filter(notifications::owner_id.eq(owner)),
        )
        .set(notifications::is_read.eq(is_read))
        .get_result::<Notification>(&mut conn)
        .map_err(map_not_found)
    }

    fn bulk_update_read_state(&self, owner: Uuid, to_state: bool) -> AppResult<usize> {
        let mut conn = self.conn()?;

        let updated = diesel::update(
            notifications::table
                .filter(notifications::owner_id.eq(owner))
                .filter(notifications::is_read.eq(!to_state)),
        )
        .set(notifications::is_read.eq(to_state))
        .execute(&mut conn)?;

        Ok(updated)
    }

    fn delete(&self, id: Uuid, owner: Uuid) -> AppResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            notifications::table
                .filter(notifications::id.eq(id))
                .filter(notifications::owner_id.eq(owner)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    fn delete_all(&self, owner: Uuid) -> AppResult<usize> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(notifications::table.filter(notifications::owner_id.eq(owner)))
            .execute(&mut conn)?;

        Ok(deleted)
    }

    fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }
}
