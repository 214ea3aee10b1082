use std::sync::Arc;

use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use workwise_shared::errors::{AppError, AppResult, ErrorCode};
use workwise_shared::extract::{AppJson, AppQuery};
use workwise_shared::types::api::ApiResponse;
use workwise_shared::types::auth::AuthUser;

use crate::models::{Notification, ReadFilter};
use crate::services::notification_service::NewNotificationInput;
use crate::store::not_found;
use crate::AppState;

/// Notification id from the path. An id that is not a UUID cannot name any
/// record, so it is reported the same way as an unknown one.
pub struct NotificationId(pub Uuid);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for NotificationId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<Uuid>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "unparseable notification id");
                Err(not_found())
            }
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    #[validate(required(message = "title is required"), length(min = 1, message = "title is required"))]
    pub title: Option<String>,
    #[validate(required(message = "message is required"), length(min = 1, message = "message is required"))]
    pub message: Option<String>,
    /// Accepted but ignored: the owner is always the authenticated caller.
    #[serde(default, alias = "user", alias = "owner_id")]
    pub owner: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub unread: Option<bool>,
    pub filter: Option<ReadFilter>,
    pub limit: Option<i64>,
}

impl ListQuery {
    fn read_filter(&self) -> ReadFilter {
        match (self.filter, self.unread) {
            (Some(filter), _) => filter,
            (None, Some(true)) => ReadFilter::Unread,
            (None, Some(false)) => ReadFilter::Read,
            (None, None) => ReadFilter::All,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReadStateRequest {
    pub is_read: bool,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// POST /notifications
/// Create a notification owned by the authenticated user.
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    AppJson(req): AppJson<CreateNotificationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Notification>>)> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;

    let claimed_owner = req.owner.map(|v| match v {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    });

    let notification = state.notifications.create(
        &auth_user,
        NewNotificationInput {
            title: req.title.unwrap_or_default(),
            message: req.message.unwrap_or_default(),
            claimed_owner,
        },
    )?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(notification))))
}

/// GET /notifications
/// List the authenticated user's notifications, newest first.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    AppQuery(params): AppQuery<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    let items = state
        .notifications
        .list_all(&auth_user, params.read_filter(), params.limit)?;

    Ok(Json(ApiResponse::ok(items)))
}

/// GET /notifications/recent
/// The most recent notifications, five unless `limit` says otherwise.
pub async fn recent_notifications(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    AppQuery(params): AppQuery<RecentQuery>,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    let items = state.notifications.list_recent(&auth_user, params.limit)?;

    Ok(Json(ApiResponse::ok(items)))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<CountResponse>>> {
    let count = state.notifications.unread_count(&auth_user)?;

    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /notifications/:id
pub async fn get_notification(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    NotificationId(id): NotificationId,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let notification = state.notifications.get(&auth_user, id)?;

    Ok(Json(ApiResponse::ok(notification)))
}

/// PATCH /notifications/:id
/// Only `is_read` can be changed.
pub async fn update_notification(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    NotificationId(id): NotificationId,
    AppJson(req): AppJson<UpdateReadStateRequest>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let notification = state.notifications.set_read_state(&auth_user, id, req.is_read)?;

    Ok(Json(ApiResponse::ok(notification)))
}

/// DELETE /notifications/:id
pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    NotificationId(id): NotificationId,
) -> AppResult<Json<ApiResponse<CountResponse>>> {
    state.notifications.delete(&auth_user, id)?;

    Ok(Json(ApiResponse::ok(CountResponse { count: 1 })))
}

/// POST /notifications/:id/mark-read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    NotificationId(id): NotificationId,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let notification = state.notifications.mark_read(&auth_user, id)?;

    Ok(Json(ApiResponse::ok(notification)))
}

/// POST /notifications/:id/mark-unread
pub async fn mark_unread(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    NotificationId(id): NotificationId,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let notification = state.notifications.mark_unread(&auth_user, id)?;

    Ok(Json(ApiResponse::ok(notification)))
}

/// POST /notifications/mark-all-read
/// Mark all unread notifications as read for the authenticated user.
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<CountResponse>>> {
    let updated = state.notifications.mark_all_read(&auth_user)?;

    Ok(Json(ApiResponse::ok(CountResponse { count: updated as i64 })))
}

/// DELETE /notifications/delete-all
pub async fn delete_all(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<CountResponse>>> {
    let deleted = state.notifications.delete_all(&auth_user)?;

    Ok(Json(ApiResponse::ok(CountResponse { count: deleted as i64 })))
}
