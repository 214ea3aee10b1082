use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use workwise_shared::clients::db::create_pool;
use workwise_shared::gateway::{AccessGateway, AuthState};

pub mod config;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod store;

use config::{AppConfig, StoreKind};
use services::NotificationService;
use store::{DynNotificationStore, MemoryNotificationStore, PgNotificationStore};

pub struct AppState {
    pub notifications: NotificationService,
    pub gateway: Arc<dyn AccessGateway>,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(notifications: NotificationService, gateway: Arc<dyn AccessGateway>) -> Self {
        Self {
            notifications,
            gateway,
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

impl AuthState for AppState {
    fn access_gateway(&self) -> &dyn AccessGateway {
        self.gateway.as_ref()
    }
}

/// Build the store selected by configuration.
pub fn build_store(config: &AppConfig) -> anyhow::Result<DynNotificationStore> {
    let store: DynNotificationStore = match config.store {
        StoreKind::Postgres => {
            let pool = create_pool(&config.database_url, config.db_pool_size)?;
            Arc::new(PgNotificationStore::new(pool))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory notification store; data is not persisted");
            Arc::new(MemoryNotificationStore::new())
        }
    };
    Ok(store)
}

pub fn router(state: Arc<AppState>) -> Router {
    let notifications = Router::new()
        .route(
            "/notifications",
            get(routes::notifications::list_notifications).post(routes::notifications::create_notification),
        )
        .route("/notifications/recent", get(routes::notifications::recent_notifications))
        .route("/notifications/unread-count", get(routes::notifications::unread_count))
        .route("/notifications/mark-all-read", post(routes::notifications::mark_all_read))
        .route(
            "/notifications/delete-all",
            axum::routing::delete(routes::notifications::delete_all),
        )
        .route(
            "/notifications/:id",
            get(routes::notifications::get_notification)
                .patch(routes::notifications::update_notification)
                .delete(routes::notifications::delete_notification),
        )
        .route("/notifications/:id/mark-read", post(routes::notifications::mark_read))
        .route("/notifications/:id/mark-unread", post(routes::notifications::mark_unread))
        .route_layer(axum::middleware::from_fn(
            workwise_shared::middleware::metrics_middleware,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .merge(notifications)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
