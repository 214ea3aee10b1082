use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use workwise_shared::types::api::{HealthCheck, HealthResponse, HealthStatus};

use crate::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let store_check = match state.notifications.store().ping() {
        Ok(()) => HealthCheck {
            name: "store".into(),
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "store health check failed");
            HealthCheck {
                name: "store".into(),
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
            }
        }
    };

    let resp = HealthResponse::healthy("workwise-notification", env!("CARGO_PKG_VERSION"))
        .with_checks(vec![store_check]);
    let status = match resp.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };

    (status, Json(resp))
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|h| h.render())
        .unwrap_or_default()
}
