use std::sync::Arc;

use workwise_notification::config::AppConfig;
use workwise_notification::services::NotificationService;
use workwise_notification::{build_store, router, AppState};
use workwise_shared::gateway::JwtGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    workwise_shared::middleware::init_tracing("workwise-notification");

    let config = AppConfig::load()?;
    let port = config.port;

    let metrics_handle = workwise_shared::middleware::init_metrics()?;

    let store = build_store(&config)?;
    let notifications = NotificationService::new(store).with_recent_limit(config.recent_limit);
    let gateway = Arc::new(JwtGateway::new(&config.jwt_secret));

    let state = Arc::new(AppState::new(notifications, gateway).with_metrics(metrics_handle));
    let app = router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, store = ?config.store, "workwise-notification starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
