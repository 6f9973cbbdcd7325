pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GatewayConfig;
use crate::coordinator::TransferCoordinator;
use state::AppState;

/// Build the gateway router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/v1/accounts", post(handlers::create_account))
        .route("/v1/accounts/{account_id}", get(handlers::get_account))
        .route("/v1/accounts/transfer", post(handlers::transfer))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start HTTP Gateway server
pub async fn run_server(
    config: &GatewayConfig,
    coordinator: Arc<TransferCoordinator>,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(coordinator));
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    println!("🚀 Gateway listening on http://{}", addr);
    println!("📖 API Docs: http://{}/docs", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
