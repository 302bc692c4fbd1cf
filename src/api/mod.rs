//! REST API for swap estimations

mod estimate;

pub use estimate::{EstimateRequest, EstimateResponse};

use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::ServerConfig;
use crate::estimator::EstimateService;

/// Start the API server
pub async fn start_server(
    service: Arc<EstimateService>,
    config: &ServerConfig,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = create_app(service, config.enable_cors);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("API server listening on {}", config.bind_address);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(handle)
}

/// Create the API application
pub fn create_app(service: Arc<EstimateService>, enable_cors: bool) -> Router {
    let state = ApiState::new(service);

    let app = Router::new()
        .route("/estimate", get(estimate::estimate_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    if enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Health check handler
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "service": "univ2-estimator"
    }))
}

/// Shared API state
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<EstimateService>,
}

impl ApiState {
    pub fn new(service: Arc<EstimateService>) -> Self {
        Self { service }
    }
}
