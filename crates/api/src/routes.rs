use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::avatar::AvatarPanel;
use crate::metrics::MetricsSnapshot;
use crate::pipeline::Dashboard;
use crate::state::{DashboardState, LoadStatus, RefreshError};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn router(dashboard: Dashboard) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/refresh", post(refresh))
        .route("/metrics", get(get_metrics))
        .route("/avatar/start", post(avatar_start))
        .route("/avatar/close", post(avatar_close))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(dashboard)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_dashboard(State(dashboard): State<Dashboard>) -> Json<DashboardState> {
    Json(dashboard.snapshot().await)
}

async fn refresh(
    State(dashboard): State<Dashboard>,
) -> Result<(StatusCode, Json<DashboardState>), StatusCode> {
    let status = match dashboard.refresh().await {
        Ok(LoadStatus::Failed) => StatusCode::BAD_GATEWAY,
        Ok(_) => StatusCode::OK,
        Err(RefreshError::AlreadyLoading) => return Err(StatusCode::CONFLICT),
        Err(e) => {
            tracing::error!(error = %e, "Refresh aborted");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Ok((status, Json(dashboard.snapshot().await)))
}

async fn get_metrics(State(dashboard): State<Dashboard>) -> Json<MetricsSnapshot> {
    Json(dashboard.metrics().snapshot())
}

async fn avatar_start(State(dashboard): State<Dashboard>) -> Json<AvatarPanel> {
    Json(dashboard.avatar_started().await)
}

async fn avatar_close(State(dashboard): State<Dashboard>) -> Json<AvatarPanel> {
    Json(dashboard.avatar_closed().await)
}
