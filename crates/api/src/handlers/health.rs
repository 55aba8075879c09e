use axum::{extract::State, http::StatusCode};
use serde_json::{json, Value};
use tracing::warn;

use crate::{response::ApiResponse, routes::AppState};

/// 进程存活及存储连通性
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<Value> {
    let (status, database) = match state.registry.store().health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!("健康检查时存储不可用: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    ApiResponse::new(
        status,
        json!({
            "status": if status.is_success() { "ok" } else { "degraded" },
            "database": database,
            "service": "beacon",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }),
    )
}
