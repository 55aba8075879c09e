use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::routes::AppState;

/// Prometheus 文本格式的指标
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
