//! # Beacon API
//!
//! 设备注册与函数触发的REST接口。
//!
//! ## API 端点
//!
//! - `GET /api/devices` - 设备列表，最近更新的在前
//! - `POST /api/devices` - 注册设备，请求体 `{"name": "..."}`
//! - `GET /api/devices/{id}` - 设备详情
//! - `DELETE /api/devices/{id}` - 注销设备
//! - `POST /api/run_function` - 将请求体分发到最久未触发的设备
//! - `GET /health` - 健康检查
//! - `GET /metrics` - Prometheus指标（启用时）
//!
//! ## 响应格式
//!
//! 所有响应都使用同一个信封，HTTP状态码与 `status_code` 一致：
//!
//! ```json
//! {"status_code": 200, "data": "function triggered"}
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

use axum::{error_handling::HandleErrorLayer, extract::DefaultBodyLimit, Router};
use tower::ServiceBuilder;

use beacon_core::{ApiConfig, ObservabilityConfig};
use middleware::{
    cors_layer, ensure_envelope, handle_timeout_error, request_logging, timeout_layer,
    trace_layer,
};
pub use routes::{create_routes, AppState};

/// 创建完整的API应用
///
/// 超时返回504，框架层的错误响应（404、405、413）也都使用统一信封。
pub fn create_app(
    state: AppState,
    api_config: &ApiConfig,
    observability: &ObservabilityConfig,
) -> Router {
    let router = create_routes(state, &observability.metrics_endpoint)
        .layer(DefaultBodyLimit::max(api_config.max_request_size_mb * 1024 * 1024))
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer())
                .layer(axum::middleware::map_response(ensure_envelope))
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .layer(timeout_layer(api_config))
                .layer(axum::middleware::from_fn(request_logging)),
        );

    if api_config.cors_enabled {
        router.layer(cors_layer(api_config))
    } else {
        router
    }
}
