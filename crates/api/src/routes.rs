use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use beacon_dispatcher::{DeviceRegistry, DispatchCoordinator};

use crate::handlers::{
    devices::{get_device, list_devices, register_device, unregister_device},
    dispatch::run_function,
    health::health_check,
    metrics::render_metrics,
    not_found,
};

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub registry: DeviceRegistry,
    pub coordinator: Arc<DispatchCoordinator>,
    /// 未安装Prometheus记录器时为空
    pub metrics: Option<PrometheusHandle>,
}

/// 创建API路由
pub fn create_routes(state: AppState, metrics_endpoint: &str) -> Router {
    let mut router = Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 设备管理API
        .route("/api/devices", get(list_devices).post(register_device))
        .route(
            "/api/devices/{id}",
            get(get_device).delete(unregister_device),
        )
        // 函数触发
        .route("/api/run_function", post(run_function));

    if state.metrics.is_some() {
        router = router.route(metrics_endpoint, get(render_metrics));
    }

    router.fallback(not_found).with_state(state)
}
