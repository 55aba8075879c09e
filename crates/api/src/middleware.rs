use std::time::Duration;

use axum::{
    extract::Request,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    BoxError,
};
use beacon_core::ApiConfig;
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::response::ApiResponse;

pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    info!("开始处理请求: {} {}", method, uri);

    let response = next.run(request).await;
    let duration = start.elapsed();

    info!(
        "完成请求处理: {} {} - 状态: {} - 耗时: {:?}",
        method,
        uri,
        response.status(),
        duration
    );

    response
}

pub fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("忽略无效的CORS来源: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// 请求超时，配合 [`handle_timeout_error`] 使用
pub fn timeout_layer(config: &ApiConfig) -> TimeoutLayer {
    TimeoutLayer::new(Duration::from_secs(config.request_timeout_seconds))
}

/// 将超时转换为统一响应信封
pub async fn handle_timeout_error(err: BoxError) -> ApiResponse<String> {
    if err.is::<Elapsed>() {
        warn!("请求处理超时");
        ApiResponse::new(StatusCode::GATEWAY_TIMEOUT, "请求处理超时".to_string())
    } else {
        error!("请求处理失败: {err}");
        ApiResponse::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "系统内部错误".to_string(),
        )
    }
}

/// 框架层产生的错误响应（405、413等）没有JSON体，补上统一信封
pub async fn ensure_envelope(response: Response) -> Response {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let message = status.canonical_reason().unwrap_or("Error");
    let (mut parts, _) = response.into_parts();
    let (envelope, body) = ApiResponse::new(status, message).into_response().into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    parts.headers.extend(envelope.headers);
    Response::from_parts(parts, body)
}

pub fn trace_layer(
) -> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
}
