pub mod devices;
pub mod dispatch;
pub mod health;
pub mod metrics;

use axum::body::Bytes;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;

/// 未匹配任何路由
pub async fn not_found() -> ApiResponse<&'static str> {
    ApiResponse::new(axum::http::StatusCode::NOT_FOUND, "资源不存在")
}

/// 解析请求体，不要求 Content-Type；空请求体视为空对象
pub(crate) fn parse_json_body(body: &Bytes) -> ApiResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("请求体不是有效的JSON: {e}")))
}
