use axum::{body::Bytes, extract::State};
use tracing::error;

use beacon_core::FUNCTION_TRIGGERED;

use super::parse_json_body;
use crate::{
    error::{ApiError, ApiResult},
    response::{success, ApiResponse},
    routes::AppState,
};

/// 触发一次远程函数调用，请求体原样转发给选中的设备
pub async fn run_function(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<ApiResponse<&'static str>> {
    let payload = parse_json_body(&body)?;

    // 在独立任务中执行，客户端断开时分发仍会完成确认或撤销
    let coordinator = state.coordinator.clone();
    let receipt = tokio::spawn(async move { coordinator.dispatch(&payload).await })
        .await
        .map_err(|e| {
            error!("分发任务异常退出: {e}");
            ApiError::Internal(e.to_string())
        })??;

    tracing::debug!(
        "函数已触发到设备 {} ({})",
        receipt.device_name,
        receipt.device_id
    );
    Ok(success(FUNCTION_TRIGGERED))
}
