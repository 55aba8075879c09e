use axum::{
    body::Bytes,
    extract::{Path, State},
};
use serde::Serialize;
use serde_json::Value;

use beacon_core::DeviceSummary;

use super::parse_json_body;
use crate::{
    error::{ApiError, ApiResult},
    response::{success, ApiResponse},
    routes::AppState,
};

/// 注册请求缺少名称时的提示
pub const MISSING_DEVICE_NAME: &str = "Error registering device: device name not found.";

/// 注销结果
#[derive(Debug, Serialize)]
pub struct DeletedDevice {
    pub name: String,
    pub status: &'static str,
}

/// 列出所有设备，最近更新的在前
pub async fn list_devices(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<DeviceSummary>>> {
    let devices = state.registry.list().await?;
    Ok(success(devices.iter().map(|d| d.summary()).collect()))
}

pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<DeviceSummary>> {
    let device = state.registry.get(&id).await?;
    Ok(success(device.summary()))
}

/// 注册设备，请求体 `{"name": "..."}`
pub async fn register_device(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<ApiResponse<DeviceSummary>> {
    let request = parse_json_body(&body)?;
    let name = request
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::BadRequest(MISSING_DEVICE_NAME.to_string()))?;

    let device = state.registry.register(name).await?;
    Ok(success(device.summary()))
}

pub async fn unregister_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<DeletedDevice>> {
    let device = state.registry.unregister(&id).await?;
    Ok(success(DeletedDevice {
        name: device.name,
        status: "deleted",
    }))
}
