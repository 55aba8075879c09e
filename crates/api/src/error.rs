use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use beacon_core::{BeaconError, NO_DEVICE_AVAILABLE};
use tracing::error;

use crate::response::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Beacon(#[from] BeaconError),

    #[error("{0}")]
    BadRequest(String),

    #[error("内部服务器错误: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Beacon(e) => match e {
                BeaconError::InvalidDeviceId(_)
                | BeaconError::Validation(_)
                | BeaconError::NoDeviceAvailable => StatusCode::BAD_REQUEST,
                BeaconError::DeviceNotFound { .. } => StatusCode::NOT_FOUND,
                BeaconError::DuplicateDeviceName { .. } => StatusCode::CONFLICT,
                BeaconError::MessageQueue(_) | BeaconError::DispatchContention { .. } => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                BeaconError::PublishTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                BeaconError::PostDispatchPersist { .. }
                | BeaconError::Database(_)
                | BeaconError::DatabaseOperation(_)
                | BeaconError::Serialization(_)
                | BeaconError::Configuration(_)
                | BeaconError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Beacon(BeaconError::NoDeviceAvailable) => NO_DEVICE_AVAILABLE.to_string(),
            // 存储细节不暴露给调用方
            ApiError::Beacon(
                BeaconError::Database(_)
                | BeaconError::DatabaseOperation(_)
                | BeaconError::Configuration(_),
            ) => "系统内部错误".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), "请求处理失败: {self}");
        }
        ApiResponse::new(status, self.message()).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
