use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// 统一响应信封，HTTP状态码与 `status_code` 一致
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: T,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn new(status: StatusCode, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
        }
    }

    pub fn success(data: T) -> Self {
        Self::new(StatusCode::OK, data)
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

pub fn success<T: Serialize>(data: T) -> ApiResponse<T> {
    ApiResponse::success(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_serialization() {
        let response = ApiResponse::success("function triggered");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"status_code": 200, "data": "function triggered"})
        );
    }

    #[test]
    fn test_status_mirrors_envelope() {
        let response = ApiResponse::new(StatusCode::CONFLICT, "duplicate").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_api_response_deserialization() {
        let response: ApiResponse<Vec<String>> =
            serde_json::from_str(r#"{"status_code": 200, "data": ["a", "b"]}"#).unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.data, vec!["a", "b"]);
    }
}
