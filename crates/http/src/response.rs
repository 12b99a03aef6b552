//! Uniform response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Envelope wrapping every response body: `{code, status, message, data}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebResponse<T> {
    pub code: u16,
    pub status: bool,
    pub message: String,
    pub data: T,
}

impl<T> WebResponse<T> {
    /// 200 envelope with message `success`.
    pub fn success(data: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            status: true,
            message: "success".to_string(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for WebResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let body = serde_json::to_value(WebResponse::success(vec!["a"])).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"code": 200, "status": true, "message": "success", "data": ["a"]})
        );
    }

    #[test]
    fn success_maps_to_ok_status() {
        let response = WebResponse::success(()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
