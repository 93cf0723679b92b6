/// JSON response helpers shared by all route handlers
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Wrap payload data in the standard success envelope
pub fn success_response<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "data": data,
        })),
    )
        .into_response()
}

/// Standard error envelope with an explicit status code
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "success": false,
            "error": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_status() {
        let response = success_response(serde_json::json!({"ok": true}));
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_response_status() {
        let response = error_response(StatusCode::NOT_FOUND, "Recipient not found: carol");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
