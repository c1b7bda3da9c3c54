//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use escala_shared::AppError;
use serde_json::json;
use tracing::error;

/// Converts an application error into a JSON response.
///
/// Server-side failures are logged and answered with a generic message.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() && !err.is_recoverable() {
        error!(error = %err, "Request failed");
        "An error occurred".to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code().to_lowercase(),
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::NotFound("schedule".into()), StatusCode::NOT_FOUND)]
    #[case(AppError::Validation("month 13".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::NothingToExport("empty".into()), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(AppError::ExternalService("down".into()), StatusCode::BAD_GATEWAY)]
    #[case(AppError::Storage("disk full".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_error_status(#[case] err: AppError, #[case] expected: StatusCode) {
        assert_eq!(error_response(&err).status(), expected);
    }

    #[tokio::test]
    async fn test_internal_error_message_hidden() {
        let response = error_response(&AppError::Internal("pdf object 12 broken".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "internal_error");
        assert_eq!(json["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_upstream_error_message_kept() {
        let response = error_response(&AppError::ExternalService("timeout".to_string()));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "external_service_error");
        assert!(json["message"].as_str().unwrap().contains("timeout"));
    }
}
