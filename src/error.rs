use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::ErrorResponse;

/// 애플리케이션 에러
///
/// 호출자에게는 코드와 일반화된 메시지만 내려가고, 상세 내용(업스트림 에러
/// 원문, 모델 식별자 등)은 로그에만 남깁니다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("잘못된 요청입니다: {0}")]
    BadRequest(String),

    #[error("내부 에러: {0}")]
    InternalError(String),

    #[error("외부 API 에러: {0}")]
    ExternalApiError(String),
}

impl AppError {
    fn code_message_status(&self) -> (&'static str, String, StatusCode) {
        match self {
            AppError::BadRequest(msg) => (
                "COMMON400",
                format!("잘못된 요청입니다: {}", msg),
                StatusCode::BAD_REQUEST,
            ),
            AppError::InternalError(_) => (
                "COMMON500",
                "서버 에러, 관리자에게 문의 바랍니다.".to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            AppError::ExternalApiError(_) => (
                "CHAT_001",
                "요청을 처리하지 못했습니다. 잠시 후 다시 시도해주세요.".to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message, status) = self.code_message_status();

        match &self {
            AppError::BadRequest(detail) => {
                tracing::info!(code, detail = %detail, "Request rejected")
            }
            AppError::InternalError(detail) | AppError::ExternalApiError(detail) => {
                tracing::error!(code, detail = %detail, "Request failed")
            }
        }

        let body = ErrorResponse {
            is_success: false,
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_common400() {
        let (code, _, status) = AppError::BadRequest("empty".to_string()).code_message_status();
        assert_eq!(code, "COMMON400");
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn external_api_error_is_generic_server_failure() {
        let err = AppError::ExternalApiError("Inference API error: model gpt-x timed out".to_string());
        let (code, message, status) = err.code_message_status();

        assert_eq!(code, "CHAT_001");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        // 업스트림 상세와 모델 식별자는 응답 메시지에 노출되지 않는다.
        assert!(!message.contains("gpt-x"));
        assert!(!message.contains("Inference"));
    }

    #[test]
    fn internal_error_hides_detail() {
        let (_, message, _) =
            AppError::InternalError("stack trace here".to_string()).code_message_status();
        assert!(!message.contains("stack trace"));
    }
}
