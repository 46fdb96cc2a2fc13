use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use tracing::error;
use ts_rs::TS;

use crate::errors::LmsError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 将领域/存储层错误转换为 HTTP 响应
///
/// `context` 会出现在日志与 500 响应中，例如 "Failed to load course"。
pub fn error_response(context: &str, err: &LmsError) -> HttpResponse {
    match err {
        LmsError::NotFound(msg) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg.clone()))
        }
        LmsError::Validation(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg.clone())),
        LmsError::Conflict(msg) | LmsError::InvalidState(msg) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::Conflict, msg.clone()))
        }
        LmsError::Authentication(msg) => HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, msg.clone())),
        LmsError::Authorization(msg) => {
            HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, msg.clone()))
        }
        _ => {
            error!("{}: {}", context, err);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("{context}: {}", err.message()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status_mapping() {
        assert_eq!(
            error_response("ctx", &LmsError::not_found("x")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response("ctx", &LmsError::conflict("x")).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_response("ctx", &LmsError::validation("x")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response("ctx", &LmsError::database_operation("x")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
