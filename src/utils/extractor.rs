//! 路径参数提取器
//!
//! 路径中的 ID 必须是正整数，令牌类参数只允许安全字符；不合法时直接返回 400。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(name: &str) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("路径参数 {name} 无效"),
    ));
    InternalError::from_response(format!("invalid path parameter: {name}"), response).into()
}

fn parse_positive_id(req: &HttpRequest, name: &str) -> Option<i64> {
    req.match_info()
        .get(name)
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|id| *id > 0)
}

fn parse_token(req: &HttpRequest, name: &str, max_len: usize) -> Option<String> {
    req.match_info()
        .get(name)
        .filter(|raw| {
            !raw.is_empty()
                && raw.len() <= max_len
                && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
        .map(str::to_string)
}

macro_rules! define_safe_id {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_id(req, $param).map($name).ok_or_else(|| bad_path_param($param)))
                }
            }
        )*
    };
}

macro_rules! define_safe_token {
    ($($name:ident => $param:literal, $max_len:expr),* $(,)?) => {
        $(
            #[derive(Debug, Clone)]
            pub struct $name(pub String);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_token(req, $param, $max_len).map($name).ok_or_else(|| bad_path_param($param)))
                }
            }
        )*
    };
}

define_safe_id! {
    SafeUserId => "user_id",
    SafeStudentId => "student_id",
    SafeCourseId => "course_id",
    SafeEnrollmentId => "enrollment_id",
    SafeAssignmentId => "assignment_id",
    SafeSubmissionId => "submission_id",
    SafeQuizId => "quiz_id",
    SafeBadgeId => "badge_id",
    SafeLinkId => "link_id",
    SafeNotificationId => "notification_id",
}

define_safe_token! {
    SafeFileToken => "token", 64,
    SafeCertificateCode => "code", 64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_positive_id_required() {
        let req = TestRequest::default()
            .param("course_id", "42")
            .to_http_request();
        let SafeCourseId(id) = SafeCourseId::extract(&req).await.unwrap();
        assert_eq!(id, 42);

        for raw in ["0", "-3", "abc"] {
            let req = TestRequest::default().param("course_id", raw).to_http_request();
            assert!(SafeCourseId::extract(&req).await.is_err());
        }
    }

    #[actix_web::test]
    async fn test_token_rejects_path_characters() {
        let req = TestRequest::default()
            .param("code", "CERT-ABC123")
            .to_http_request();
        assert!(SafeCertificateCode::extract(&req).await.is_ok());

        let req = TestRequest::default().param("code", "../etc").to_http_request();
        assert!(SafeCertificateCode::extract(&req).await.is_err());
    }
}
