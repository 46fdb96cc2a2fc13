use actix_web::{HttpRequest, HttpResponse};

use super::EnrollmentService;
use crate::models::enrollments::responses::CertificateResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::context::{HandlerResult, load_course, load_user, not_found, storage_failure};

/// 公开的证书核验，无需登录
pub async fn verify_certificate(
    service: &EnrollmentService,
    request: &HttpRequest,
    code: String,
) -> HandlerResult {
    let storage = service.get_storage(request)?;
    let code = code.trim().to_uppercase();

    let enrollment = storage
        .get_enrollment_by_certificate(&code)
        .await
        .map_err(storage_failure("查询证书失败"))?
        .ok_or_else(|| not_found(ErrorCode::CertificateNotFound, "证书不存在"))?;

    let course = load_course(storage.as_ref(), enrollment.course_id).await?;
    let student = load_user(storage.as_ref(), enrollment.student_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CertificateResponse {
            code,
            course_id: course.id,
            course_title: course.title,
            student_name: student.display_label().to_string(),
            completed_at: enrollment.completed_at,
        },
        "证书有效",
    )))
}
