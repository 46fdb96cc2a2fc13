use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::EnrollmentService;
use crate::models::enrollments::requests::UpdateProgressRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::{Actor, EnrollmentPolicy};
use crate::services::context::{
    HandlerResult, forbidden, load_course, load_enrollment, not_found, notify, require_user,
    require_actor, storage_failure, student_and_parents,
};
use crate::services::notifications::NotificationMessage;

/// 学生上报学习进度，达到 100 时完成课程并签发证书
pub async fn update_progress(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment_id: i64,
    progress_request: UpdateProgressRequest,
) -> HandlerResult {
    let user = require_user(request)?;
    let storage = service.get_storage(request)?;

    let enrollment = load_enrollment(storage.as_ref(), enrollment_id).await?;
    if !EnrollmentPolicy::update_progress(&Actor::from(&user), &enrollment) {
        return Err(forbidden(ErrorCode::Forbidden, "只能更新自己的学习进度"));
    }

    let update = storage
        .record_progress(enrollment_id, progress_request.progress)
        .await
        .map_err(storage_failure("更新学习进度失败"))?
        .ok_or_else(|| not_found(ErrorCode::EnrollmentNotFound, "选课记录不存在"))?;

    if update.newly_completed {
        let course = load_course(storage.as_ref(), update.enrollment.course_id).await?;
        info!("Student {} completed course {}", user.id, course.id);

        if let Some(code) = update.enrollment.certificate_code.clone() {
            let recipients = student_and_parents(storage.as_ref(), user.id).await;
            notify(
                request,
                recipients,
                NotificationMessage::CourseCompleted {
                    enrollment_id,
                    course_title: course.title,
                    student_name: user.display_label().to_string(),
                    certificate_code: code,
                },
            )
            .await;
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(update.enrollment, "学习进度已更新")))
}

/// 退课：学生本人或管理员
pub async fn drop_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let enrollment = load_enrollment(storage.as_ref(), enrollment_id).await?;
    if !EnrollmentPolicy::drop(&actor, &enrollment) {
        return Err(forbidden(ErrorCode::Forbidden, "无权退选该课程"));
    }

    let deleted = storage
        .delete_enrollment(enrollment_id)
        .await
        .map_err(storage_failure("退课失败"))?;
    if !deleted {
        return Err(not_found(ErrorCode::EnrollmentNotFound, "选课记录不存在"));
    }

    info!(
        "Enrollment {} (course {}, student {}) dropped by user {}",
        enrollment_id, enrollment.course_id, enrollment.student_id, actor.id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("退课成功")))
}
