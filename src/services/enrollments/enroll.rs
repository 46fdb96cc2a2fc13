use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::EnrollmentService;
use crate::errors::LmsError;
use crate::models::ApiResponse;
use crate::policies::{Actor, Denial, EnrollmentPolicy};
use crate::services::context::{
    HandlerResult, load_course, notify, require_user, storage_failure,
};
use crate::services::notifications::NotificationMessage;

pub async fn enroll(service: &EnrollmentService, request: &HttpRequest, course_id: i64) -> HandlerResult {
    let user = require_user(request)?;
    let actor = Actor::from(&user);
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    let existing = storage
        .get_enrollment(course_id, user.id)
        .await
        .map_err(storage_failure("查询选课记录失败"))?;
    EnrollmentPolicy::enroll(&actor, &course, existing.is_some())
        .map_err(|denial| denial.into_response())?;

    // 并发重复选课由唯一索引拦截
    let enrollment = match storage.create_enrollment(course_id, user.id).await {
        Ok(enrollment) => enrollment,
        Err(LmsError::Conflict(_)) => return Err(Denial::AlreadyEnrolled.into_response()),
        Err(e) => return Err(storage_failure("选课失败")(e)),
    };
    info!("Student {} enrolled in course {}", user.id, course_id);

    notify(
        request,
        vec![course.teacher_id],
        NotificationMessage::NewEnrollment {
            enrollment_id: enrollment.id,
            course_title: course.title.clone(),
            student_name: user.display_label().to_string(),
        },
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(enrollment, "选课成功")))
}

