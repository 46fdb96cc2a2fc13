use actix_web::{HttpRequest, HttpResponse};

use super::EnrollmentService;
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};
use crate::policies::CoursePolicy;
use crate::services::context::{
    HandlerResult, forbidden, load_course, require_actor, storage_failure,
};

/// 课程花名册
pub async fn list_roster(
    service: &EnrollmentService,
    request: &HttpRequest,
    course_id: i64,
    pagination: PaginationQuery,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    if !CoursePolicy::view_roster(&actor, &course) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "无权查看该课程的学生名单"));
    }

    let (page, size) = pagination.normalized();
    let roster = storage
        .list_course_roster(course_id, page, size)
        .await
        .map_err(storage_failure("查询课程学生名单失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(roster, "查询成功")))
}

/// 当前学生的选课列表
pub async fn list_my_enrollments(
    service: &EnrollmentService,
    request: &HttpRequest,
    pagination: PaginationQuery,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let (page, size) = pagination.normalized();
    let response = storage
        .list_student_enrollments_with_pagination(actor.id, page, size)
        .await
        .map_err(storage_failure("查询选课列表失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
