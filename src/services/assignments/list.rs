use actix_web::{HttpRequest, HttpResponse};

use super::AssignmentService;
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};
use crate::policies::AssignmentPolicy;
use crate::services::context::{
    HandlerResult, course_relation, forbidden, load_course, require_actor, storage_failure,
};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    course_id: i64,
    pagination: PaginationQuery,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    let relation = course_relation(storage.as_ref(), &actor, course_id).await?;
    if !AssignmentPolicy::view(&actor, &course, relation) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "无权查看该课程的作业"));
    }

    let (page, size) = pagination.normalized();
    let response = storage
        .list_course_assignments_with_pagination(course_id, page, size)
        .await
        .map_err(storage_failure("查询作业列表失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
