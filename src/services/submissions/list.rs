use actix_web::{HttpRequest, HttpResponse};

use super::SubmissionService;
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};
use crate::policies::AssignmentPolicy;
use crate::services::context::{
    HandlerResult, forbidden, load_assignment, load_course, require_actor, storage_failure,
};

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    pagination: PaginationQuery,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let assignment = load_assignment(storage.as_ref(), assignment_id).await?;
    let course = load_course(storage.as_ref(), assignment.course_id).await?;
    if !AssignmentPolicy::manage(&actor, &course) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "无权查看该作业的提交"));
    }

    let (page, size) = pagination.normalized();
    let response = storage
        .list_assignment_submissions_with_pagination(assignment_id, page, size)
        .await
        .map_err(storage_failure("查询提交列表失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
