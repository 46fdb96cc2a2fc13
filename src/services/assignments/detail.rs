use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::{AssignmentService, validate_max_score};
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::{AssignmentPolicy, CoursePolicy};
use crate::services::context::{
    HandlerResult, bad_request, course_relation, forbidden, load_assignment, load_course,
    not_found, require_actor, storage_failure,
};
use crate::utils::validate::validate_title;

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let assignment = load_assignment(storage.as_ref(), assignment_id).await?;
    let course = load_course(storage.as_ref(), assignment.course_id).await?;
    let relation = course_relation(storage.as_ref(), &actor, course.id).await?;
    if !AssignmentPolicy::view(&actor, &course, relation) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "无权查看该作业"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "查询成功")))
}

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    mut update: UpdateAssignmentRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let assignment = load_assignment(storage.as_ref(), assignment_id).await?;
    let course = load_course(storage.as_ref(), assignment.course_id).await?;
    CoursePolicy::edit(&actor, &course).map_err(|denial| denial.into_response())?;

    if let Some(title) = update.title.as_mut() {
        *title = title.trim().to_string();
        validate_title(title).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }
    if let Some(max_score) = update.max_score {
        validate_max_score(max_score).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    let assignment = storage
        .update_assignment(assignment_id, update)
        .await
        .map_err(storage_failure("更新作业失败"))?
        .ok_or_else(|| not_found(ErrorCode::AssignmentNotFound, "作业不存在"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "作业更新成功")))
}

pub async fn delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let assignment = load_assignment(storage.as_ref(), assignment_id).await?;
    let course = load_course(storage.as_ref(), assignment.course_id).await?;
    if !AssignmentPolicy::manage(&actor, &course) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "无权删除该作业"));
    }

    let deleted = storage
        .delete_assignment(assignment_id)
        .await
        .map_err(storage_failure("删除作业失败"))?;
    if !deleted {
        return Err(not_found(ErrorCode::AssignmentNotFound, "作业不存在"));
    }

    info!("Assignment {} deleted by user {}", assignment_id, actor.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("作业删除成功")))
}
