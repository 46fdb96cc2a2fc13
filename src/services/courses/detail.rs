use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::CourseService;
use crate::models::courses::requests::UpdateCourseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::CoursePolicy;
use crate::services::context::{
    HandlerResult, bad_request, forbidden, load_course, not_found, require_actor, storage_failure,
};
use crate::utils::validate::validate_title;

pub async fn get_course(service: &CourseService, request: &HttpRequest, course_id: i64) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    if !CoursePolicy::view(&actor, &course) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "无权查看该课程"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(course, "查询成功")))
}

pub async fn update_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    mut update: UpdateCourseRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    CoursePolicy::edit(&actor, &course).map_err(|denial| denial.into_response())?;

    if let Some(title) = update.title.as_mut() {
        *title = title.trim().to_string();
        validate_title(title).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    let course = storage
        .update_course(course_id, update)
        .await
        .map_err(storage_failure("更新课程失败"))?
        .ok_or_else(|| not_found(ErrorCode::CourseNotFound, "课程不存在"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(course, "课程更新成功")))
}

pub async fn delete_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    if !CoursePolicy::manage(&actor, &course) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "无权删除该课程"));
    }

    let deleted = storage
        .delete_course(course_id)
        .await
        .map_err(storage_failure("删除课程失败"))?;
    if !deleted {
        return Err(not_found(ErrorCode::CourseNotFound, "课程不存在"));
    }

    info!("Course {} deleted by user {}", course_id, actor.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("课程删除成功")))
}
