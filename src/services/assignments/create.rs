use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::{AssignmentService, validate_max_score};
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::CoursePolicy;
use crate::services::context::{
    HandlerResult, bad_request, load_course, require_actor, storage_failure,
};
use crate::utils::validate::validate_title;

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    course_id: i64,
    mut create_request: CreateAssignmentRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    CoursePolicy::edit(&actor, &course).map_err(|denial| denial.into_response())?;

    create_request.title = create_request.title.trim().to_string();
    validate_title(&create_request.title)
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    validate_max_score(create_request.max_score)
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;

    let assignment = storage
        .create_assignment(course_id, actor.id, create_request)
        .await
        .map_err(storage_failure("创建作业失败"))?;

    info!("Assignment {} created in course {} by user {}", assignment.id, course_id, actor.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(assignment, "作业创建成功")))
}
