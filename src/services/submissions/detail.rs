use actix_web::{HttpRequest, HttpResponse};

use super::SubmissionService;
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::SubmissionPolicy;
use crate::services::context::{
    HandlerResult, forbidden, is_linked_parent, load_assignment, load_course, load_submission,
    require_actor,
};

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let submission = load_submission(storage.as_ref(), submission_id).await?;
    let assignment = load_assignment(storage.as_ref(), submission.assignment_id).await?;
    let course = load_course(storage.as_ref(), assignment.course_id).await?;

    let linked_parent = if actor.is_parent() {
        is_linked_parent(storage.as_ref(), actor.id, submission.student_id).await?
    } else {
        false
    };
    if !SubmissionPolicy::view(&actor, &course, &submission, linked_parent) {
        return Err(forbidden(ErrorCode::Forbidden, "无权查看该提交"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "查询成功")))
}
