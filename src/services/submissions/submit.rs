use actix_web::{HttpRequest, HttpResponse};
use chrono::Utc;
use tracing::info;

use super::SubmissionService;
use crate::errors::LmsError;
use crate::models::submissions::requests::SubmitAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::{Denial, SubmissionPolicy};
use crate::services::context::{
    HandlerResult, bad_request, course_relation, load_assignment, not_found, require_actor,
    storage_failure,
};

pub async fn submit_assignment(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    mut submit_request: SubmitAssignmentRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let assignment = load_assignment(storage.as_ref(), assignment_id).await?;
    let relation = course_relation(storage.as_ref(), &actor, assignment.course_id).await?;
    let existing = storage
        .get_submission(assignment_id, actor.id)
        .await
        .map_err(storage_failure("查询提交记录失败"))?;

    let status = SubmissionPolicy::submit(&actor, &assignment, relation, existing.as_ref(), Utc::now())
        .map_err(|denial| denial.into_response())?;

    submit_request.content = submit_request
        .content
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    submit_request.attachment_token = submit_request
        .attachment_token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if submit_request.content.is_none() && submit_request.attachment_token.is_none() {
        return Err(bad_request(ErrorCode::ValidationFailed, "提交内容和附件不能同时为空"));
    }

    // 附件必须是本人上传的文件
    if let Some(token) = &submit_request.attachment_token {
        let file = storage
            .get_file_by_token(token)
            .await
            .map_err(storage_failure("查询附件失败"))?;
        if !file.is_some_and(|f| f.user_id == actor.id) {
            return Err(not_found(ErrorCode::FileNotFound, "附件不存在"));
        }
    }

    let submission = match storage
        .upsert_submission(assignment_id, actor.id, submit_request, status)
        .await
    {
        Ok(submission) => submission,
        Err(LmsError::InvalidState(_)) => return Err(Denial::AlreadyGraded.into_response()),
        Err(e) => return Err(storage_failure("提交作业失败")(e)),
    };

    info!(
        "Student {} submitted assignment {} ({})",
        actor.id, assignment_id, submission.status
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "提交成功")))
}
