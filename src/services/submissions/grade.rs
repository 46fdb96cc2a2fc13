use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::SubmissionService;
use crate::errors::LmsError;
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::{Denial, SubmissionPolicy};
use crate::services::context::{
    HandlerResult, bad_request, load_assignment, load_course, load_submission, not_found, notify,
    require_actor, storage_failure, student_and_parents,
};
use crate::services::notifications::NotificationMessage;
use crate::utils::validate::validate_score;

pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    grade_request: GradeSubmissionRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let submission = load_submission(storage.as_ref(), submission_id).await?;
    let assignment = load_assignment(storage.as_ref(), submission.assignment_id).await?;
    let course = load_course(storage.as_ref(), assignment.course_id).await?;
    SubmissionPolicy::grade(&actor, &course, &submission).map_err(|denial| denial.into_response())?;

    validate_score(grade_request.score, assignment.max_score)
        .map_err(|msg| bad_request(ErrorCode::ScoreOutOfRange, msg))?;
    let feedback = grade_request
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());

    // 评分在存储层只允许一次，并发评分由状态条件拦截
    let graded = match storage
        .grade_submission(submission_id, actor.id, grade_request.score, feedback)
        .await
    {
        Ok(Some(graded)) => graded,
        Ok(None) => return Err(not_found(ErrorCode::SubmissionNotFound, "提交记录不存在")),
        Err(LmsError::InvalidState(_)) => return Err(Denial::AlreadyGraded.into_response()),
        Err(e) => return Err(storage_failure("评分失败")(e)),
    };
    info!(
        "Submission {} graded by user {}: {}/{}",
        submission_id, actor.id, grade_request.score, assignment.max_score
    );

    let recipients = student_and_parents(storage.as_ref(), graded.student_id).await;
    notify(
        request,
        recipients,
        NotificationMessage::SubmissionGraded {
            submission_id,
            assignment_title: assignment.title.clone(),
            score: grade_request.score,
            max_score: assignment.max_score,
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(graded, "评分成功")))
}
