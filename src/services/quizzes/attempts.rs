use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::QuizService;
use super::scoring::{grade_quiz, validate_answers};
use crate::errors::LmsError;
use crate::models::quizzes::{requests::SubmitAttemptRequest, responses::QuizAttemptListResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::{CoursePolicy, Denial, QuizPolicy};
use crate::services::context::{
    HandlerResult, bad_request, conflict, course_relation, forbidden, load_course, load_quiz,
    notify, require_actor, storage_failure, student_and_parents,
};
use crate::services::notifications::NotificationMessage;

pub async fn submit_attempt(
    service: &QuizService,
    request: &HttpRequest,
    quiz_id: i64,
    attempt_request: SubmitAttemptRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let quiz = load_quiz(storage.as_ref(), quiz_id).await?;
    let relation = course_relation(storage.as_ref(), &actor, quiz.course_id).await?;
    let used = storage
        .count_quiz_attempts(quiz_id, actor.id)
        .await
        .map_err(storage_failure("统计作答次数失败"))?;
    QuizPolicy::attempt(&actor, &quiz, relation.enrolled, used)
        .map_err(|denial| denial.into_response())?;

    validate_answers(&quiz, &attempt_request.answers)
        .map_err(|msg| bad_request(ErrorCode::QuizAnswerInvalid, msg))?;
    let score = grade_quiz(&quiz, &attempt_request.answers);

    // 存储层在事务内再次检查次数上限
    let attempt = match storage
        .create_quiz_attempt(quiz_id, actor.id, attempt_request.answers, score, quiz.max_attempts)
        .await
    {
        Ok(Some(attempt)) => attempt,
        Ok(None) => return Err(Denial::AttemptLimitReached.into_response()),
        Err(LmsError::Conflict(_)) => {
            return Err(conflict(ErrorCode::Conflict, "作答提交过于频繁，请重试"));
        }
        Err(e) => return Err(storage_failure("保存作答失败")(e)),
    };
    info!(
        "Student {} attempt #{} on quiz {}: {:.2}%",
        actor.id, attempt.attempt_number, quiz_id, attempt.percentage
    );

    let recipients = student_and_parents(storage.as_ref(), actor.id).await;
    notify(
        request,
        recipients,
        NotificationMessage::QuizScored {
            attempt_id: attempt.id,
            quiz_title: quiz.title.clone(),
            percentage: attempt.percentage,
            passed: attempt.passed,
        },
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(attempt, "作答已提交")))
}

/// 学生只看自己的作答，课程管理者看全部
pub async fn list_attempts(service: &QuizService, request: &HttpRequest, quiz_id: i64) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let quiz = load_quiz(storage.as_ref(), quiz_id).await?;
    let course = load_course(storage.as_ref(), quiz.course_id).await?;

    let student_filter = if CoursePolicy::manage(&actor, &course) {
        None
    } else if actor.is_student() {
        Some(actor.id)
    } else {
        return Err(forbidden(ErrorCode::Forbidden, "无权查看该测验的作答记录"));
    };

    let items = storage
        .list_quiz_attempts(quiz_id, student_filter)
        .await
        .map_err(storage_failure("查询作答记录失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuizAttemptListResponse { items },
        "查询成功",
    )))
}
