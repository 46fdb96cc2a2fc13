use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::QuizService;
use super::scoring::{validate_questions, validate_settings};
use crate::models::quizzes::{requests::CreateQuizRequest, responses::QuizListResponse};
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};
use crate::policies::{CoursePolicy, QuizPolicy};
use crate::services::context::{
    HandlerResult, bad_request, course_relation, forbidden, load_course, require_actor,
    storage_failure,
};
use crate::utils::validate::validate_title;

pub async fn list_quizzes(
    service: &QuizService,
    request: &HttpRequest,
    course_id: i64,
    pagination: PaginationQuery,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    let relation = course_relation(storage.as_ref(), &actor, course_id).await?;
    if !CoursePolicy::view_content(&actor, &course, relation) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "无权查看该课程的测验"));
    }

    let (page, size) = pagination.normalized();
    let (quizzes, pagination) = storage
        .list_course_quizzes_with_pagination(course_id, page, size)
        .await
        .map_err(storage_failure("查询测验列表失败"))?;

    let with_answers = QuizPolicy::see_answers(&actor, &course);
    let response = QuizListResponse {
        items: quizzes.iter().map(|q| q.to_view(with_answers)).collect(),
        pagination,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}

pub async fn create_quiz(
    service: &QuizService,
    request: &HttpRequest,
    course_id: i64,
    mut create_request: CreateQuizRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    CoursePolicy::edit(&actor, &course).map_err(|denial| denial.into_response())?;

    create_request.title = create_request.title.trim().to_string();
    validate_title(&create_request.title)
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    validate_questions(&create_request.questions)
        .map_err(|msg| bad_request(ErrorCode::QuizInvalid, msg))?;
    validate_settings(create_request.pass_percentage, create_request.max_attempts)
        .map_err(|msg| bad_request(ErrorCode::QuizInvalid, msg))?;

    let quiz = storage
        .create_quiz(course_id, actor.id, create_request)
        .await
        .map_err(storage_failure("创建测验失败"))?;

    info!("Quiz {} created in course {} by user {}", quiz.id, course_id, actor.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(quiz.to_view(true), "测验创建成功")))
}
