use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::QuizService;
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::{CoursePolicy, QuizPolicy};
use crate::services::context::{
    HandlerResult, course_relation, forbidden, load_course, load_quiz, not_found, require_actor,
    storage_failure,
};

/// 非课程管理者看不到正确答案
pub async fn get_quiz(service: &QuizService, request: &HttpRequest, quiz_id: i64) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let quiz = load_quiz(storage.as_ref(), quiz_id).await?;
    let course = load_course(storage.as_ref(), quiz.course_id).await?;
    let relation = course_relation(storage.as_ref(), &actor, course.id).await?;
    if !CoursePolicy::view_content(&actor, &course, relation) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "无权查看该测验"));
    }

    let view = quiz.to_view(QuizPolicy::see_answers(&actor, &course));
    Ok(HttpResponse::Ok().json(ApiResponse::success(view, "查询成功")))
}

pub async fn delete_quiz(service: &QuizService, request: &HttpRequest, quiz_id: i64) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let quiz = load_quiz(storage.as_ref(), quiz_id).await?;
    let course = load_course(storage.as_ref(), quiz.course_id).await?;
    if !CoursePolicy::manage(&actor, &course) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "无权删除该测验"));
    }

    let deleted = storage
        .delete_quiz(quiz_id)
        .await
        .map_err(storage_failure("删除测验失败"))?;
    if !deleted {
        return Err(not_found(ErrorCode::QuizNotFound, "测验不存在"));
    }

    info!("Quiz {} deleted by user {}", quiz_id, actor.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("测验删除成功")))
}
