//! 服务层共用的请求上下文与资源加载
//!
//! 各操作内部以 `Result<HttpResponse, HttpResponse>` 书写，`Err` 即提前返回的错误响应，
//! 由 [`respond`] 统一展开。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::debug;

use crate::errors::LmsError;
use crate::middlewares::RequireJWT;
use crate::models::common::response::error_response;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::entities::Assignment,
    courses::entities::Course,
    enrollments::entities::Enrollment,
    parent_links::entities::LinkStatus,
    quizzes::entities::Quiz,
    submissions::entities::Submission,
    users::entities::User,
};
use crate::policies::{Actor, CourseRelation};
use crate::services::notifications::{NotificationDispatcher, NotificationMessage};
use crate::storage::Storage;

pub(crate) type HandlerResult = Result<HttpResponse, HttpResponse>;

pub(crate) fn respond(result: HandlerResult) -> ActixResult<HttpResponse> {
    Ok(result.unwrap_or_else(|response| response))
}

pub(crate) fn storage_from_request(request: &HttpRequest) -> Result<Arc<dyn Storage>, HttpResponse> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Storage not configured",
            ))
        })
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

pub(crate) fn require_actor(request: &HttpRequest) -> Result<Actor, HttpResponse> {
    RequireJWT::actor(request).ok_or_else(unauthorized)
}

pub(crate) fn require_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(unauthorized)
}

/// 存储层错误转响应，`context` 写入日志
pub(crate) fn storage_failure(context: &'static str) -> impl Fn(LmsError) -> HttpResponse {
    move |err| error_response(context, &err)
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn forbidden(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

pub(crate) async fn load_user(storage: &dyn Storage, user_id: i64) -> Result<User, HttpResponse> {
    storage
        .get_user_by_id(user_id)
        .await
        .map_err(storage_failure("Failed to load user"))?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "用户不存在"))
}

pub(crate) async fn load_course(storage: &dyn Storage, course_id: i64) -> Result<Course, HttpResponse> {
    storage
        .get_course_by_id(course_id)
        .await
        .map_err(storage_failure("Failed to load course"))?
        .ok_or_else(|| not_found(ErrorCode::CourseNotFound, "课程不存在"))
}

pub(crate) async fn load_enrollment(
    storage: &dyn Storage,
    enrollment_id: i64,
) -> Result<Enrollment, HttpResponse> {
    storage
        .get_enrollment_by_id(enrollment_id)
        .await
        .map_err(storage_failure("Failed to load enrollment"))?
        .ok_or_else(|| not_found(ErrorCode::EnrollmentNotFound, "选课记录不存在"))
}

pub(crate) async fn load_assignment(
    storage: &dyn Storage,
    assignment_id: i64,
) -> Result<Assignment, HttpResponse> {
    storage
        .get_assignment_by_id(assignment_id)
        .await
        .map_err(storage_failure("Failed to load assignment"))?
        .ok_or_else(|| not_found(ErrorCode::AssignmentNotFound, "作业不存在"))
}

pub(crate) async fn load_submission(
    storage: &dyn Storage,
    submission_id: i64,
) -> Result<Submission, HttpResponse> {
    storage
        .get_submission_by_id(submission_id)
        .await
        .map_err(storage_failure("Failed to load submission"))?
        .ok_or_else(|| not_found(ErrorCode::SubmissionNotFound, "提交记录不存在"))
}

pub(crate) async fn load_quiz(storage: &dyn Storage, quiz_id: i64) -> Result<Quiz, HttpResponse> {
    storage
        .get_quiz_by_id(quiz_id)
        .await
        .map_err(storage_failure("Failed to load quiz"))?
        .ok_or_else(|| not_found(ErrorCode::QuizNotFound, "测验不存在"))
}

/// 家长与学生之间是否存在已生效的关联
pub(crate) async fn is_linked_parent(
    storage: &dyn Storage,
    parent_id: i64,
    student_id: i64,
) -> Result<bool, HttpResponse> {
    let link = storage
        .get_link(parent_id, student_id)
        .await
        .map_err(storage_failure("Failed to load parent link"))?;
    Ok(link.is_some_and(|l| l.status == LinkStatus::Active))
}

/// 查询操作者与课程的关系（学生是否选课、家长的孩子是否选课）
pub(crate) async fn course_relation(
    storage: &dyn Storage,
    actor: &Actor,
    course_id: i64,
) -> Result<CourseRelation, HttpResponse> {
    let mut relation = CourseRelation::default();

    if actor.is_student() {
        relation.enrolled = storage
            .get_enrollment(course_id, actor.id)
            .await
            .map_err(storage_failure("Failed to load enrollment"))?
            .is_some();
    } else if actor.is_parent() {
        let children = storage
            .list_links_for_parent(actor.id, Some(LinkStatus::Active))
            .await
            .map_err(storage_failure("Failed to load linked students"))?;
        for view in children {
            let enrolled = storage
                .get_enrollment(course_id, view.link.student_id)
                .await
                .map_err(storage_failure("Failed to load enrollment"))?
                .is_some();
            if enrolled {
                relation.parent_of_enrolled = true;
                break;
            }
        }
    }

    Ok(relation)
}

/// 学生本人与其已关联的家长
pub(crate) async fn student_and_parents(storage: &dyn Storage, student_id: i64) -> Vec<i64> {
    let mut recipients = vec![student_id];
    match storage.active_parent_ids(student_id).await {
        Ok(parents) => recipients.extend(parents),
        Err(e) => tracing::warn!("Failed to load parents of student {}: {}", student_id, e),
    }
    recipients
}

/// 投递通知；未配置分发器时（例如单元测试）直接跳过
pub(crate) async fn notify(request: &HttpRequest, recipients: Vec<i64>, message: NotificationMessage) {
    match request.app_data::<web::Data<NotificationDispatcher>>() {
        Some(dispatcher) => dispatcher.dispatch(recipients, message).await,
        None => debug!("Notification dispatcher not configured, dropping {:?}", message),
    }
}
