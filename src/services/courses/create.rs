use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::CourseService;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::context::{
    HandlerResult, bad_request, forbidden, load_user, require_actor, storage_failure,
};
use crate::utils::validate::validate_title;

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    mut create_request: CreateCourseRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    create_request.title = create_request.title.trim().to_string();
    validate_title(&create_request.title)
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;

    // 教师只能为自己创建课程，管理员必须指定一名教师
    let teacher_id = match actor.role {
        UserRole::Teacher => actor.id,
        UserRole::Admin => {
            let teacher_id = create_request
                .teacher_id
                .ok_or_else(|| bad_request(ErrorCode::ValidationFailed, "请指定授课教师"))?;
            let teacher = load_user(storage.as_ref(), teacher_id).await?;
            if teacher.role != UserRole::Teacher {
                return Err(bad_request(ErrorCode::ValidationFailed, "指定的用户不是教师"));
            }
            teacher.id
        }
        _ => {
            return Err(forbidden(ErrorCode::CoursePermissionDenied, "只有教师或管理员可以创建课程"));
        }
    };

    let course = storage
        .create_course(teacher_id, create_request)
        .await
        .map_err(storage_failure("创建课程失败"))?;

    info!("Course {} created by user {} for teacher {}", course.id, actor.id, teacher_id);
    Ok(HttpResponse::Created().json(ApiResponse::success(course, "课程创建成功")))
}
