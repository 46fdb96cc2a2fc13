use actix_web::{HttpRequest, HttpResponse};

use super::CourseService;
use crate::models::ApiResponse;
use crate::models::courses::{
    entities::CourseStatus,
    requests::{CourseListParams, CourseListQuery},
};
use crate::models::users::entities::UserRole;
use crate::services::context::{HandlerResult, require_actor, storage_failure};

pub async fn list_courses(
    service: &CourseService,
    request: &HttpRequest,
    params: CourseListParams,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;
    let (page, size) = params.pagination.normalized();

    let mut query = CourseListQuery {
        page,
        size,
        status: params.status,
        teacher_id: params.teacher_id,
        search: params.search,
    };

    match actor.role {
        UserRole::Admin => {}
        // 教师只看自己的课程
        UserRole::Teacher => query.teacher_id = Some(actor.id),
        // 学生与家长只能浏览已发布的课程目录
        UserRole::Student | UserRole::Parent => query.status = Some(CourseStatus::Published),
    }

    let response = storage
        .list_courses_with_pagination(query)
        .await
        .map_err(storage_failure("查询课程列表失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
