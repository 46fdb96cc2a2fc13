use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::{ParentLinkService, link_conflict_response};
use crate::models::parent_links::{
    entities::LinkSource,
    requests::{AdminCreateLinkRequest, ParentLinkListParams},
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::context::{
    HandlerResult, bad_request, load_user, not_found, require_actor, storage_failure,
};

pub async fn list_links(
    service: &ParentLinkService,
    request: &HttpRequest,
    params: ParentLinkListParams,
) -> HandlerResult {
    let storage = service.get_storage(request)?;
    let (page, size) = params.pagination.normalized();

    let response = storage
        .list_links_with_pagination(params.status, page, size)
        .await
        .map_err(storage_failure("查询关联列表失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}

/// 管理员直接建立已生效的关联
pub async fn create_link(
    service: &ParentLinkService,
    request: &HttpRequest,
    create_request: AdminCreateLinkRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let parent = load_user(storage.as_ref(), create_request.parent_id).await?;
    if parent.role != UserRole::Parent {
        return Err(bad_request(ErrorCode::ValidationFailed, "指定的用户不是家长"));
    }
    let student = load_user(storage.as_ref(), create_request.student_id).await?;
    if student.role != UserRole::Student {
        return Err(bad_request(ErrorCode::TargetNotStudent, "指定的用户不是学生"));
    }

    let link = storage
        .create_direct_link(parent.id, student.id, LinkSource::Admin)
        .await
        .map_err(storage_failure("建立关联失败"))?
        .map_err(link_conflict_response)?;

    info!(
        "Admin {} linked parent {} to student {}",
        actor.id, parent.id, student.id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(link, "关联已建立")))
}

pub async fn delete_link(
    service: &ParentLinkService,
    request: &HttpRequest,
    link_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let deleted = storage
        .delete_link(link_id)
        .await
        .map_err(storage_failure("删除关联失败"))?;
    if !deleted {
        return Err(not_found(ErrorCode::LinkNotFound, "关联不存在"));
    }

    info!("Admin {} deleted parent link {}", actor.id, link_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("关联已删除")))
}
