//! 徽章目录维护

use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::BadgeService;
use crate::errors::LmsError;
use crate::models::badges::requests::{CreateBadgeRequest, UpdateBadgeRequest};
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};
use crate::policies::BadgePolicy;
use crate::services::context::{
    HandlerResult, bad_request, conflict, forbidden, not_found, require_actor, storage_failure,
};
use crate::utils::validate::validate_title;

fn badge_conflict(context: &'static str) -> impl Fn(LmsError) -> HttpResponse {
    move |err| match err {
        LmsError::Conflict(_) => conflict(ErrorCode::BadgeAlreadyExists, "徽章名称已存在"),
        other => storage_failure(context)(other),
    }
}

pub async fn list_badges(
    service: &BadgeService,
    request: &HttpRequest,
    pagination: PaginationQuery,
) -> HandlerResult {
    let storage = service.get_storage(request)?;
    let (page, size) = pagination.normalized();

    let response = storage
        .list_badges_with_pagination(page, size)
        .await
        .map_err(storage_failure("查询徽章列表失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}

pub async fn create_badge(
    service: &BadgeService,
    request: &HttpRequest,
    mut create_request: CreateBadgeRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    if !BadgePolicy::manage(&actor) {
        return Err(forbidden(ErrorCode::Forbidden, "只有管理员可以创建徽章"));
    }
    let storage = service.get_storage(request)?;

    create_request.name = create_request.name.trim().to_string();
    validate_title(&create_request.name)
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;

    let badge = storage
        .create_badge(actor.id, create_request)
        .await
        .map_err(badge_conflict("创建徽章失败"))?;

    info!("Badge {} ({}) created by admin {}", badge.id, badge.name, actor.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(badge, "徽章创建成功")))
}

pub async fn update_badge(
    service: &BadgeService,
    request: &HttpRequest,
    badge_id: i64,
    mut update: UpdateBadgeRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    if !BadgePolicy::manage(&actor) {
        return Err(forbidden(ErrorCode::Forbidden, "只有管理员可以修改徽章"));
    }
    let storage = service.get_storage(request)?;

    if let Some(name) = update.name.as_mut() {
        *name = name.trim().to_string();
        validate_title(name).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    let badge = storage
        .update_badge(badge_id, update)
        .await
        .map_err(badge_conflict("更新徽章失败"))?
        .ok_or_else(|| not_found(ErrorCode::BadgeNotFound, "徽章不存在"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(badge, "徽章更新成功")))
}

/// 删除徽章会一并删除已授予的记录
pub async fn delete_badge(service: &BadgeService, request: &HttpRequest, badge_id: i64) -> HandlerResult {
    let actor = require_actor(request)?;
    if !BadgePolicy::manage(&actor) {
        return Err(forbidden(ErrorCode::Forbidden, "只有管理员可以删除徽章"));
    }
    let storage = service.get_storage(request)?;

    let deleted = storage
        .delete_badge(badge_id)
        .await
        .map_err(storage_failure("删除徽章失败"))?;
    if !deleted {
        return Err(not_found(ErrorCode::BadgeNotFound, "徽章不存在"));
    }

    info!("Badge {} deleted by admin {}", badge_id, actor.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("徽章删除成功")))
}
