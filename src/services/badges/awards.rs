//! 徽章授予与撤销

use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::BadgeService;
use crate::errors::LmsError;
use crate::models::badges::{requests::AwardBadgeRequest, responses::UserBadgeListResponse};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::BadgePolicy;
use crate::services::context::{
    HandlerResult, bad_request, conflict, forbidden, is_linked_parent, load_user, not_found,
    notify, require_actor, storage_failure,
};
use crate::services::notifications::NotificationMessage;

pub async fn award_badge(
    service: &BadgeService,
    request: &HttpRequest,
    badge_id: i64,
    award_request: AwardBadgeRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    if !BadgePolicy::award(&actor) {
        return Err(forbidden(ErrorCode::Forbidden, "无权授予徽章"));
    }
    let storage = service.get_storage(request)?;

    let badge = storage
        .get_badge_by_id(badge_id)
        .await
        .map_err(storage_failure("查询徽章失败"))?
        .ok_or_else(|| not_found(ErrorCode::BadgeNotFound, "徽章不存在"))?;
    let recipient = load_user(storage.as_ref(), award_request.user_id).await?;
    if recipient.role != UserRole::Student {
        return Err(bad_request(ErrorCode::TargetNotStudent, "徽章只能授予学生"));
    }

    let reason = award_request
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let award = match storage
        .award_badge(badge_id, recipient.id, actor.id, reason.clone())
        .await
    {
        Ok(award) => award,
        Err(LmsError::Conflict(_)) => {
            return Err(conflict(ErrorCode::BadgeAlreadyAwarded, "该学生已获得此徽章"));
        }
        Err(e) => return Err(storage_failure("授予徽章失败")(e)),
    };
    info!("Badge {} awarded to user {} by user {}", badge_id, recipient.id, actor.id);

    notify(
        request,
        vec![recipient.id],
        NotificationMessage::BadgeAwarded {
            badge_id,
            badge_name: badge.name,
            reason,
        },
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(award, "徽章授予成功")))
}

pub async fn revoke_badge(
    service: &BadgeService,
    request: &HttpRequest,
    badge_id: i64,
    user_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    if !BadgePolicy::revoke(&actor) {
        return Err(forbidden(ErrorCode::Forbidden, "只有管理员可以撤销徽章"));
    }
    let storage = service.get_storage(request)?;

    let revoked = storage
        .revoke_badge(badge_id, user_id)
        .await
        .map_err(storage_failure("撤销徽章失败"))?;
    if !revoked {
        return Err(not_found(ErrorCode::BadgeAwardNotFound, "该用户没有此徽章"));
    }

    info!("Badge {} revoked from user {} by admin {}", badge_id, user_id, actor.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("徽章已撤销")))
}

pub async fn list_user_badges(
    service: &BadgeService,
    request: &HttpRequest,
    user_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let user = load_user(storage.as_ref(), user_id).await?;
    let linked_parent = if actor.is_parent() {
        is_linked_parent(storage.as_ref(), actor.id, user.id).await?
    } else {
        false
    };
    if !BadgePolicy::view_user_badges(&actor, user.id, linked_parent) {
        return Err(forbidden(ErrorCode::Forbidden, "无权查看该用户的徽章"));
    }

    let items = storage
        .list_user_badges(user.id)
        .await
        .map_err(storage_failure("查询用户徽章失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserBadgeListResponse {
            user_id: user.id,
            items,
        },
        "查询成功",
    )))
}
