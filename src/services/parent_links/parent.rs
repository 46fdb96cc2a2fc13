use actix_web::{HttpRequest, HttpResponse};
use chrono::Utc;
use tracing::info;

use super::{ParentLinkService, link_conflict_response};
use crate::models::parent_links::{
    entities::{LinkStatus, RedeemOutcome},
    requests::{ConnectionRequest, RedeemInviteCodeRequest},
    responses::LinkedUsersResponse,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::{Actor, ParentPolicy};
use crate::services::context::{
    HandlerResult, bad_request, conflict, forbidden, not_found, notify, require_actor,
    require_user, storage_failure,
};
use crate::services::notifications::NotificationMessage;
use crate::utils::random_code::normalize_invite_code;

/// 按学生用户名或邮箱发起关联申请，等待学生确认
pub async fn request_connection(
    service: &ParentLinkService,
    request: &HttpRequest,
    connection_request: ConnectionRequest,
) -> HandlerResult {
    let user = require_user(request)?;
    let storage = service.get_storage(request)?;

    let identifier = connection_request.identifier.trim();
    if identifier.is_empty() {
        return Err(bad_request(ErrorCode::ValidationFailed, "请输入学生的用户名或邮箱"));
    }

    let student = storage
        .get_user_by_username_or_email(identifier)
        .await
        .map_err(storage_failure("查询学生失败"))?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "未找到该学生"))?;
    if student.role != UserRole::Student {
        return Err(bad_request(ErrorCode::TargetNotStudent, "该用户不是学生"));
    }

    let link = storage
        .request_link(user.id, student.id)
        .await
        .map_err(storage_failure("发起关联申请失败"))?
        .map_err(link_conflict_response)?;
    info!("Parent {} requested connection to student {}", user.id, student.id);

    notify(
        request,
        vec![student.id],
        NotificationMessage::ConnectionRequest {
            link_id: link.id,
            parent_name: user.display_label().to_string(),
        },
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(link, "关联申请已发送")))
}

/// 兑换学生生成的邀请码，关联立即生效
pub async fn redeem_invite_code(
    service: &ParentLinkService,
    request: &HttpRequest,
    redeem_request: RedeemInviteCodeRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let code = normalize_invite_code(&redeem_request.code);
    if code.is_empty() {
        return Err(bad_request(ErrorCode::InviteCodeInvalid, "邀请码无效"));
    }

    let outcome = storage
        .redeem_invite_code(&code, actor.id, Utc::now())
        .await
        .map_err(storage_failure("兑换邀请码失败"))?;

    match outcome {
        RedeemOutcome::Linked(link) => {
            info!("Parent {} linked to student {} by invite code", actor.id, link.student_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(link, "关联成功")))
        }
        RedeemOutcome::InvalidCode => Err(bad_request(ErrorCode::InviteCodeInvalid, "邀请码无效")),
        RedeemOutcome::Expired => Err(bad_request(ErrorCode::InviteCodeExpired, "邀请码已过期")),
        RedeemOutcome::AlreadyUsed => Err(conflict(ErrorCode::InviteCodeUsed, "邀请码已被使用")),
        RedeemOutcome::AlreadyConnected => {
            Err(conflict(ErrorCode::AlreadyConnected, "已与该学生建立关联"))
        }
    }
}

pub async fn list_children(service: &ParentLinkService, request: &HttpRequest) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let items = storage
        .list_links_for_parent(actor.id, Some(LinkStatus::Active))
        .await
        .map_err(storage_failure("查询已关联学生失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(LinkedUsersResponse { items }, "查询成功")))
}

/// 解除与学生的关联（包括撤回待确认的申请）
pub async fn remove_child(
    service: &ParentLinkService,
    request: &HttpRequest,
    student_id: i64,
) -> HandlerResult {
    let user = require_user(request)?;
    let storage = service.get_storage(request)?;

    let link = storage
        .get_link(user.id, student_id)
        .await
        .map_err(storage_failure("查询关联失败"))?
        .ok_or_else(|| not_found(ErrorCode::LinkNotFound, "未与该学生建立关联"))?;
    if !ParentPolicy::remove_link(&Actor::from(&user), &link) {
        return Err(forbidden(ErrorCode::Forbidden, "无权解除该关联"));
    }

    let deleted = storage
        .delete_link(link.id)
        .await
        .map_err(storage_failure("解除关联失败"))?;
    if !deleted {
        return Err(not_found(ErrorCode::LinkNotFound, "未与该学生建立关联"));
    }

    info!("Parent {} removed link to student {}", user.id, student_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("已解除关联")))
}
