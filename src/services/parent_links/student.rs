use actix_web::{HttpRequest, HttpResponse};
use chrono::{Duration, Utc};
use tracing::{info, warn};

use super::ParentLinkService;
use crate::config::AppConfig;
use crate::errors::LmsError;
use crate::models::parent_links::{
    entities::LinkStatus,
    responses::{InviteCodeResponse, LinkedUsersResponse},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::{Actor, Denial, ParentPolicy};
use crate::services::context::{
    HandlerResult, not_found, notify, require_actor, require_user, storage_failure,
};
use crate::services::notifications::NotificationMessage;
use crate::utils::random_code::generate_invite_code;

/// 邀请码冲突时的重试次数
const INVITE_CODE_ATTEMPTS: usize = 3;

/// 生成新邀请码，旧的未使用邀请码随之失效
pub async fn create_invite_code(service: &ParentLinkService, request: &HttpRequest) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;
    let config = &AppConfig::get().parent_link;

    let expires_at = Utc::now() + Duration::minutes(config.invite_code_ttl_minutes);

    for _ in 0..INVITE_CODE_ATTEMPTS {
        let code = generate_invite_code(config.invite_code_length);
        match storage.create_invite_code(actor.id, &code, expires_at).await {
            Ok(invite) => {
                info!("Student {} generated a new invite code", actor.id);
                return Ok(HttpResponse::Created().json(ApiResponse::success(
                    InviteCodeResponse {
                        code: invite.code,
                        expires_at: invite.expires_at,
                    },
                    "邀请码已生成",
                )));
            }
            Err(LmsError::Conflict(_)) => warn!("Invite code collision, regenerating"),
            Err(e) => return Err(storage_failure("生成邀请码失败")(e)),
        }
    }

    Err(storage_failure("生成邀请码失败")(LmsError::database_operation(
        "多次生成的邀请码均已存在",
    )))
}

/// 待确认的家长申请
pub async fn list_connection_requests(
    service: &ParentLinkService,
    request: &HttpRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let items = storage
        .list_links_for_student(actor.id, Some(LinkStatus::Pending))
        .await
        .map_err(storage_failure("查询关联申请失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(LinkedUsersResponse { items }, "查询成功")))
}

pub async fn respond_to_request(
    service: &ParentLinkService,
    request: &HttpRequest,
    link_id: i64,
    accept: bool,
) -> HandlerResult {
    let user = require_user(request)?;
    let storage = service.get_storage(request)?;

    let link = storage
        .get_link_by_id(link_id)
        .await
        .map_err(storage_failure("查询关联申请失败"))?
        .ok_or_else(|| not_found(ErrorCode::LinkNotFound, "关联申请不存在"))?;
    ParentPolicy::respond_to_request(&Actor::from(&user), &link)
        .map_err(|denial| denial.into_response())?;

    let link = match storage.respond_to_link(link_id, accept).await {
        Ok(Some(link)) => link,
        Ok(None) => return Err(not_found(ErrorCode::LinkNotFound, "关联申请不存在")),
        Err(LmsError::InvalidState(_)) => {
            return Err(Denial::RequestNotPending.into_response());
        }
        Err(e) => return Err(storage_failure("处理关联申请失败")(e)),
    };
    info!(
        "Student {} {} connection request {} from parent {}",
        user.id,
        if accept { "accepted" } else { "rejected" },
        link_id,
        link.parent_id
    );

    let student_name = user.display_label().to_string();
    let message = if accept {
        NotificationMessage::ConnectionAccepted {
            link_id,
            student_name,
        }
    } else {
        NotificationMessage::ConnectionRejected {
            link_id,
            student_name,
        }
    };
    notify(request, vec![link.parent_id], message).await;

    let message = if accept { "已同意关联申请" } else { "已拒绝关联申请" };
    Ok(HttpResponse::Ok().json(ApiResponse::success(link, message)))
}

/// 已关联的家长
pub async fn list_parents(service: &ParentLinkService, request: &HttpRequest) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let items = storage
        .list_links_for_student(actor.id, Some(LinkStatus::Active))
        .await
        .map_err(storage_failure("查询已关联家长失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(LinkedUsersResponse { items }, "查询成功")))
}
