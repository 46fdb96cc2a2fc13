use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::{UserService, invalidate_cached_user};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::context::{HandlerResult, bad_request, not_found, require_actor, storage_failure};

pub async fn delete_user(service: &UserService, request: &HttpRequest, user_id: i64) -> HandlerResult {
    let actor = require_actor(request)?;
    if actor.id == user_id {
        return Err(bad_request(ErrorCode::CannotModifySelf, "不能删除自己的账号"));
    }

    let storage = service.get_storage(request)?;
    let deleted = storage
        .delete_user(user_id)
        .await
        .map_err(storage_failure("删除用户失败"))?;
    if !deleted {
        return Err(not_found(ErrorCode::UserNotFound, "用户不存在"));
    }
    invalidate_cached_user(request, user_id).await;

    info!("Admin {} deleted user {}", actor.id, user_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("用户已删除")))
}
