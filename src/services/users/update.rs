use actix_web::{HttpRequest, HttpResponse};

use super::{UserService, invalidate_cached_user};
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::users::{requests::UpdateUserRequest, responses::UserResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::context::{
    HandlerResult, bad_request, conflict, not_found, require_actor, storage_failure,
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_display_name, validate_email, validate_password_message};

pub async fn update_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
    mut update: UpdateUserRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    // 管理员不能降级或停用自己
    if actor.id == user_id
        && (update.role.is_some_and(|r| r != UserRole::Admin)
            || update.status.is_some_and(|s| s != UserStatus::Active))
    {
        return Err(bad_request(ErrorCode::CannotModifySelf, "不能修改自己的角色或状态"));
    }

    if let Some(email) = update.email.as_mut() {
        *email = email.trim().to_lowercase();
        validate_email(email).map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
        let existing = storage
            .get_user_by_username_or_email(email)
            .await
            .map_err(storage_failure("更新用户失败"))?;
        if existing.is_some_and(|u| u.id != user_id) {
            return Err(conflict(ErrorCode::UserEmailAlreadyExists, "该邮箱已被使用"));
        }
    }
    if let Some(name) = &update.display_name {
        validate_display_name(name).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }
    if let Some(password) = update.password.take() {
        validate_password_message(&password)
            .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;
        update.password = Some(hash_password(&password).map_err(storage_failure("密码哈希失败"))?);
    }

    let user = storage
        .update_user(user_id, update)
        .await
        .map_err(storage_failure("更新用户失败"))?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "用户不存在"))?;
    invalidate_cached_user(request, user_id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse { user }, "用户更新成功")))
}
