use actix_web::{HttpRequest, HttpResponse};

use super::AuthService;
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::context::{
    HandlerResult, bad_request, load_user, require_actor, storage_failure,
};
use crate::services::users::invalidate_cached_user;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{validate_display_name, validate_password_message};

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    if let Some(name) = &update_data.display_name {
        validate_display_name(name).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    // 修改密码必须校验当前密码；缓存中的用户不含密码哈希，从数据库读取
    let password = match update_data.new_password {
        Some(new_password) => {
            let current = load_user(storage.as_ref(), actor.id).await?;
            let confirmed = update_data
                .current_password
                .as_deref()
                .is_some_and(|p| verify_password(p, &current.password_hash));
            if !confirmed {
                return Err(bad_request(ErrorCode::UserPasswordInvalid, "当前密码不正确"));
            }
            validate_password_message(&new_password)
                .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;
            Some(hash_password(&new_password).map_err(storage_failure("密码哈希失败"))?)
        }
        None => None,
    };

    // 角色与状态只能由管理员修改
    let update = UpdateUserRequest {
        password,
        display_name: update_data.display_name,
        avatar_url: update_data.avatar_url,
        ..Default::default()
    };

    let user = storage
        .update_user(actor.id, update)
        .await
        .map_err(storage_failure("更新用户信息失败"))?
        .ok_or_else(|| {
            HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "用户不存在",
            ))
        })?;
    invalidate_cached_user(request, user.id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse { user },
        "用户信息更新成功",
    )))
}
