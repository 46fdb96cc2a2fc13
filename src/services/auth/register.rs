use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::AuthService;
use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::requests::RegisterRequest,
    users::requests::CreateUserRequest,
};
use crate::services::context::{HandlerResult, bad_request, conflict, storage_failure};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_display_name, validate_email, validate_password_message, validate_username,
};

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> HandlerResult {
    let storage = service.get_storage(request)?;

    if !register_request.role.can_self_register() {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::UserRoleNotAllowed,
            "不能自助注册为管理员",
        )));
    }

    let user = create_account(
        storage.as_ref(),
        CreateUserRequest {
            username: register_request.username.trim().to_string(),
            email: register_request.email.trim().to_lowercase(),
            password: register_request.password,
            role: register_request.role,
            display_name: register_request.display_name,
            avatar_url: None,
        },
    )
    .await?;

    info!("User {} registered as {}", user.username, user.role);
    Ok(HttpResponse::Created().json(ApiResponse::success(user, "注册成功")))
}

/// 校验字段、检查重复并创建账号，`password` 为明文
pub(crate) async fn create_account(
    storage: &dyn Storage,
    mut create_request: CreateUserRequest,
) -> Result<crate::models::users::entities::User, HttpResponse> {
    validate_username(&create_request.username)
        .map_err(|msg| bad_request(ErrorCode::UserNameInvalid, msg))?;
    validate_email(&create_request.email)
        .map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
    validate_password_message(&create_request.password)
        .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;
    if let Some(name) = &create_request.display_name {
        validate_display_name(name).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    check_identifier_free(storage, &create_request.username, ErrorCode::UserNameAlreadyExists).await?;
    check_identifier_free(storage, &create_request.email, ErrorCode::UserEmailAlreadyExists).await?;

    create_request.password = hash_password(&create_request.password)
        .map_err(storage_failure("Register failed"))?;

    storage.create_user(create_request).await.map_err(|e| match e {
        // 并发注册时由唯一索引兜底
        LmsError::Conflict(_) => conflict(ErrorCode::Conflict, "用户名或邮箱已被使用"),
        other => storage_failure("Register failed")(other),
    })
}

async fn check_identifier_free(
    storage: &dyn Storage,
    identifier: &str,
    code: ErrorCode,
) -> Result<(), HttpResponse> {
    let existing = storage
        .get_user_by_username_or_email(identifier)
        .await
        .map_err(storage_failure("Register failed"))?;
    match existing {
        Some(_) => Err(conflict(
            code,
            match code {
                ErrorCode::UserEmailAlreadyExists => "Email already exists",
                _ => "Username already exists",
            },
        )),
        None => Ok(()),
    }
}
