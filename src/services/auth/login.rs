use actix_web::{HttpRequest, HttpResponse};
use tracing::{error, info};

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::services::context::{HandlerResult, storage_failure};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> HandlerResult {
    let storage = service.get_storage(request)?;
    let config = service.get_config();

    // 1. 用户名或邮箱均可登录
    let user = storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
        .map_err(storage_failure("Login failed"))?
        .ok_or_else(invalid_credentials)?;

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        info!("Failed login attempt for {}", user.username);
        return Err(invalid_credentials());
    }

    // 3. 停用账号不允许登录
    if !user.is_active() {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::UserDisabled,
            "Account is disabled",
        )));
    }

    if let Err(e) = storage.update_last_login(user.id).await {
        error!("Failed to update last login for {}: {}", user.id, e);
    }

    // 4. 生成令牌对
    let refresh_ttl = chrono::Duration::days(if login_request.remember_me {
        config.jwt.refresh_token_remember_me_expiry
    } else {
        config.jwt.refresh_token_expiry
    });
    let token_pair = user.generate_token_pair(Some(refresh_ttl)).map_err(|e| {
        error!("Failed to generate JWT token: {}", e);
        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            "Login failed, unable to generate token",
        ))
    })?;

    info!("User {} logged in successfully", user.username);

    let refresh_cookie = JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_ttl);
    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: config.jwt.access_token_expiry * 60,
        user,
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
