use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::AuthService;
use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::context::{HandlerResult, require_user, storage_failure};
use crate::utils::jwt::JwtUtils;

fn login_expired() -> HttpResponse {
    // 同时清除无效的 refresh token cookie
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_refresh_token(service: &AuthService, request: &HttpRequest) -> HandlerResult {
    let config = service.get_config();

    let refresh_token = JwtUtils::extract_refresh_token_from_cookie(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })?;

    let claims = JwtUtils::verify_refresh_token(&refresh_token).map_err(|e| {
        info!("Refresh token rejected: {}", e);
        login_expired()
    })?;
    let user_id = claims.user_id().ok_or_else(login_expired)?;

    // 角色可能已被管理员修改，以数据库为准
    let storage = service.get_storage(request)?;
    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(storage_failure("Refresh token failed"))?
        .filter(|user| user.is_active())
        .ok_or_else(login_expired)?;

    let access_token = JwtUtils::generate_access_token(user.id, user.role).map_err(|e| {
        tracing::error!("Failed to generate access token: {}", e);
        login_expired()
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RefreshTokenResponse {
            access_token,
            expires_in: config.jwt.access_token_expiry * 60,
        },
        "Token refreshed successfully",
    )))
}

pub async fn handle_get_user(_service: &AuthService, request: &HttpRequest) -> HandlerResult {
    let user = require_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user },
        "User information retrieved successfully",
    )))
}
