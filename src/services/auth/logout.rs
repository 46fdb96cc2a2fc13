use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::cache::{ObjectCache, user_cache_key};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::services::context::HandlerResult;
use crate::utils::jwt::JwtUtils;

/// 清除 refresh token cookie 与缓存的用户信息
pub async fn handle_logout(request: &HttpRequest) -> HandlerResult {
    if let Some(user_id) = RequireJWT::extract_user_id(request)
        && let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>()
    {
        cache.remove(&user_cache_key(user_id)).await;
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("登出成功")))
}
