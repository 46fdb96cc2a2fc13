use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::UserService;
use crate::models::ApiResponse;
use crate::models::users::{requests::CreateUserRequest, responses::UserResponse};
use crate::services::auth::register::create_account;
use crate::services::context::HandlerResult;

// 管理员可以创建任意角色的账号
pub async fn create_user(
    service: &UserService,
    request: &HttpRequest,
    mut create_request: CreateUserRequest,
) -> HandlerResult {
    let storage = service.get_storage(request)?;

    create_request.username = create_request.username.trim().to_string();
    create_request.email = create_request.email.trim().to_lowercase();
    let user = create_account(storage.as_ref(), create_request).await?;

    info!("Admin created user {} ({})", user.username, user.role);
    Ok(HttpResponse::Created().json(ApiResponse::success(UserResponse { user }, "用户创建成功")))
}
