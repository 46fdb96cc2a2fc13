use actix_web::{HttpRequest, HttpResponse};

use super::UserService;
use crate::models::ApiResponse;
use crate::models::users::responses::UserResponse;
use crate::services::context::{HandlerResult, load_user};

pub async fn get_user(service: &UserService, request: &HttpRequest, user_id: i64) -> HandlerResult {
    let storage = service.get_storage(request)?;
    let user = load_user(storage.as_ref(), user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse { user }, "查询成功")))
}
