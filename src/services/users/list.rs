use actix_web::{HttpRequest, HttpResponse};

use super::UserService;
use crate::models::ApiResponse;
use crate::models::users::requests::{UserListParams, UserListQuery};
use crate::services::context::{HandlerResult, storage_failure};

pub async fn list_users(
    service: &UserService,
    request: &HttpRequest,
    params: UserListParams,
) -> HandlerResult {
    let storage = service.get_storage(request)?;
    let (page, size) = params.pagination.normalized();

    let response = storage
        .list_users_with_pagination(UserListQuery {
            page,
            size,
            role: params.role,
            status: params.status,
            search: params.search,
        })
        .await
        .map_err(storage_failure("查询用户列表失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
