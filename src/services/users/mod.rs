pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use super::context::respond;
use crate::cache::{ObjectCache, user_cache_key};
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};

define_service!(UserService);

impl UserService {
    pub async fn list_users(
        &self,
        request: &HttpRequest,
        params: UserListParams,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_users(self, request, params).await)
    }

    pub async fn create_user(
        &self,
        request: &HttpRequest,
        create_request: CreateUserRequest,
    ) -> ActixResult<HttpResponse> {
        respond(create::create_user(self, request, create_request).await)
    }

    pub async fn get_user(&self, request: &HttpRequest, user_id: i64) -> ActixResult<HttpResponse> {
        respond(get::get_user(self, request, user_id).await)
    }

    pub async fn update_user(
        &self,
        request: &HttpRequest,
        user_id: i64,
        update_request: UpdateUserRequest,
    ) -> ActixResult<HttpResponse> {
        respond(update::update_user(self, request, user_id, update_request).await)
    }

    pub async fn delete_user(&self, request: &HttpRequest, user_id: i64) -> ActixResult<HttpResponse> {
        respond(delete::delete_user(self, request, user_id).await)
    }
}

/// 用户信息变更后清除认证缓存
pub(crate) async fn invalidate_cached_user(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache.remove(&user_cache_key(user_id)).await;
    }
}
