pub mod dispatcher;
pub mod list;
pub mod manage;
pub mod templates;

pub use dispatcher::NotificationDispatcher;
pub use templates::NotificationMessage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::respond;
use crate::models::notifications::requests::NotificationListParams;

define_service!(NotificationService);

impl NotificationService {
    // 当前用户的通知列表
    pub async fn list_notifications(
        &self,
        request: &HttpRequest,
        params: NotificationListParams,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_notifications(self, request, params).await)
    }

    // 未读数量
    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(list::unread_count(self, request).await)
    }

    pub async fn mark_read(
        &self,
        request: &HttpRequest,
        notification_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(manage::mark_read(self, request, notification_id).await)
    }

    pub async fn mark_all_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(manage::mark_all_read(self, request).await)
    }

    pub async fn delete_notification(
        &self,
        request: &HttpRequest,
        notification_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(manage::delete_notification(self, request, notification_id).await)
    }
}
