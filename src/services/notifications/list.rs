use actix_web::{HttpRequest, HttpResponse};

use super::NotificationService;
use crate::models::ApiResponse;
use crate::models::notifications::{
    requests::NotificationListParams, responses::UnreadCountResponse,
};
use crate::services::context::{HandlerResult, require_actor, storage_failure};

pub async fn list_notifications(
    service: &NotificationService,
    request: &HttpRequest,
    params: NotificationListParams,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;
    let (page, size) = params.pagination.normalized();

    let response = storage
        .list_notifications_with_pagination(
            actor.id,
            params.unread_only.unwrap_or(false),
            page,
            size,
        )
        .await
        .map_err(storage_failure("查询通知列表失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}

pub async fn unread_count(service: &NotificationService, request: &HttpRequest) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let unread_count = storage
        .get_unread_notification_count(actor.id)
        .await
        .map_err(storage_failure("查询未读通知数量失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UnreadCountResponse { unread_count },
        "查询成功",
    )))
}
