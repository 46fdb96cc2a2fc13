use actix_web::{HttpRequest, HttpResponse};

use super::NotificationService;
use crate::models::notifications::responses::MarkAllReadResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::context::{HandlerResult, not_found, require_actor, storage_failure};

// 只能操作自己的通知，他人的通知按不存在处理
pub async fn mark_read(
    service: &NotificationService,
    request: &HttpRequest,
    notification_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let updated = storage
        .mark_notification_read(notification_id, actor.id)
        .await
        .map_err(storage_failure("标记通知已读失败"))?;
    if !updated {
        return Err(not_found(ErrorCode::NotificationNotFound, "通知不存在"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("已标记为已读")))
}

pub async fn mark_all_read(service: &NotificationService, request: &HttpRequest) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let marked_count = storage
        .mark_all_notifications_read(actor.id)
        .await
        .map_err(storage_failure("标记全部已读失败"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MarkAllReadResponse { marked_count },
        "已全部标记为已读",
    )))
}

pub async fn delete_notification(
    service: &NotificationService,
    request: &HttpRequest,
    notification_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let deleted = storage
        .delete_notification(notification_id, actor.id)
        .await
        .map_err(storage_failure("删除通知失败"))?;
    if !deleted {
        return Err(not_found(ErrorCode::NotificationNotFound, "通知不存在"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("通知已删除")))
}
