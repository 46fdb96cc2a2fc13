//! 通知存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{LmsError, Result};
use crate::models::notifications::{
    entities::Notification, requests::CreateNotificationRequest,
    responses::NotificationListResponse,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

fn to_active_model(req: CreateNotificationRequest, now: i64) -> ActiveModel {
    ActiveModel {
        user_id: Set(req.user_id),
        notification_type: Set(req.notification_type.to_string()),
        title: Set(req.title),
        content: Set(req.content),
        reference_type: Set(req.reference_type.map(|t| t.to_string())),
        reference_id: Set(req.reference_id),
        is_read: Set(false),
        created_at: Set(now),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 创建通知
    pub async fn create_notification_impl(
        &self,
        req: CreateNotificationRequest,
    ) -> Result<Notification> {
        let model = to_active_model(req, chrono::Utc::now().timestamp());

        let result = model.insert(&self.db).await.map_err(db_err("创建通知失败"))?;

        Ok(result.into_notification())
    }

    /// 批量创建通知，返回写入条数
    pub async fn create_notifications_batch_impl(
        &self,
        reqs: Vec<CreateNotificationRequest>,
    ) -> Result<usize> {
        if reqs.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        let count = reqs.len();
        let models = reqs.into_iter().map(|req| to_active_model(req, now));

        Notifications::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(db_err("批量创建通知失败"))?;

        Ok(count)
    }

    /// 列出用户通知（分页），最新的在前
    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        unread_only: bool,
        page: u64,
        size: u64,
    ) -> Result<NotificationListResponse> {
        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));
        if unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }
        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let (items, pagination) = self.fetch_page(select, page, size, "通知").await?;

        Ok(NotificationListResponse {
            items: items.into_iter().map(|m| m.into_notification()).collect(),
            pagination,
        })
    }

    /// 获取用户未读通知数量
    pub async fn get_unread_notification_count_impl(&self, user_id: i64) -> Result<i64> {
        let count = Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询未读通知数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 标记通知为已读，只能操作自己的通知
    pub async fn mark_notification_read_impl(
        &self,
        notification_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::Id.eq(notification_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 标记用户所有通知为已读
    pub async fn mark_all_notifications_read_impl(&self, user_id: i64) -> Result<i64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("标记全部通知已读失败: {e}")))?;

        Ok(result.rows_affected as i64)
    }

    /// 删除通知，只能删除自己的通知
    pub async fn delete_notification_impl(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        let result = Notifications::delete_many()
            .filter(Column::Id.eq(notification_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除通知失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::notifications::{
        entities::{NotificationType, ReferenceType},
        requests::CreateNotificationRequest,
    };
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::create_user;

    fn notice(user_id: i64, title: &str) -> CreateNotificationRequest {
        CreateNotificationRequest {
            user_id,
            notification_type: NotificationType::BadgeAwarded,
            title: title.to_string(),
            content: None,
            reference_type: Some(ReferenceType::Badge),
            reference_id: Some(1),
        }
    }

    #[tokio::test]
    async fn test_read_and_delete_are_scoped_to_owner() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let alice = create_user(&storage, "alice01", UserRole::Student).await;
        let bob = create_user(&storage, "bob01", UserRole::Student).await;

        let written = storage
            .create_notifications_batch(vec![notice(alice.id, "one"), notice(alice.id, "two")])
            .await
            .unwrap();
        assert_eq!(written, 2);
        let mine = storage.create_notification(notice(alice.id, "three")).await.unwrap();
        assert_eq!(mine.reference_type, Some(ReferenceType::Badge));

        assert!(!storage.mark_notification_read(mine.id, bob.id).await.unwrap());
        assert!(!storage.delete_notification(mine.id, bob.id).await.unwrap());
        assert!(storage.mark_notification_read(mine.id, alice.id).await.unwrap());
        assert_eq!(storage.get_unread_notification_count(alice.id).await.unwrap(), 2);

        let unread = storage
            .list_notifications_with_pagination(alice.id, true, 1, 10)
            .await
            .unwrap();
        assert_eq!(unread.pagination.total, 2);

        assert_eq!(storage.mark_all_notifications_read(alice.id).await.unwrap(), 2);
        assert_eq!(storage.get_unread_notification_count(alice.id).await.unwrap(), 0);
        assert!(storage.delete_notification(mine.id, alice.id).await.unwrap());
    }
}
