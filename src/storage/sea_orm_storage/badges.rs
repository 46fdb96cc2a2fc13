//! 徽章存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::badges::{ActiveModel, Column, Entity as Badges};
use crate::entity::user_badges::{
    ActiveModel as AwardActiveModel, Column as AwardColumn, Entity as UserBadges,
};
use crate::errors::{LmsError, Result};
use crate::models::badges::{
    entities::{AwardedBadge, Badge, UserBadge},
    requests::{CreateBadgeRequest, UpdateBadgeRequest},
    responses::BadgeListResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建徽章，名称唯一
    pub async fn create_badge_impl(&self, created_by: i64, req: CreateBadgeRequest) -> Result<Badge> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            icon_url: Set(req.icon_url),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_err("创建徽章失败"))?;

        Ok(result.into_badge())
    }

    pub async fn get_badge_by_id_impl(&self, badge_id: i64) -> Result<Option<Badge>> {
        let result = Badges::find_by_id(badge_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询徽章失败: {e}")))?;

        Ok(result.map(|m| m.into_badge()))
    }

    pub async fn list_badges_with_pagination_impl(
        &self,
        page: u64,
        size: u64,
    ) -> Result<BadgeListResponse> {
        let select = Badges::find().order_by_asc(Column::Name);
        let (items, pagination) = self.fetch_page(select, page, size, "徽章").await?;

        Ok(BadgeListResponse {
            items: items.into_iter().map(|m| m.into_badge()).collect(),
            pagination,
        })
    }

    pub async fn update_badge_impl(
        &self,
        badge_id: i64,
        update: UpdateBadgeRequest,
    ) -> Result<Option<Badge>> {
        let Some(existing) = Badges::find_by_id(badge_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询徽章失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(icon_url) = update.icon_url {
            model.icon_url = Set(Some(icon_url));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model.update(&self.db).await.map_err(db_err("更新徽章失败"))?;

        Ok(Some(updated.into_badge()))
    }

    /// 删除徽章及其全部授予记录
    pub async fn delete_badge_impl(&self, badge_id: i64) -> Result<bool> {
        UserBadges::delete_many()
            .filter(AwardColumn::BadgeId.eq(badge_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除徽章授予记录失败: {e}")))?;

        let result = Badges::delete_by_id(badge_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除徽章失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 授予徽章；同一用户重复授予返回 Conflict
    pub async fn award_badge_impl(
        &self,
        badge_id: i64,
        user_id: i64,
        awarded_by: i64,
        reason: Option<String>,
    ) -> Result<UserBadge> {
        let model = AwardActiveModel {
            badge_id: Set(badge_id),
            user_id: Set(user_id),
            awarded_by: Set(awarded_by),
            reason: Set(reason),
            awarded_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_err("授予徽章失败"))?;

        Ok(result.into_user_badge())
    }

    pub async fn revoke_badge_impl(&self, badge_id: i64, user_id: i64) -> Result<bool> {
        let result = UserBadges::delete_many()
            .filter(AwardColumn::BadgeId.eq(badge_id))
            .filter(AwardColumn::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("撤销徽章失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 用户已获得的徽章，最新授予的在前
    pub async fn list_user_badges_impl(&self, user_id: i64) -> Result<Vec<AwardedBadge>> {
        let rows = UserBadges::find()
            .filter(AwardColumn::UserId.eq(user_id))
            .find_also_related(Badges)
            .order_by_desc(AwardColumn::AwardedAt)
            .order_by_desc(AwardColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户徽章失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(award, badge)| {
                badge.map(|badge| AwardedBadge {
                    badge: badge.into_badge(),
                    awarded_by: award.awarded_by,
                    reason: award.reason,
                    awarded_at: crate::entity::to_datetime(award.awarded_at),
                })
            })
            .collect())
    }

    pub async fn count_user_badges_impl(&self, user_id: i64) -> Result<i64> {
        let count = UserBadges::find()
            .filter(AwardColumn::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计用户徽章失败: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::badges::requests::CreateBadgeRequest;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::create_user;

    fn badge(name: &str) -> CreateBadgeRequest {
        CreateBadgeRequest {
            name: name.to_string(),
            description: None,
            icon_url: None,
        }
    }

    #[tokio::test]
    async fn test_award_is_unique_per_user_and_revocable() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let admin = create_user(&storage, "admin1", UserRole::Admin).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let created = storage.create_badge(admin.id, badge("Early Bird")).await.unwrap();

        let dup_name = storage.create_badge(admin.id, badge("Early Bird")).await.unwrap_err();
        assert_eq!(dup_name.code(), "E014");

        storage
            .award_badge(created.id, student.id, admin.id, Some("first".into()))
            .await
            .unwrap();
        let again = storage
            .award_badge(created.id, student.id, admin.id, None)
            .await
            .unwrap_err();
        assert_eq!(again.code(), "E014");

        let owned = storage.list_user_badges(student.id).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].badge.name, "Early Bird");
        assert_eq!(owned[0].reason.as_deref(), Some("first"));

        assert!(storage.revoke_badge(created.id, student.id).await.unwrap());
        assert!(!storage.revoke_badge(created.id, student.id).await.unwrap());
        assert_eq!(storage.count_user_badges(student.id).await.unwrap(), 0);
    }
}
