//! 徽章授予记录实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_badges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub badge_id: i64,
    pub user_id: i64,
    pub awarded_by: i64,
    pub reason: Option<String>,
    pub awarded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::badges::Entity",
        from = "Column::BadgeId",
        to = "super::badges::Column::Id"
    )]
    Badge,
}

impl Related<super::badges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Badge.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_user_badge(self) -> crate::models::badges::entities::UserBadge {
        crate::models::badges::entities::UserBadge {
            id: self.id,
            badge_id: self.badge_id,
            user_id: self.user_id,
            awarded_by: self.awarded_by,
            reason: self.reason,
            awarded_at: to_datetime(self.awarded_at),
        }
    }
}
