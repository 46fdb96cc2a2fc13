//! 学生邀请码实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invite_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub expires_at: i64,
    pub used_by: Option<i64>,
    pub used_at: Option<i64>,
    pub revoked: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_invite_code(self) -> crate::models::parent_links::entities::InviteCode {
        crate::models::parent_links::entities::InviteCode {
            id: self.id,
            student_id: self.student_id,
            code: self.code,
            expires_at: to_datetime(self.expires_at),
            used_by: self.used_by,
            used_at: self.used_at.map(to_datetime),
            revoked: self.revoked,
            created_at: to_datetime(self.created_at),
        }
    }
}
