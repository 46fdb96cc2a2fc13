//! 家长-学生关联实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parent_student_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub parent_id: i64,
    pub student_id: i64,
    pub status: String,
    pub source: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub responded_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_link(self) -> crate::models::parent_links::entities::ParentStudentLink {
        use crate::models::parent_links::entities::{LinkSource, LinkStatus, ParentStudentLink};

        ParentStudentLink {
            id: self.id,
            parent_id: self.parent_id,
            student_id: self.student_id,
            status: self
                .status
                .parse::<LinkStatus>()
                .unwrap_or(LinkStatus::Pending),
            source: self
                .source
                .parse::<LinkSource>()
                .unwrap_or(LinkSource::Request),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
            responded_at: self.responded_at.map(to_datetime),
        }
    }
}
