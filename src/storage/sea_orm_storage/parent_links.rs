//! 家长关联与邀请码存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, db_err};
use crate::entity::invite_codes::{
    ActiveModel as InviteActiveModel, Column as InviteColumn, Entity as InviteCodes,
};
use crate::entity::parent_student_links::{
    ActiveModel, Column, Entity as Links, Model as LinkModel,
};
use crate::errors::{LmsError, Result};
use crate::models::parent_links::{
    entities::{
        InviteCode, InviteCodeState, LinkConflict, LinkSource, LinkStatus, ParentStudentLink,
        RedeemOutcome,
    },
    responses::{ParentLinkListResponse, ParentLinkView},
};
use crate::models::users::entities::UserSummary;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 写入关联状态：已有记录则更新，否则插入
async fn save_link(
    txn: &DatabaseTransaction,
    existing: Option<LinkModel>,
    parent_id: i64,
    student_id: i64,
    status: LinkStatus,
    source: LinkSource,
) -> Result<LinkModel> {
    let now = Utc::now().timestamp();
    let responded_at = (status == LinkStatus::Active && source != LinkSource::Request).then_some(now);

    match existing {
        Some(current) => {
            let mut model: ActiveModel = current.into();
            model.status = Set(status.to_string());
            model.source = Set(source.to_string());
            model.updated_at = Set(now);
            model.responded_at = Set(responded_at);
            model.update(txn).await.map_err(db_err("更新关联失败"))
        }
        None => {
            let model = ActiveModel {
                parent_id: Set(parent_id),
                student_id: Set(student_id),
                status: Set(status.to_string()),
                source: Set(source.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                responded_at: Set(responded_at),
                ..Default::default()
            };
            model.insert(txn).await.map_err(db_err("创建关联失败"))
        }
    }
}

async fn find_link<C: ConnectionTrait>(
    conn: &C,
    parent_id: i64,
    student_id: i64,
) -> Result<Option<LinkModel>> {
    Links::find()
        .filter(Column::ParentId.eq(parent_id))
        .filter(Column::StudentId.eq(student_id))
        .one(conn)
        .await
        .map_err(|e| LmsError::database_operation(format!("查询关联失败: {e}")))
}

fn parse_status(model: &LinkModel) -> Option<LinkStatus> {
    model.status.parse::<LinkStatus>().ok()
}

impl SeaOrmStorage {
    async fn begin_txn(&self) -> Result<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))
    }

    async fn commit_txn(txn: DatabaseTransaction) -> Result<()> {
        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))
    }

    /// 为关联记录补充双方用户信息
    async fn link_views(&self, links: Vec<LinkModel>) -> Result<Vec<ParentLinkView>> {
        let mut ids: Vec<i64> = links
            .iter()
            .flat_map(|l| [l.parent_id, l.student_id])
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let users: HashMap<i64, UserSummary> = self
            .get_users_by_ids_impl(&ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        Ok(links
            .into_iter()
            .filter_map(|l| {
                let parent = users.get(&l.parent_id)?.clone();
                let student = users.get(&l.student_id)?.clone();
                Some(ParentLinkView {
                    link: l.into_link(),
                    parent,
                    student,
                })
            })
            .collect())
    }

    pub async fn get_link_by_id_impl(&self, link_id: i64) -> Result<Option<ParentStudentLink>> {
        let result = Links::find_by_id(link_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询关联失败: {e}")))?;

        Ok(result.map(|m| m.into_link()))
    }

    pub async fn get_link_impl(
        &self,
        parent_id: i64,
        student_id: i64,
    ) -> Result<Option<ParentStudentLink>> {
        Ok(find_link(&self.db, parent_id, student_id)
            .await?
            .map(|m| m.into_link()))
    }

    /// 家长发起关联申请
    pub async fn request_link_impl(
        &self,
        parent_id: i64,
        student_id: i64,
    ) -> Result<std::result::Result<ParentStudentLink, LinkConflict>> {
        let txn = self.begin_txn().await?;
        let existing = find_link(&txn, parent_id, student_id).await?;

        let status = match LinkStatus::check_request(existing.as_ref().and_then(parse_status)) {
            Ok(status) => status,
            Err(conflict) => return Ok(Err(conflict)),
        };

        let saved = save_link(
            &txn,
            existing,
            parent_id,
            student_id,
            status,
            LinkSource::Request,
        )
        .await?;
        Self::commit_txn(txn).await?;

        Ok(Ok(saved.into_link()))
    }

    /// 直接建立已生效的关联（邀请码、管理员）
    pub async fn create_direct_link_impl(
        &self,
        parent_id: i64,
        student_id: i64,
        source: LinkSource,
    ) -> Result<std::result::Result<ParentStudentLink, LinkConflict>> {
        let txn = self.begin_txn().await?;
        let existing = find_link(&txn, parent_id, student_id).await?;

        let status = match LinkStatus::check_direct_link(existing.as_ref().and_then(parse_status))
        {
            Ok(status) => status,
            Err(conflict) => return Ok(Err(conflict)),
        };

        let saved = save_link(&txn, existing, parent_id, student_id, status, source).await?;
        Self::commit_txn(txn).await?;

        Ok(Ok(saved.into_link()))
    }

    /// 学生响应申请；仅 pending 状态可响应
    ///
    /// 返回 None 表示记录不存在；状态不符时返回 InvalidState。
    pub async fn respond_to_link_impl(
        &self,
        link_id: i64,
        accept: bool,
    ) -> Result<Option<ParentStudentLink>> {
        let now = Utc::now().timestamp();
        let next = if accept {
            LinkStatus::Active
        } else {
            LinkStatus::Rejected
        };

        let result = Links::update_many()
            .col_expr(Column::Status, Expr::value(next.to_string()))
            .col_expr(Column::RespondedAt, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(link_id))
            .filter(Column::Status.eq(LinkStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("响应关联申请失败: {e}")))?;

        match self.get_link_by_id_impl(link_id).await? {
            None => Ok(None),
            Some(_) if result.rows_affected == 0 => {
                Err(LmsError::invalid_state("关联申请已处理"))
            }
            Some(link) => Ok(Some(link)),
        }
    }

    pub async fn delete_link_impl(&self, link_id: i64) -> Result<bool> {
        let result = Links::delete_by_id(link_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除关联失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_links_for_student_impl(
        &self,
        student_id: i64,
        status: Option<LinkStatus>,
    ) -> Result<Vec<ParentLinkView>> {
        let mut select = Links::find().filter(Column::StudentId.eq(student_id));
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let links = select
            .order_by_desc(Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询关联列表失败: {e}")))?;

        self.link_views(links).await
    }

    pub async fn list_links_for_parent_impl(
        &self,
        parent_id: i64,
        status: Option<LinkStatus>,
    ) -> Result<Vec<ParentLinkView>> {
        let mut select = Links::find().filter(Column::ParentId.eq(parent_id));
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let links = select
            .order_by_desc(Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询关联列表失败: {e}")))?;

        self.link_views(links).await
    }

    /// 管理员查看全部关联
    pub async fn list_links_with_pagination_impl(
        &self,
        status: Option<LinkStatus>,
        page: u64,
        size: u64,
    ) -> Result<ParentLinkListResponse> {
        let mut select = Links::find();
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        select = select.order_by_desc(Column::UpdatedAt).order_by_desc(Column::Id);

        let (links, pagination) = self.fetch_page(select, page, size, "关联").await?;

        Ok(ParentLinkListResponse {
            items: self.link_views(links).await?,
            pagination,
        })
    }

    /// 学生已生效关联的家长 ID
    pub async fn active_parent_ids_impl(&self, student_id: i64) -> Result<Vec<i64>> {
        Links::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Status.eq(LinkStatus::Active.to_string()))
            .select_only()
            .column(Column::ParentId)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询家长列表失败: {e}")))
    }

    /// 生成新邀请码，同时作废该学生所有未使用的旧码
    pub async fn create_invite_code_impl(
        &self,
        student_id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<InviteCode> {
        let txn = self.begin_txn().await?;

        InviteCodes::update_many()
            .col_expr(InviteColumn::Revoked, Expr::value(true))
            .filter(InviteColumn::StudentId.eq(student_id))
            .filter(InviteColumn::UsedBy.is_null())
            .filter(InviteColumn::Revoked.eq(false))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("作废旧邀请码失败: {e}")))?;

        let model = InviteActiveModel {
            student_id: Set(student_id),
            code: Set(code.to_string()),
            expires_at: Set(expires_at.timestamp()),
            used_by: Set(None),
            used_at: Set(None),
            revoked: Set(false),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };
        let inserted = model.insert(&txn).await.map_err(db_err("创建邀请码失败"))?;

        Self::commit_txn(txn).await?;

        Ok(inserted.into_invite_code())
    }

    /// 家长兑换邀请码；成功时关联立即生效且邀请码被标记为已使用
    pub async fn redeem_invite_code_impl(
        &self,
        code: &str,
        parent_id: i64,
        now: DateTime<Utc>,
    ) -> Result<RedeemOutcome> {
        let txn = self.begin_txn().await?;

        let Some(found) = InviteCodes::find()
            .filter(InviteColumn::Code.eq(code))
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询邀请码失败: {e}")))?
        else {
            return Ok(RedeemOutcome::InvalidCode);
        };

        let invite = found.clone().into_invite_code();
        match invite.state_at(now) {
            InviteCodeState::Valid => {}
            InviteCodeState::Expired => return Ok(RedeemOutcome::Expired),
            InviteCodeState::Used => return Ok(RedeemOutcome::AlreadyUsed),
            InviteCodeState::Revoked => return Ok(RedeemOutcome::InvalidCode),
        }

        let existing = find_link(&txn, parent_id, invite.student_id).await?;
        let status = match LinkStatus::check_direct_link(existing.as_ref().and_then(parse_status))
        {
            Ok(status) => status,
            Err(_) => return Ok(RedeemOutcome::AlreadyConnected),
        };

        let saved = save_link(
            &txn,
            existing,
            parent_id,
            invite.student_id,
            status,
            LinkSource::InviteCode,
        )
        .await?;

        // 仅在未被并发兑换时标记
        let marked = InviteCodes::update_many()
            .col_expr(InviteColumn::UsedBy, Expr::value(Some(parent_id)))
            .col_expr(InviteColumn::UsedAt, Expr::value(Some(now.timestamp())))
            .filter(InviteColumn::Id.eq(found.id))
            .filter(InviteColumn::UsedBy.is_null())
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("标记邀请码失败: {e}")))?;
        if marked.rows_affected == 0 {
            return Ok(RedeemOutcome::AlreadyUsed);
        }

        Self::commit_txn(txn).await?;

        Ok(RedeemOutcome::Linked(saved.into_link()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::models::parent_links::entities::{
        LinkConflict, LinkSource, LinkStatus, RedeemOutcome,
    };
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::create_user;

    #[tokio::test]
    async fn test_request_reject_and_request_again() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let parent = create_user(&storage, "parent1", UserRole::Parent).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;

        let link = storage.request_link(parent.id, student.id).await.unwrap().unwrap();
        assert_eq!(link.status, LinkStatus::Pending);
        assert_eq!(
            storage.request_link(parent.id, student.id).await.unwrap().unwrap_err(),
            LinkConflict::RequestAlreadyPending
        );

        let rejected = storage.respond_to_link(link.id, false).await.unwrap().unwrap();
        assert_eq!(rejected.status, LinkStatus::Rejected);
        let twice = storage.respond_to_link(link.id, true).await.unwrap_err();
        assert_eq!(twice.code(), "E015");

        let again = storage.request_link(parent.id, student.id).await.unwrap().unwrap();
        assert_eq!(again.id, link.id);
        assert_eq!(again.status, LinkStatus::Pending);

        let accepted = storage.respond_to_link(link.id, true).await.unwrap().unwrap();
        assert_eq!(accepted.status, LinkStatus::Active);
        assert_eq!(storage.active_parent_ids(student.id).await.unwrap(), vec![parent.id]);

        let views = storage.list_links_for_parent(parent.id, None).await.unwrap();
        assert_eq!(views[0].student.username, "student1");
    }

    #[tokio::test]
    async fn test_admin_link_upgrades_pending() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let parent = create_user(&storage, "parent1", UserRole::Parent).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;

        storage.request_link(parent.id, student.id).await.unwrap().unwrap();
        let linked = storage
            .create_direct_link(parent.id, student.id, LinkSource::Admin)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(linked.status, LinkStatus::Active);
        assert_eq!(linked.source, LinkSource::Admin);

        let conflict = storage
            .create_direct_link(parent.id, student.id, LinkSource::Admin)
            .await
            .unwrap();
        assert_eq!(conflict.unwrap_err(), LinkConflict::AlreadyConnected);
    }

    #[tokio::test]
    async fn test_invite_code_lifecycle() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let parent = create_user(&storage, "parent1", UserRole::Parent).await;
        let other = create_user(&storage, "parent2", UserRole::Parent).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let now = Utc::now();

        storage
            .create_invite_code(student.id, "OLDCODE2", now + Duration::hours(1))
            .await
            .unwrap();
        storage
            .create_invite_code(student.id, "NEWCODE3", now + Duration::hours(1))
            .await
            .unwrap();

        // 旧码已被新码作废
        assert!(matches!(
            storage.redeem_invite_code("OLDCODE2", parent.id, now).await.unwrap(),
            RedeemOutcome::InvalidCode
        ));
        assert!(matches!(
            storage.redeem_invite_code("NOPE", parent.id, now).await.unwrap(),
            RedeemOutcome::InvalidCode
        ));
        assert!(matches!(
            storage
                .redeem_invite_code("NEWCODE3", parent.id, now + Duration::hours(2))
                .await
                .unwrap(),
            RedeemOutcome::Expired
        ));

        match storage.redeem_invite_code("NEWCODE3", parent.id, now).await.unwrap() {
            RedeemOutcome::Linked(link) => {
                assert_eq!(link.status, LinkStatus::Active);
                assert_eq!(link.source, LinkSource::InviteCode);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(matches!(
            storage.redeem_invite_code("NEWCODE3", other.id, now).await.unwrap(),
            RedeemOutcome::AlreadyUsed
        ));
    }
}
