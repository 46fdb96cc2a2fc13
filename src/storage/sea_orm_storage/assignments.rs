//! 作业存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{LmsError, Result};
use crate::models::assignments::{
    entities::Assignment,
    requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    responses::AssignmentListResponse,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_assignment_impl(
        &self,
        course_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            created_by: Set(created_by),
            title: Set(req.title),
            description: Set(req.description),
            max_score: Set(req.max_score),
            due_at: Set(req.due_at.map(|dt| dt.timestamp())),
            allow_late_submission: Set(req.allow_late_submission),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_err("创建作业失败"))?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 课程作业列表，按截止时间排序
    pub async fn list_course_assignments_with_pagination_impl(
        &self,
        course_id: i64,
        page: u64,
        size: u64,
    ) -> Result<AssignmentListResponse> {
        let select = Assignments::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::DueAt)
            .order_by_asc(Column::Id);

        let (items, pagination) = self.fetch_page(select, page, size, "作业").await?;

        Ok(AssignmentListResponse {
            items: items.into_iter().map(|m| m.into_assignment()).collect(),
            pagination,
        })
    }

    pub async fn list_assignments_for_courses_impl(
        &self,
        course_ids: &[i64],
    ) -> Result<Vec<Assignment>> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Assignments::find()
            .filter(Column::CourseId.is_in(course_ids.iter().copied()))
            .order_by_asc(Column::DueAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }

    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let Some(existing) = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }
        if let Some(due_at) = update.due_at {
            model.due_at = Set(Some(due_at.timestamp()));
        }
        if let Some(allow_late) = update.allow_late_submission {
            model.allow_late_submission = Set(allow_late);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model.update(&self.db).await.map_err(db_err("更新作业失败"))?;

        Ok(Some(updated.into_assignment()))
    }

    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(assignment_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::{create_published_course, create_user};

    #[tokio::test]
    async fn test_create_update_and_list_assignments() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let course = create_published_course(&storage, teacher.id).await;

        let assignment = storage
            .create_assignment(
                course.id,
                teacher.id,
                CreateAssignmentRequest {
                    title: "Essay".into(),
                    description: None,
                    max_score: 50.0,
                    due_at: None,
                    allow_late_submission: false,
                },
            )
            .await
            .unwrap();

        let updated = storage
            .update_assignment(
                assignment.id,
                UpdateAssignmentRequest {
                    max_score: Some(80.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.max_score, 80.0);
        assert_eq!(updated.title, "Essay");

        let list = storage
            .list_course_assignments_with_pagination(course.id, 1, 10)
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 1);
        assert!(storage.list_assignments_for_courses(&[]).await.unwrap().is_empty());
    }
}
