//! 课程存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::errors::{LmsError, Result};
use crate::models::courses::{
    entities::{Course, CourseStatus},
    requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
    responses::CourseListResponse,
};
use crate::utils::search_condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建课程（草稿）
    pub async fn create_course_impl(
        &self,
        teacher_id: i64,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            title: Set(req.title),
            description: Set(req.description),
            category: Set(req.category),
            status: Set(CourseStatus::Draft.to_string()),
            review_note: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_err("创建课程失败"))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn get_courses_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Courses::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("批量查询课程失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let mut select = Courses::find();

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(search_condition(
                &[Column::Title, Column::Category],
                search,
            ));
        }

        select = select.order_by_desc(Column::UpdatedAt).order_by_desc(Column::Id);

        let (courses, pagination) = self
            .fetch_page(select, query.page, query.size, "课程")
            .await?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination,
        })
    }

    /// 更新课程内容
    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(course_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(course_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(category) = update.category {
            model.category = Set(Some(category));
        }

        let updated = model.update(&self.db).await.map_err(db_err("更新课程失败"))?;

        Ok(Some(updated.into_course()))
    }

    /// 状态流转；当前状态与 `from` 不一致时返回 None
    pub async fn transition_course_status_impl(
        &self,
        course_id: i64,
        from: CourseStatus,
        to: CourseStatus,
        review_note: Option<String>,
    ) -> Result<Option<Course>> {
        if !from.can_transition_to(to) {
            return Err(LmsError::invalid_state(format!(
                "课程状态不能从 {from} 变更为 {to}"
            )));
        }

        let mut update = Courses::update_many()
            .col_expr(Column::Status, Expr::value(to.to_string()))
            .col_expr(
                Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            );
        // 审核结论只在审核时写入，重新提交时清空
        if matches!(to, CourseStatus::Published | CourseStatus::Rejected) {
            update = update.col_expr(Column::ReviewNote, Expr::value(review_note));
        } else if to == CourseStatus::Pending {
            update = update.col_expr(Column::ReviewNote, Expr::value(Option::<String>::None));
        }

        let result = update
            .filter(Column::Id.eq(course_id))
            .filter(Column::Status.eq(from.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新课程状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_course_by_id_impl(course_id).await
    }

    /// 删除课程
    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(course_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 按状态统计课程数量
    pub async fn count_courses_by_status_impl(
        &self,
        teacher_id: Option<i64>,
    ) -> Result<Vec<(String, i64)>> {
        let mut select = Courses::find()
            .select_only()
            .column(Column::Status)
            .column_as(Column::Id.count(), "count");

        if let Some(teacher_id) = teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        select
            .group_by(Column::Status)
            .order_by_asc(Column::Status)
            .into_tuple::<(String, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计课程数量失败: {e}")))
    }

    /// 教师名下课程的不同学生数
    pub async fn count_distinct_students_for_teacher_impl(&self, teacher_id: i64) -> Result<i64> {
        let course_ids: Vec<i64> = Courses::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::TeacherId.eq(teacher_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询教师课程失败: {e}")))?;

        if course_ids.is_empty() {
            return Ok(0);
        }

        let count = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::StudentId)
            .distinct()
            .filter(EnrollmentColumn::CourseId.is_in(course_ids))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计学生数量失败: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::courses::entities::CourseStatus;
    use crate::models::courses::requests::CourseListQuery;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::{create_published_course, create_user};

    #[tokio::test]
    async fn test_transition_requires_matching_current_status() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let course = create_published_course(&storage, teacher.id).await;
        assert_eq!(course.status, CourseStatus::Published);

        // 已发布课程不能再次“审核通过”
        let again = storage
            .transition_course_status(course.id, CourseStatus::Pending, CourseStatus::Published, None)
            .await
            .unwrap();
        assert!(again.is_none());

        let illegal = storage
            .transition_course_status(course.id, CourseStatus::Published, CourseStatus::Draft, None)
            .await;
        assert!(illegal.is_err());
    }

    #[tokio::test]
    async fn test_list_and_count_by_status() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        create_published_course(&storage, teacher.id).await;
        storage
            .create_course(
                teacher.id,
                crate::models::courses::requests::CreateCourseRequest {
                    title: "Draft course".into(),
                    description: None,
                    category: Some("math".into()),
                    teacher_id: None,
                },
            )
            .await
            .unwrap();

        let published = storage
            .list_courses_with_pagination(CourseListQuery {
                page: 1,
                size: 10,
                status: Some(CourseStatus::Published),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(published.items.len(), 1);

        let counts = storage.count_courses_by_status(Some(teacher.id)).await.unwrap();
        assert!(counts.contains(&("draft".to_string(), 1)));
        assert!(counts.contains(&("published".to_string(), 1)));
    }
}
