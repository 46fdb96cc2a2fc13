//! 选课存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, db_err};
use crate::entity::courses::Entity as Courses;
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::{LmsError, Result};
use crate::models::enrollments::{
    entities::{
        COMPLETE_PROGRESS, Enrollment, EnrollmentStatus, ProgressUpdate, new_certificate_code,
    },
    responses::{EnrollmentListResponse, EnrollmentWithCourse, RosterEntry, RosterResponse},
};
use crate::models::users::entities::UserSummary;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建选课记录；重复选课由唯一索引保证冲突
    pub async fn create_enrollment_impl(
        &self,
        course_id: i64,
        student_id: i64,
    ) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            student_id: Set(student_id),
            progress: Set(0),
            status: Set(EnrollmentStatus::Active.to_string()),
            certificate_code: Set(None),
            enrolled_at: Set(now),
            completed_at: Set(None),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_err("选课失败"))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_by_id_impl(&self, enrollment_id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn get_enrollment_impl(
        &self,
        course_id: i64,
        student_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn get_enrollment_by_certificate_impl(
        &self,
        code: &str,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::CertificateCode.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询证书失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 课程花名册
    pub async fn list_course_roster_impl(
        &self,
        course_id: i64,
        page: u64,
        size: u64,
    ) -> Result<RosterResponse> {
        let select = Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::EnrolledAt)
            .order_by_asc(Column::Id);

        let (enrollments, pagination) = self.fetch_page(select, page, size, "花名册").await?;

        let student_ids: Vec<i64> = enrollments.iter().map(|e| e.student_id).collect();
        let students: HashMap<i64, UserSummary> = self
            .get_users_by_ids_impl(&student_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        let items = enrollments
            .into_iter()
            .filter_map(|m| {
                let student = students.get(&m.student_id)?.clone();
                Some(RosterEntry {
                    enrollment: m.into_enrollment(),
                    student,
                })
            })
            .collect();

        Ok(RosterResponse { items, pagination })
    }

    pub async fn list_course_enrollments_impl(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程选课记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_enrollment()).collect())
    }

    /// 学生自己的选课（带课程标题）
    pub async fn list_student_enrollments_with_pagination_impl(
        &self,
        student_id: i64,
        page: u64,
        size: u64,
    ) -> Result<EnrollmentListResponse> {
        let page = page.max(1);
        let size = size.max(1);
        let paginator = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .find_also_related(Courses)
            .order_by_desc(Column::EnrolledAt)
            .paginate(&self.db, size);

        let counts = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课总数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课列表失败: {e}")))?;

        Ok(EnrollmentListResponse {
            items: rows
                .into_iter()
                .map(|(enrollment, course)| EnrollmentWithCourse {
                    enrollment: enrollment.into_enrollment(),
                    course_title: course.map(|c| c.title).unwrap_or_default(),
                })
                .collect(),
            pagination: crate::models::PaginationInfo::new(
                page,
                size,
                counts.number_of_items,
                counts.number_of_pages,
            ),
        })
    }

    pub async fn list_student_enrollments_impl(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学生选课记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_enrollment()).collect())
    }

    /// 上报进度：取最大值，首次达到 100 时完成并签发证书
    ///
    /// 两步均为带条件的更新，并发上报时只有一个请求能完成课程。
    pub async fn record_progress_impl(
        &self,
        enrollment_id: i64,
        reported: i32,
    ) -> Result<Option<ProgressUpdate>> {
        let Some(current) = Enrollments::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课记录失败: {e}")))?
        else {
            return Ok(None);
        };

        let progress = Enrollment::merge_progress(current.progress, reported);
        let now = chrono::Utc::now().timestamp();

        let mut newly_completed = false;
        if progress >= COMPLETE_PROGRESS && current.status == EnrollmentStatus::Active.to_string() {
            newly_completed = self.complete_enrollment_impl(enrollment_id, now).await?;
        }
        if !newly_completed {
            self.raise_progress_impl(enrollment_id, progress, now).await?;
        }

        let updated = Enrollments::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(updated.map(|m| ProgressUpdate {
            enrollment: m.into_enrollment(),
            newly_completed,
        }))
    }

    /// 仅当记录仍为 active 时标记完成并签发证书，返回本次是否生效
    pub(crate) async fn complete_enrollment_impl(&self, enrollment_id: i64, now: i64) -> Result<bool> {
        let result = Enrollments::update_many()
            .col_expr(Column::Progress, Expr::value(COMPLETE_PROGRESS))
            .col_expr(Column::Status, Expr::value(EnrollmentStatus::Completed.to_string()))
            .col_expr(Column::CompletedAt, Expr::value(Some(now)))
            .col_expr(Column::CertificateCode, Expr::value(Some(new_certificate_code())))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(enrollment_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .exec(&self.db)
            .await
            .map_err(db_err("完成课程失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 进度只增不减
    async fn raise_progress_impl(&self, enrollment_id: i64, progress: i32, now: i64) -> Result<()> {
        Enrollments::update_many()
            .col_expr(Column::Progress, Expr::value(progress))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(enrollment_id))
            .filter(Column::Progress.lt(progress))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新学习进度失败: {e}")))?;

        Ok(())
    }

    pub async fn delete_enrollment_impl(&self, enrollment_id: i64) -> Result<bool> {
        let result = Enrollments::delete_by_id(enrollment_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除选课记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_enrollments_impl(&self) -> Result<i64> {
        let count = Enrollments::find()
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计选课数量失败: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::enrollments::entities::EnrollmentStatus;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::{create_published_course, create_user};

    #[tokio::test]
    async fn test_second_enrollment_is_conflict() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let course = create_published_course(&storage, teacher.id).await;

        storage.create_enrollment(course.id, student.id).await.unwrap();
        let err = storage
            .create_enrollment(course.id, student.id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");
    }

    #[tokio::test]
    async fn test_progress_completes_once_and_never_decreases() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let course = create_published_course(&storage, teacher.id).await;
        let enrollment = storage.create_enrollment(course.id, student.id).await.unwrap();

        let update = storage.record_progress(enrollment.id, 60).await.unwrap().unwrap();
        assert_eq!(update.enrollment.progress, 60);
        assert!(!update.newly_completed);

        let update = storage.record_progress(enrollment.id, 30).await.unwrap().unwrap();
        assert_eq!(update.enrollment.progress, 60);

        let update = storage.record_progress(enrollment.id, 140).await.unwrap().unwrap();
        assert!(update.newly_completed);
        assert_eq!(update.enrollment.status, EnrollmentStatus::Completed);
        let code = update.enrollment.certificate_code.clone().unwrap();

        let again = storage.record_progress(enrollment.id, 100).await.unwrap().unwrap();
        assert!(!again.newly_completed);
        assert_eq!(again.enrollment.certificate_code, Some(code.clone()));

        let verified = storage.get_enrollment_by_certificate(&code).await.unwrap();
        assert_eq!(verified.map(|e| e.id), Some(enrollment.id));
    }

    #[tokio::test]
    async fn test_completion_with_stale_status_keeps_first_certificate() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let course = create_published_course(&storage, teacher.id).await;
        let enrollment = storage.create_enrollment(course.id, student.id).await.unwrap();

        let now = chrono::Utc::now().timestamp();
        assert!(storage.complete_enrollment_impl(enrollment.id, now).await.unwrap());
        let first = storage.get_enrollment_by_id(enrollment.id).await.unwrap().unwrap();
        let code = first.certificate_code.clone().unwrap();

        // 另一个请求在完成前读到了 active，随后尝试完成
        assert!(!storage.complete_enrollment_impl(enrollment.id, now).await.unwrap());
        let after = storage.get_enrollment_by_id(enrollment.id).await.unwrap().unwrap();
        assert_eq!(after.certificate_code, Some(code.clone()));
        assert_eq!(after.status, EnrollmentStatus::Completed);
        assert_eq!(after.progress, 100);
        assert!(storage.get_enrollment_by_certificate(&code).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_student_listing_includes_course_title() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let course = create_published_course(&storage, teacher.id).await;
        storage.create_enrollment(course.id, student.id).await.unwrap();

        let list = storage
            .list_student_enrollments_with_pagination(student.id, 1, 10)
            .await
            .unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].course_title, "Rust 101");

        let roster = storage.list_course_roster(course.id, 1, 10).await.unwrap();
        assert_eq!(roster.items[0].student.username, "student1");
        assert_eq!(storage.count_distinct_students_for_teacher(teacher.id).await.unwrap(), 1);
    }
}
