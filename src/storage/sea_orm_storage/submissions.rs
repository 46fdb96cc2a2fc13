//! 提交存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, db_err};
use crate::entity::assignments::Relation as AssignmentRelation;
use crate::entity::courses::Column as CourseColumn;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{LmsError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::SubmitAssignmentRequest,
    responses::{SubmissionListResponse, SubmissionWithStudent},
};
use crate::models::users::entities::UserSummary;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

impl SeaOrmStorage {
    /// 提交或重新提交作业；已评分的提交不可覆盖
    pub async fn upsert_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        req: SubmitAssignmentRequest,
        status: SubmissionStatus,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let existing = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        match existing {
            Some(current) => {
                if current.status == SubmissionStatus::Graded.to_string()
                    || !self.resubmit_ungraded_impl(current.id, req, status, now).await?
                {
                    return Err(LmsError::invalid_state("提交已评分，不能重新提交"));
                }
                self.get_submission_by_id_impl(current.id)
                    .await?
                    .ok_or_else(|| LmsError::not_found("提交不存在"))
            }
            None => {
                // (assignment_id, student_id) 唯一索引保证并发首次提交只有一条成功
                let model = ActiveModel {
                    assignment_id: Set(assignment_id),
                    student_id: Set(student_id),
                    content: Set(req.content),
                    attachment_token: Set(req.attachment_token),
                    status: Set(status.to_string()),
                    score: Set(None),
                    feedback: Set(None),
                    graded_by: Set(None),
                    submitted_at: Set(now),
                    graded_at: Set(None),
                    updated_at: Set(now),
                    ..Default::default()
                };
                let saved = model.insert(&self.db).await.map_err(db_err("创建提交失败"))?;
                Ok(saved.into_submission())
            }
        }
    }

    /// 覆盖未评分的提交内容，返回本次是否生效
    pub(crate) async fn resubmit_ungraded_impl(
        &self,
        submission_id: i64,
        req: SubmitAssignmentRequest,
        status: SubmissionStatus,
        now: i64,
    ) -> Result<bool> {
        let result = Submissions::update_many()
            .col_expr(Column::Content, Expr::value(req.content))
            .col_expr(Column::AttachmentToken, Expr::value(req.attachment_token))
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::SubmittedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(submission_id))
            .filter(Column::Status.ne(SubmissionStatus::Graded.to_string()))
            .exec(&self.db)
            .await
            .map_err(db_err("更新提交失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 作业的提交列表（附学生信息）
    pub async fn list_assignment_submissions_with_pagination_impl(
        &self,
        assignment_id: i64,
        page: u64,
        size: u64,
    ) -> Result<SubmissionListResponse> {
        let select = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id);

        let (submissions, pagination) = self.fetch_page(select, page, size, "提交").await?;

        let student_ids: Vec<i64> = submissions.iter().map(|s| s.student_id).collect();
        let students: HashMap<i64, UserSummary> = self
            .get_users_by_ids_impl(&student_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        let items = submissions
            .into_iter()
            .filter_map(|m| {
                let student = students.get(&m.student_id)?.clone();
                Some(SubmissionWithStudent {
                    submission: m.into_submission(),
                    student,
                })
            })
            .collect();

        Ok(SubmissionListResponse { items, pagination })
    }

    pub async fn list_submissions_for_assignments_impl(
        &self,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Submissions::find()
            .filter(Column::AssignmentId.is_in(assignment_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn list_student_submissions_impl(&self, student_id: i64) -> Result<Vec<Submission>> {
        let result = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学生提交失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 评分；仅对未评分的提交生效
    ///
    /// 返回 None 表示提交不存在；已评分时返回 InvalidState。
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        grader_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();

        let result = Submissions::update_many()
            .col_expr(Column::Status, Expr::value(SubmissionStatus::Graded.to_string()))
            .col_expr(Column::Score, Expr::value(Some(score)))
            .col_expr(Column::Feedback, Expr::value(feedback))
            .col_expr(Column::GradedBy, Expr::value(Some(grader_id)))
            .col_expr(Column::GradedAt, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(submission_id))
            .filter(Column::Status.ne(SubmissionStatus::Graded.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("评分失败: {e}")))?;

        let current = self.get_submission_by_id_impl(submission_id).await?;
        match current {
            None => Ok(None),
            Some(_) if result.rows_affected == 0 => {
                Err(LmsError::invalid_state("提交已评分"))
            }
            Some(submission) => Ok(Some(submission)),
        }
    }

    /// 教师名下课程中待评分的提交数
    pub async fn count_ungraded_submissions_for_teacher_impl(&self, teacher_id: i64) -> Result<i64> {
        let count = Submissions::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::submissions::Relation::Assignment.def(),
            )
            .join(JoinType::InnerJoin, AssignmentRelation::Course.def())
            .filter(CourseColumn::TeacherId.eq(teacher_id))
            .filter(Column::Status.ne(SubmissionStatus::Graded.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计待评分提交失败: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::submissions::{entities::SubmissionStatus, requests::SubmitAssignmentRequest};
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::{create_published_course, create_user};

    fn answer(text: &str) -> SubmitAssignmentRequest {
        SubmitAssignmentRequest {
            content: Some(text.to_string()),
            attachment_token: None,
        }
    }

    #[tokio::test]
    async fn test_resubmit_then_grade_locks_submission() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
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

        let first = storage
            .upsert_submission(assignment.id, student.id, answer("v1"), SubmissionStatus::Submitted)
            .await
            .unwrap();
        let second = storage
            .upsert_submission(assignment.id, student.id, answer("v2"), SubmissionStatus::Late)
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.content.as_deref(), Some("v2"));
        assert_eq!(second.status, SubmissionStatus::Late);
        assert_eq!(
            storage.count_ungraded_submissions_for_teacher(teacher.id).await.unwrap(),
            1
        );

        let graded = storage
            .grade_submission(second.id, teacher.id, 45.0, Some("good".into()))
            .await
            .unwrap()
            .unwrap();
        assert!(graded.is_graded());
        assert_eq!(graded.score, Some(45.0));

        let regrade = storage
            .grade_submission(second.id, teacher.id, 10.0, None)
            .await
            .unwrap_err();
        assert_eq!(regrade.code(), "E015");

        let resubmit = storage
            .upsert_submission(assignment.id, student.id, answer("v3"), SubmissionStatus::Submitted)
            .await
            .unwrap_err();
        assert_eq!(resubmit.code(), "E015");
        assert_eq!(
            storage.count_ungraded_submissions_for_teacher(teacher.id).await.unwrap(),
            0
        );

        assert!(storage.grade_submission(999, teacher.id, 1.0, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resubmit_after_concurrent_grade_keeps_grade() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let course = create_published_course(&storage, teacher.id).await;
        let assignment = storage
            .create_assignment(
                course.id,
                teacher.id,
                CreateAssignmentRequest {
                    title: "Lab".into(),
                    description: None,
                    max_score: 10.0,
                    due_at: None,
                    allow_late_submission: true,
                },
            )
            .await
            .unwrap();
        let submission = storage
            .upsert_submission(assignment.id, student.id, answer("v1"), SubmissionStatus::Submitted)
            .await
            .unwrap();

        // 学生读到未评分状态后，教师先完成评分
        storage
            .grade_submission(submission.id, teacher.id, 8.0, Some("ok".into()))
            .await
            .unwrap();
        let now = chrono::Utc::now().timestamp();
        let applied = storage
            .resubmit_ungraded_impl(submission.id, answer("late edit"), SubmissionStatus::Late, now)
            .await
            .unwrap();
        assert!(!applied);

        let current = storage.get_submission_by_id(submission.id).await.unwrap().unwrap();
        assert!(current.is_graded());
        assert_eq!(current.score, Some(8.0));
        assert_eq!(current.content.as_deref(), Some("v1"));
    }
}
