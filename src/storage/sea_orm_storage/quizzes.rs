//! 测验存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::quiz_attempts::{
    ActiveModel as AttemptActiveModel, Column as AttemptColumn, Entity as QuizAttempts,
};
use crate::entity::quizzes::{ActiveModel, Column, Entity as Quizzes};
use crate::errors::{LmsError, Result};
use crate::models::PaginationInfo;
use crate::models::quizzes::{
    entities::{Quiz, QuizAttempt, QuizScore},
    requests::CreateQuizRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_quiz_impl(
        &self,
        course_id: i64,
        created_by: i64,
        req: CreateQuizRequest,
    ) -> Result<Quiz> {
        let now = chrono::Utc::now().timestamp();
        let questions = serde_json::to_string(&req.questions)
            .map_err(|e| LmsError::serialization(format!("题目序列化失败: {e}")))?;

        let model = ActiveModel {
            course_id: Set(course_id),
            created_by: Set(created_by),
            title: Set(req.title),
            description: Set(req.description),
            questions: Set(questions),
            pass_percentage: Set(req.pass_percentage),
            max_attempts: Set(req.max_attempts),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_err("创建测验失败"))?;

        Ok(result.into_quiz())
    }

    pub async fn get_quiz_by_id_impl(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        let result = Quizzes::find_by_id(quiz_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询测验失败: {e}")))?;

        Ok(result.map(|m| m.into_quiz()))
    }

    pub async fn list_course_quizzes_with_pagination_impl(
        &self,
        course_id: i64,
        page: u64,
        size: u64,
    ) -> Result<(Vec<Quiz>, PaginationInfo)> {
        let select = Quizzes::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Id);

        let (items, pagination) = self.fetch_page(select, page, size, "测验").await?;

        Ok((items.into_iter().map(|m| m.into_quiz()).collect(), pagination))
    }

    pub async fn list_quizzes_for_courses_impl(&self, course_ids: &[i64]) -> Result<Vec<Quiz>> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Quizzes::find()
            .filter(Column::CourseId.is_in(course_ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询测验列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_quiz()).collect())
    }

    pub async fn delete_quiz_impl(&self, quiz_id: i64) -> Result<bool> {
        let result = Quizzes::delete_by_id(quiz_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除测验失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 记录一次作答；已达次数上限时返回 None
    ///
    /// (quiz_id, student_id, attempt_number) 上的唯一索引保证并发作答不会重复编号。
    pub async fn create_quiz_attempt_impl(
        &self,
        quiz_id: i64,
        student_id: i64,
        answers: Vec<Option<usize>>,
        score: QuizScore,
        max_attempts: Option<i32>,
    ) -> Result<Option<QuizAttempt>> {
        let answers = serde_json::to_string(&answers)
            .map_err(|e| LmsError::serialization(format!("作答序列化失败: {e}")))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let used = QuizAttempts::find()
            .filter(AttemptColumn::QuizId.eq(quiz_id))
            .filter(AttemptColumn::StudentId.eq(student_id))
            .count(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计作答次数失败: {e}")))?
            as i64;

        if let Some(limit) = max_attempts
            && used >= i64::from(limit)
        {
            return Ok(None);
        }

        let model = AttemptActiveModel {
            quiz_id: Set(quiz_id),
            student_id: Set(student_id),
            answers: Set(answers),
            score: Set(score.score),
            max_score: Set(score.max_score),
            percentage: Set(score.percentage),
            passed: Set(score.passed),
            attempt_number: Set(used as i32 + 1),
            submitted_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let inserted = model.insert(&txn).await.map_err(db_err("保存作答失败"))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(inserted.into_attempt()))
    }

    pub async fn count_quiz_attempts_impl(&self, quiz_id: i64, student_id: i64) -> Result<i64> {
        let count = QuizAttempts::find()
            .filter(AttemptColumn::QuizId.eq(quiz_id))
            .filter(AttemptColumn::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计作答次数失败: {e}")))?;

        Ok(count as i64)
    }

    pub async fn list_quiz_attempts_impl(
        &self,
        quiz_id: i64,
        student_id: Option<i64>,
    ) -> Result<Vec<QuizAttempt>> {
        let mut select = QuizAttempts::find().filter(AttemptColumn::QuizId.eq(quiz_id));
        if let Some(student_id) = student_id {
            select = select.filter(AttemptColumn::StudentId.eq(student_id));
        }

        let result = select
            .order_by_asc(AttemptColumn::StudentId)
            .order_by_asc(AttemptColumn::AttemptNumber)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_attempt()).collect())
    }

    pub async fn list_attempts_for_quizzes_impl(&self, quiz_ids: &[i64]) -> Result<Vec<QuizAttempt>> {
        if quiz_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = QuizAttempts::find()
            .filter(AttemptColumn::QuizId.is_in(quiz_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_attempt()).collect())
    }

    pub async fn list_student_attempts_impl(&self, student_id: i64) -> Result<Vec<QuizAttempt>> {
        let result = QuizAttempts::find()
            .filter(AttemptColumn::StudentId.eq(student_id))
            .order_by_desc(AttemptColumn::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_attempt()).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::quizzes::{
        entities::{QuizQuestion, QuizScore},
        requests::CreateQuizRequest,
    };
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::{create_published_course, create_user};

    fn score() -> QuizScore {
        QuizScore {
            score: 1.0,
            max_score: 2.0,
            percentage: 50.0,
            passed: false,
        }
    }

    #[tokio::test]
    async fn test_attempt_limit_and_numbering() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let course = create_published_course(&storage, teacher.id).await;
        let quiz = storage
            .create_quiz(
                course.id,
                teacher.id,
                CreateQuizRequest {
                    title: "Basics".into(),
                    description: None,
                    questions: vec![QuizQuestion {
                        prompt: "1 + 1?".into(),
                        options: vec!["1".into(), "2".into()],
                        correct_option: 1,
                        points: 2.0,
                    }],
                    pass_percentage: 60.0,
                    max_attempts: Some(2),
                },
            )
            .await
            .unwrap();

        let loaded = storage.get_quiz_by_id(quiz.id).await.unwrap().unwrap();
        assert_eq!(loaded.questions.len(), 1);

        let first = storage
            .create_quiz_attempt(quiz.id, student.id, vec![Some(0)], score(), quiz.max_attempts)
            .await
            .unwrap()
            .unwrap();
        let second = storage
            .create_quiz_attempt(quiz.id, student.id, vec![None], score(), quiz.max_attempts)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.attempt_number, 1);
        assert_eq!(second.attempt_number, 2);
        assert_eq!(second.answers, vec![None]);

        let third = storage
            .create_quiz_attempt(quiz.id, student.id, vec![Some(1)], score(), quiz.max_attempts)
            .await
            .unwrap();
        assert!(third.is_none());
        assert_eq!(storage.count_quiz_attempts(quiz.id, student.id).await.unwrap(), 2);
    }
}
