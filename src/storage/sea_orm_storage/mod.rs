//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod badges;
mod courses;
mod enrollments;
mod files;
mod notifications;
mod parent_links;
mod quizzes;
mod submissions;
mod users;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::models::PaginationInfo;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Select,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite，仅用于测试
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        // 内存库每个连接独立，只能使用单连接
        let db = Self::connect_sqlite("sqlite::memory:", 1, 5).await?;
        Self::migrate(&db).await?;
        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");
        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("temp_store", "memory");
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("cache_size", "-64000")
                .pragma("wal_autocheckpoint", "1000");
        }

        let mut pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(timeout_secs));
        if in_memory {
            // 连接被回收后内存库即丢失
            pool = pool.idle_timeout(None).max_lifetime(None);
        } else {
            pool = pool
                .test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300));
        }

        let pool = pool
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 分页查询，返回当前页数据与分页信息
    pub(crate) async fn fetch_page<E>(
        &self,
        select: Select<E>,
        page: u64,
        size: u64,
        what: &str,
    ) -> Result<(Vec<E::Model>, PaginationInfo)>
    where
        E: EntityTrait,
        E::Model: Sync,
    {
        let page = page.max(1);
        let size = size.max(1);
        let paginator = select.paginate(&self.db, size);
        let counts = paginator
            .num_items_and_pages()
            .await
            .map_err(db_err(&format!("查询{what}总数失败")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err(&format!("查询{what}列表失败")))?;

        Ok((
            items,
            PaginationInfo::new(page, size, counts.number_of_items, counts.number_of_pages),
        ))
    }
}

/// 数据库错误转换；唯一约束冲突保留为 Conflict
pub(crate) fn db_err(context: &str) -> impl FnOnce(DbErr) -> LmsError + '_ {
    move |e| match LmsError::from(e) {
        LmsError::Conflict(msg) => LmsError::conflict(format!("{context}: {msg}")),
        other => LmsError::database_operation(format!("{context}: {}", other.message())),
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    badges::{
        entities::{AwardedBadge, Badge, UserBadge},
        requests::{CreateBadgeRequest, UpdateBadgeRequest},
        responses::BadgeListResponse,
    },
    courses::{
        entities::{Course, CourseStatus},
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    enrollments::{
        entities::{Enrollment, ProgressUpdate},
        responses::{EnrollmentListResponse, RosterResponse},
    },
    files::entities::File,
    notifications::{
        entities::Notification, requests::CreateNotificationRequest,
        responses::NotificationListResponse,
    },
    parent_links::{
        entities::{
            InviteCode, LinkConflict, LinkSource, LinkStatus, ParentStudentLink, RedeemOutcome,
        },
        responses::{ParentLinkListResponse, ParentLinkView},
    },
    quizzes::{
        entities::{Quiz, QuizAttempt, QuizScore},
        requests::CreateQuizRequest,
    },
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::SubmitAssignmentRequest,
        responses::SubmissionListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users_by_role(&self) -> Result<Vec<(String, i64)>> {
        self.count_users_by_role_impl().await
    }

    // 文件模块
    async fn upload_file(
        &self,
        download_token: &str,
        original_name: &str,
        stored_name: &str,
        file_size: i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File> {
        self.upload_file_impl(
            download_token,
            original_name,
            stored_name,
            file_size,
            file_type,
            user_id,
        )
        .await
    }

    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>> {
        self.get_file_by_token_impl(token).await
    }

    // 课程模块
    async fn create_course(&self, teacher_id: i64, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(teacher_id, course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn get_courses_by_ids(&self, ids: &[i64]) -> Result<Vec<Course>> {
        self.get_courses_by_ids_impl(ids).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn transition_course_status(
        &self,
        course_id: i64,
        from: CourseStatus,
        to: CourseStatus,
        review_note: Option<String>,
    ) -> Result<Option<Course>> {
        self.transition_course_status_impl(course_id, from, to, review_note)
            .await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    async fn count_courses_by_status(&self, teacher_id: Option<i64>) -> Result<Vec<(String, i64)>> {
        self.count_courses_by_status_impl(teacher_id).await
    }

    // 选课模块
    async fn create_enrollment(&self, course_id: i64, student_id: i64) -> Result<Enrollment> {
        self.create_enrollment_impl(course_id, student_id).await
    }

    async fn get_enrollment_by_id(&self, enrollment_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(enrollment_id).await
    }

    async fn get_enrollment(&self, course_id: i64, student_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(course_id, student_id).await
    }

    async fn get_enrollment_by_certificate(&self, code: &str) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_certificate_impl(code).await
    }

    async fn list_course_roster(
        &self,
        course_id: i64,
        page: u64,
        size: u64,
    ) -> Result<RosterResponse> {
        self.list_course_roster_impl(course_id, page, size).await
    }

    async fn list_course_enrollments(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        self.list_course_enrollments_impl(course_id).await
    }

    async fn list_student_enrollments_with_pagination(
        &self,
        student_id: i64,
        page: u64,
        size: u64,
    ) -> Result<EnrollmentListResponse> {
        self.list_student_enrollments_with_pagination_impl(student_id, page, size)
            .await
    }

    async fn list_student_enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        self.list_student_enrollments_impl(student_id).await
    }

    async fn record_progress(
        &self,
        enrollment_id: i64,
        reported: i32,
    ) -> Result<Option<ProgressUpdate>> {
        self.record_progress_impl(enrollment_id, reported).await
    }

    async fn delete_enrollment(&self, enrollment_id: i64) -> Result<bool> {
        self.delete_enrollment_impl(enrollment_id).await
    }

    async fn count_enrollments(&self) -> Result<i64> {
        self.count_enrollments_impl().await
    }

    async fn count_distinct_students_for_teacher(&self, teacher_id: i64) -> Result<i64> {
        self.count_distinct_students_for_teacher_impl(teacher_id)
            .await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        course_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(course_id, created_by, req).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_course_assignments_with_pagination(
        &self,
        course_id: i64,
        page: u64,
        size: u64,
    ) -> Result<AssignmentListResponse> {
        self.list_course_assignments_with_pagination_impl(course_id, page, size)
            .await
    }

    async fn list_assignments_for_courses(&self, course_ids: &[i64]) -> Result<Vec<Assignment>> {
        self.list_assignments_for_courses_impl(course_ids).await
    }

    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(assignment_id, update).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    // 提交模块
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        req: SubmitAssignmentRequest,
        status: SubmissionStatus,
    ) -> Result<Submission> {
        self.upsert_submission_impl(assignment_id, student_id, req, status)
            .await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn get_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_impl(assignment_id, student_id).await
    }

    async fn list_assignment_submissions_with_pagination(
        &self,
        assignment_id: i64,
        page: u64,
        size: u64,
    ) -> Result<SubmissionListResponse> {
        self.list_assignment_submissions_with_pagination_impl(assignment_id, page, size)
            .await
    }

    async fn list_submissions_for_assignments(
        &self,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        self.list_submissions_for_assignments_impl(assignment_ids)
            .await
    }

    async fn list_student_submissions(&self, student_id: i64) -> Result<Vec<Submission>> {
        self.list_student_submissions_impl(student_id).await
    }

    async fn grade_submission(
        &self,
        submission_id: i64,
        grader_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(submission_id, grader_id, score, feedback)
            .await
    }

    async fn count_ungraded_submissions_for_teacher(&self, teacher_id: i64) -> Result<i64> {
        self.count_ungraded_submissions_for_teacher_impl(teacher_id)
            .await
    }

    // 测验模块
    async fn create_quiz(
        &self,
        course_id: i64,
        created_by: i64,
        req: CreateQuizRequest,
    ) -> Result<Quiz> {
        self.create_quiz_impl(course_id, created_by, req).await
    }

    async fn get_quiz_by_id(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        self.get_quiz_by_id_impl(quiz_id).await
    }

    async fn list_course_quizzes_with_pagination(
        &self,
        course_id: i64,
        page: u64,
        size: u64,
    ) -> Result<(Vec<Quiz>, PaginationInfo)> {
        self.list_course_quizzes_with_pagination_impl(course_id, page, size)
            .await
    }

    async fn list_quizzes_for_courses(&self, course_ids: &[i64]) -> Result<Vec<Quiz>> {
        self.list_quizzes_for_courses_impl(course_ids).await
    }

    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool> {
        self.delete_quiz_impl(quiz_id).await
    }

    async fn create_quiz_attempt(
        &self,
        quiz_id: i64,
        student_id: i64,
        answers: Vec<Option<usize>>,
        score: QuizScore,
        max_attempts: Option<i32>,
    ) -> Result<Option<QuizAttempt>> {
        self.create_quiz_attempt_impl(quiz_id, student_id, answers, score, max_attempts)
            .await
    }

    async fn count_quiz_attempts(&self, quiz_id: i64, student_id: i64) -> Result<i64> {
        self.count_quiz_attempts_impl(quiz_id, student_id).await
    }

    async fn list_quiz_attempts(
        &self,
        quiz_id: i64,
        student_id: Option<i64>,
    ) -> Result<Vec<QuizAttempt>> {
        self.list_quiz_attempts_impl(quiz_id, student_id).await
    }

    async fn list_attempts_for_quizzes(&self, quiz_ids: &[i64]) -> Result<Vec<QuizAttempt>> {
        self.list_attempts_for_quizzes_impl(quiz_ids).await
    }

    async fn list_student_attempts(&self, student_id: i64) -> Result<Vec<QuizAttempt>> {
        self.list_student_attempts_impl(student_id).await
    }

    // 徽章模块
    async fn create_badge(&self, created_by: i64, req: CreateBadgeRequest) -> Result<Badge> {
        self.create_badge_impl(created_by, req).await
    }

    async fn get_badge_by_id(&self, badge_id: i64) -> Result<Option<Badge>> {
        self.get_badge_by_id_impl(badge_id).await
    }

    async fn list_badges_with_pagination(
        &self,
        page: u64,
        size: u64,
    ) -> Result<BadgeListResponse> {
        self.list_badges_with_pagination_impl(page, size).await
    }

    async fn update_badge(
        &self,
        badge_id: i64,
        update: UpdateBadgeRequest,
    ) -> Result<Option<Badge>> {
        self.update_badge_impl(badge_id, update).await
    }

    async fn delete_badge(&self, badge_id: i64) -> Result<bool> {
        self.delete_badge_impl(badge_id).await
    }

    async fn award_badge(
        &self,
        badge_id: i64,
        user_id: i64,
        awarded_by: i64,
        reason: Option<String>,
    ) -> Result<UserBadge> {
        self.award_badge_impl(badge_id, user_id, awarded_by, reason)
            .await
    }

    async fn revoke_badge(&self, badge_id: i64, user_id: i64) -> Result<bool> {
        self.revoke_badge_impl(badge_id, user_id).await
    }

    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<AwardedBadge>> {
        self.list_user_badges_impl(user_id).await
    }

    async fn count_user_badges(&self, user_id: i64) -> Result<i64> {
        self.count_user_badges_impl(user_id).await
    }

    // 家长关联模块
    async fn get_link_by_id(&self, link_id: i64) -> Result<Option<ParentStudentLink>> {
        self.get_link_by_id_impl(link_id).await
    }

    async fn get_link(
        &self,
        parent_id: i64,
        student_id: i64,
    ) -> Result<Option<ParentStudentLink>> {
        self.get_link_impl(parent_id, student_id).await
    }

    async fn request_link(
        &self,
        parent_id: i64,
        student_id: i64,
    ) -> Result<std::result::Result<ParentStudentLink, LinkConflict>> {
        self.request_link_impl(parent_id, student_id).await
    }

    async fn create_direct_link(
        &self,
        parent_id: i64,
        student_id: i64,
        source: LinkSource,
    ) -> Result<std::result::Result<ParentStudentLink, LinkConflict>> {
        self.create_direct_link_impl(parent_id, student_id, source)
            .await
    }

    async fn respond_to_link(
        &self,
        link_id: i64,
        accept: bool,
    ) -> Result<Option<ParentStudentLink>> {
        self.respond_to_link_impl(link_id, accept).await
    }

    async fn delete_link(&self, link_id: i64) -> Result<bool> {
        self.delete_link_impl(link_id).await
    }

    async fn list_links_for_student(
        &self,
        student_id: i64,
        status: Option<LinkStatus>,
    ) -> Result<Vec<ParentLinkView>> {
        self.list_links_for_student_impl(student_id, status).await
    }

    async fn list_links_for_parent(
        &self,
        parent_id: i64,
        status: Option<LinkStatus>,
    ) -> Result<Vec<ParentLinkView>> {
        self.list_links_for_parent_impl(parent_id, status).await
    }

    async fn list_links_with_pagination(
        &self,
        status: Option<LinkStatus>,
        page: u64,
        size: u64,
    ) -> Result<ParentLinkListResponse> {
        self.list_links_with_pagination_impl(status, page, size)
            .await
    }

    async fn active_parent_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        self.active_parent_ids_impl(student_id).await
    }

    async fn create_invite_code(
        &self,
        student_id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<InviteCode> {
        self.create_invite_code_impl(student_id, code, expires_at)
            .await
    }

    async fn redeem_invite_code(
        &self,
        code: &str,
        parent_id: i64,
        now: DateTime<Utc>,
    ) -> Result<RedeemOutcome> {
        self.redeem_invite_code_impl(code, parent_id, now).await
    }

    // 通知模块
    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification> {
        self.create_notification_impl(req).await
    }

    async fn create_notifications_batch(
        &self,
        reqs: Vec<CreateNotificationRequest>,
    ) -> Result<usize> {
        self.create_notifications_batch_impl(reqs).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        unread_only: bool,
        page: u64,
        size: u64,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, unread_only, page, size)
            .await
    }

    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64> {
        self.get_unread_notification_count_impl(user_id).await
    }

    async fn mark_notification_read(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        self.mark_notification_read_impl(notification_id, user_id)
            .await
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<i64> {
        self.mark_all_notifications_read_impl(user_id).await
    }

    async fn delete_notification(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        self.delete_notification_impl(notification_id, user_id)
            .await
    }
}
