use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::models::{
    PaginationInfo,
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
        entities::{InviteCode, LinkConflict, LinkSource, LinkStatus, ParentStudentLink, RedeemOutcome},
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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（密码已哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 批量获取用户
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 按角色统计用户数
    async fn count_users_by_role(&self) -> Result<Vec<(String, i64)>>;

    /// 文件管理方法
    async fn upload_file(
        &self,
        download_token: &str,
        original_name: &str,
        stored_name: &str,
        file_size: i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File>;
    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>>;

    /// 课程管理方法
    async fn create_course(&self, teacher_id: i64, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    async fn get_courses_by_ids(&self, ids: &[i64]) -> Result<Vec<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    // 状态流转，仅当当前状态等于 `from` 时生效
    async fn transition_course_status(
        &self,
        course_id: i64,
        from: CourseStatus,
        to: CourseStatus,
        review_note: Option<String>,
    ) -> Result<Option<Course>>;
    async fn delete_course(&self, course_id: i64) -> Result<bool>;
    // 按状态统计课程数，可限定教师
    async fn count_courses_by_status(&self, teacher_id: Option<i64>) -> Result<Vec<(String, i64)>>;

    /// 选课管理方法
    async fn create_enrollment(&self, course_id: i64, student_id: i64) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, enrollment_id: i64) -> Result<Option<Enrollment>>;
    async fn get_enrollment(&self, course_id: i64, student_id: i64) -> Result<Option<Enrollment>>;
    async fn get_enrollment_by_certificate(&self, code: &str) -> Result<Option<Enrollment>>;
    async fn list_course_roster(
        &self,
        course_id: i64,
        page: u64,
        size: u64,
    ) -> Result<RosterResponse>;
    async fn list_course_enrollments(&self, course_id: i64) -> Result<Vec<Enrollment>>;
    async fn list_student_enrollments_with_pagination(
        &self,
        student_id: i64,
        page: u64,
        size: u64,
    ) -> Result<EnrollmentListResponse>;
    async fn list_student_enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>>;
    // 上报进度（不回退，满 100 时完成并签发证书）
    async fn record_progress(
        &self,
        enrollment_id: i64,
        reported: i32,
    ) -> Result<Option<ProgressUpdate>>;
    async fn delete_enrollment(&self, enrollment_id: i64) -> Result<bool>;
    async fn count_enrollments(&self) -> Result<i64>;
    async fn count_distinct_students_for_teacher(&self, teacher_id: i64) -> Result<i64>;

    /// 作业管理方法
    async fn create_assignment(
        &self,
        course_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_course_assignments_with_pagination(
        &self,
        course_id: i64,
        page: u64,
        size: u64,
    ) -> Result<AssignmentListResponse>;
    async fn list_assignments_for_courses(&self, course_ids: &[i64]) -> Result<Vec<Assignment>>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;

    /// 提交管理方法
    // 提交或重新提交；已评分的提交不可覆盖
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        req: SubmitAssignmentRequest,
        status: SubmissionStatus,
    ) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    async fn get_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_assignment_submissions_with_pagination(
        &self,
        assignment_id: i64,
        page: u64,
        size: u64,
    ) -> Result<SubmissionListResponse>;
    async fn list_submissions_for_assignments(
        &self,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>>;
    async fn list_student_submissions(&self, student_id: i64) -> Result<Vec<Submission>>;
    // 评分，只能评一次
    async fn grade_submission(
        &self,
        submission_id: i64,
        grader_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>>;
    async fn count_ungraded_submissions_for_teacher(&self, teacher_id: i64) -> Result<i64>;

    /// 测验管理方法
    async fn create_quiz(
        &self,
        course_id: i64,
        created_by: i64,
        req: CreateQuizRequest,
    ) -> Result<Quiz>;
    async fn get_quiz_by_id(&self, quiz_id: i64) -> Result<Option<Quiz>>;
    async fn list_course_quizzes_with_pagination(
        &self,
        course_id: i64,
        page: u64,
        size: u64,
    ) -> Result<(Vec<Quiz>, PaginationInfo)>;
    async fn list_quizzes_for_courses(&self, course_ids: &[i64]) -> Result<Vec<Quiz>>;
    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool>;
    // 记录作答；达到次数上限时返回 None
    async fn create_quiz_attempt(
        &self,
        quiz_id: i64,
        student_id: i64,
        answers: Vec<Option<usize>>,
        score: QuizScore,
        max_attempts: Option<i32>,
    ) -> Result<Option<QuizAttempt>>;
    async fn count_quiz_attempts(&self, quiz_id: i64, student_id: i64) -> Result<i64>;
    async fn list_quiz_attempts(
        &self,
        quiz_id: i64,
        student_id: Option<i64>,
    ) -> Result<Vec<QuizAttempt>>;
    async fn list_attempts_for_quizzes(&self, quiz_ids: &[i64]) -> Result<Vec<QuizAttempt>>;
    async fn list_student_attempts(&self, student_id: i64) -> Result<Vec<QuizAttempt>>;

    /// 徽章管理方法
    async fn create_badge(&self, created_by: i64, req: CreateBadgeRequest) -> Result<Badge>;
    async fn get_badge_by_id(&self, badge_id: i64) -> Result<Option<Badge>>;
    async fn list_badges_with_pagination(&self, page: u64, size: u64)
    -> Result<BadgeListResponse>;
    async fn update_badge(&self, badge_id: i64, update: UpdateBadgeRequest)
    -> Result<Option<Badge>>;
    async fn delete_badge(&self, badge_id: i64) -> Result<bool>;
    async fn award_badge(
        &self,
        badge_id: i64,
        user_id: i64,
        awarded_by: i64,
        reason: Option<String>,
    ) -> Result<UserBadge>;
    async fn revoke_badge(&self, badge_id: i64, user_id: i64) -> Result<bool>;
    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<AwardedBadge>>;
    async fn count_user_badges(&self, user_id: i64) -> Result<i64>;

    /// 家长关联方法
    async fn get_link_by_id(&self, link_id: i64) -> Result<Option<ParentStudentLink>>;
    async fn get_link(&self, parent_id: i64, student_id: i64)
    -> Result<Option<ParentStudentLink>>;
    // 家长发起申请（新建或将已拒绝记录重置为待确认）
    async fn request_link(
        &self,
        parent_id: i64,
        student_id: i64,
    ) -> Result<std::result::Result<ParentStudentLink, LinkConflict>>;
    // 直接建立 active 关联
    async fn create_direct_link(
        &self,
        parent_id: i64,
        student_id: i64,
        source: LinkSource,
    ) -> Result<std::result::Result<ParentStudentLink, LinkConflict>>;
    // 学生响应待确认申请
    async fn respond_to_link(&self, link_id: i64, accept: bool)
    -> Result<Option<ParentStudentLink>>;
    async fn delete_link(&self, link_id: i64) -> Result<bool>;
    async fn list_links_for_student(
        &self,
        student_id: i64,
        status: Option<LinkStatus>,
    ) -> Result<Vec<ParentLinkView>>;
    async fn list_links_for_parent(
        &self,
        parent_id: i64,
        status: Option<LinkStatus>,
    ) -> Result<Vec<ParentLinkView>>;
    async fn list_links_with_pagination(
        &self,
        status: Option<LinkStatus>,
        page: u64,
        size: u64,
    ) -> Result<ParentLinkListResponse>;
    async fn active_parent_ids(&self, student_id: i64) -> Result<Vec<i64>>;
    // 生成邀请码，同时作废该学生未使用的旧码
    async fn create_invite_code(
        &self,
        student_id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<InviteCode>;
    // 兑换邀请码
    async fn redeem_invite_code(
        &self,
        code: &str,
        parent_id: i64,
        now: DateTime<Utc>,
    ) -> Result<RedeemOutcome>;

    /// 通知方法
    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification>;
    async fn create_notifications_batch(&self, reqs: Vec<CreateNotificationRequest>)
    -> Result<usize>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        unread_only: bool,
        page: u64,
        size: u64,
    ) -> Result<NotificationListResponse>;
    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64>;
    async fn mark_notification_read(&self, notification_id: i64, user_id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<i64>;
    async fn delete_notification(&self, notification_id: i64, user_id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
