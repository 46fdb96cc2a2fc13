//! 授权策略
//!
//! 纯函数判断：输入操作者与资源（以及服务层查好的关系事实），输出是否允许。
//! 不访问数据库，服务层负责收集事实并把拒绝原因转换为响应。

mod assignments;
mod badges;
mod courses;
mod enrollments;
mod parents;
mod quizzes;

pub use assignments::{AssignmentPolicy, SubmissionPolicy};
pub use badges::BadgePolicy;
pub use courses::CoursePolicy;
pub use enrollments::EnrollmentPolicy;
pub use parents::ParentPolicy;
pub use quizzes::QuizPolicy;

use actix_web::HttpResponse;

use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};

/// 发起操作的用户
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: i64, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_teacher(&self) -> bool {
        self.role == UserRole::Teacher
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }

    pub fn is_parent(&self) -> bool {
        self.role == UserRole::Parent
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

/// 操作者与课程的关系，由服务层查询后传入
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseRelation {
    /// 操作者本人已选该课程
    pub enrolled: bool,
    /// 操作者是已选该课程学生的关联家长
    pub parent_of_enrolled: bool,
}

/// 拒绝原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    Forbidden,
    CourseNotPublished,
    CourseNotEditable,
    AlreadyEnrolled,
    NotEnrolled,
    AlreadyGraded,
    DeadlinePassed,
    AttemptLimitReached,
    RequestNotPending,
    ChildAccessDenied,
}

impl Denial {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Denial::Forbidden => ErrorCode::Forbidden,
            Denial::CourseNotPublished => ErrorCode::CourseNotPublished,
            Denial::CourseNotEditable => ErrorCode::CourseInvalidStatus,
            Denial::AlreadyEnrolled => ErrorCode::AlreadyEnrolled,
            Denial::NotEnrolled => ErrorCode::NotEnrolled,
            Denial::AlreadyGraded => ErrorCode::SubmissionAlreadyGraded,
            Denial::DeadlinePassed => ErrorCode::DeadlinePassed,
            Denial::AttemptLimitReached => ErrorCode::QuizAttemptLimitReached,
            Denial::RequestNotPending => ErrorCode::Conflict,
            Denial::ChildAccessDenied => ErrorCode::ChildAccessDenied,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Denial::Forbidden => "无权执行此操作",
            Denial::CourseNotPublished => "课程尚未发布",
            Denial::CourseNotEditable => "课程当前状态不允许修改",
            Denial::AlreadyEnrolled => "已选修该课程",
            Denial::NotEnrolled => "未选修该课程",
            Denial::AlreadyGraded => "提交已评分，不能修改",
            Denial::DeadlinePassed => "已超过截止时间",
            Denial::AttemptLimitReached => "已达到测验作答次数上限",
            Denial::RequestNotPending => "该关联申请已处理",
            Denial::ChildAccessDenied => "未与该学生建立关联",
        }
    }

    /// 转换为 HTTP 响应：权限类 403，状态冲突类 409
    pub fn into_response(self) -> HttpResponse {
        let body = ApiResponse::error_empty(self.error_code(), self.message());
        match self {
            Denial::Forbidden
            | Denial::NotEnrolled
            | Denial::ChildAccessDenied
            | Denial::CourseNotPublished => HttpResponse::Forbidden().json(body),
            Denial::CourseNotEditable
            | Denial::AlreadyEnrolled
            | Denial::AlreadyGraded
            | Denial::DeadlinePassed
            | Denial::AttemptLimitReached
            | Denial::RequestNotPending => HttpResponse::Conflict().json(body),
        }
    }
}

/// 布尔判断转换为 `Result`
pub(crate) fn allow(condition: bool, denial: Denial) -> Result<(), Denial> {
    if condition { Ok(()) } else { Err(denial) }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;

    use super::Actor;
    use crate::models::courses::entities::{Course, CourseStatus};
    use crate::models::users::entities::UserRole;

    pub const ADMIN: Actor = Actor { id: 1, role: UserRole::Admin };
    pub const TEACHER: Actor = Actor { id: 2, role: UserRole::Teacher };
    pub const OTHER_TEACHER: Actor = Actor { id: 3, role: UserRole::Teacher };
    pub const STUDENT: Actor = Actor { id: 4, role: UserRole::Student };
    pub const PARENT: Actor = Actor { id: 5, role: UserRole::Parent };

    pub fn course(status: CourseStatus) -> Course {
        let now = Utc::now();
        Course {
            id: 10,
            teacher_id: TEACHER.id,
            title: "Rust 101".into(),
            description: None,
            category: None,
            status,
            review_note: None,
            created_at: now,
            updated_at: now,
        }
    }
}
