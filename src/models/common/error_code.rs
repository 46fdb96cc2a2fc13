//! API 业务错误码
//!
//! 0 表示成功；1xxx 通用；2xxx 认证与用户；3xxx 文件；4xxx 教学业务。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    RateLimitExceeded = 1029,

    // 认证与用户
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNotFound = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserNameAlreadyExists = 2005,
    UserEmailAlreadyExists = 2006,
    UserPasswordInvalid = 2007,
    UserDisabled = 2008,
    UserRoleNotAllowed = 2009,
    CannotModifySelf = 2010,

    // 文件
    FileNotFound = 3000,
    FileUploadFailed = 3001,
    FileTypeNotAllowed = 3002,
    FileSizeExceeded = 3003,
    MultifileUploadNotAllowed = 3004,

    // 课程
    CourseNotFound = 4000,
    CoursePermissionDenied = 4001,
    CourseInvalidStatus = 4002,
    CourseNotPublished = 4003,

    // 选课与证书
    EnrollmentNotFound = 4100,
    AlreadyEnrolled = 4101,
    NotEnrolled = 4102,
    CertificateNotFound = 4103,

    // 作业与提交
    AssignmentNotFound = 4200,
    SubmissionNotFound = 4201,
    SubmissionAlreadyGraded = 4202,
    DeadlinePassed = 4203,
    ScoreOutOfRange = 4204,

    // 测验
    QuizNotFound = 4300,
    QuizInvalid = 4301,
    QuizAttemptLimitReached = 4302,
    QuizAnswerInvalid = 4303,

    // 徽章
    BadgeNotFound = 4400,
    BadgeAlreadyExists = 4401,
    BadgeAlreadyAwarded = 4402,
    BadgeAwardNotFound = 4403,

    // 家长关联
    LinkNotFound = 4500,
    AlreadyConnected = 4501,
    RequestAlreadyPending = 4502,
    TargetNotStudent = 4503,
    InviteCodeInvalid = 4504,
    InviteCodeExpired = 4505,
    InviteCodeUsed = 4506,
    ChildAccessDenied = 4507,

    // 通知
    NotificationNotFound = 4600,

    // 日历
    CalendarRangeInvalid = 4700,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::AlreadyConnected as i32, 4501);
        assert_eq!(ErrorCode::InviteCodeExpired as i32, 4505);
    }
}
