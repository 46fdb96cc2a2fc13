use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 通知类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub enum NotificationType {
    ConnectionRequest,
    ConnectionAccepted,
    ConnectionRejected,
    CourseApproved,
    CourseRejected,
    CourseEnrollment,
    CourseCompleted,
    SubmissionGraded,
    QuizScored,
    BadgeAwarded,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationType::ConnectionRequest => "connection_request",
            NotificationType::ConnectionAccepted => "connection_accepted",
            NotificationType::ConnectionRejected => "connection_rejected",
            NotificationType::CourseApproved => "course_approved",
            NotificationType::CourseRejected => "course_rejected",
            NotificationType::CourseEnrollment => "course_enrollment",
            NotificationType::CourseCompleted => "course_completed",
            NotificationType::SubmissionGraded => "submission_graded",
            NotificationType::QuizScored => "quiz_scored",
            NotificationType::BadgeAwarded => "badge_awarded",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "connection_request" => Ok(NotificationType::ConnectionRequest),
            "connection_accepted" => Ok(NotificationType::ConnectionAccepted),
            "connection_rejected" => Ok(NotificationType::ConnectionRejected),
            "course_approved" => Ok(NotificationType::CourseApproved),
            "course_rejected" => Ok(NotificationType::CourseRejected),
            "course_enrollment" => Ok(NotificationType::CourseEnrollment),
            "course_completed" => Ok(NotificationType::CourseCompleted),
            "submission_graded" => Ok(NotificationType::SubmissionGraded),
            "quiz_scored" => Ok(NotificationType::QuizScored),
            "badge_awarded" => Ok(NotificationType::BadgeAwarded),
            _ => Err(format!("Invalid notification type: {s}")),
        }
    }
}

// 通知关联的资源类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub enum ReferenceType {
    Course,
    Enrollment,
    Submission,
    QuizAttempt,
    Badge,
    ParentLink,
}

impl std::fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReferenceType::Course => "course",
            ReferenceType::Enrollment => "enrollment",
            ReferenceType::Submission => "submission",
            ReferenceType::QuizAttempt => "quiz_attempt",
            ReferenceType::Badge => "badge",
            ReferenceType::ParentLink => "parent_link",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ReferenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "course" => Ok(ReferenceType::Course),
            "enrollment" => Ok(ReferenceType::Enrollment),
            "submission" => Ok(ReferenceType::Submission),
            "quiz_attempt" => Ok(ReferenceType::QuizAttempt),
            "badge" => Ok(ReferenceType::Badge),
            "parent_link" => Ok(ReferenceType::ParentLink),
            _ => Err(format!("Invalid reference type: {s}")),
        }
    }
}

// 通知实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<ReferenceType>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
