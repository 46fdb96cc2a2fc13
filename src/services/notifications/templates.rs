//! 通知模板
//!
//! 每种业务事件对应一个 [`NotificationMessage`] 变体，渲染为数据库通知行的各字段。

use crate::models::notifications::{
    entities::{NotificationType, ReferenceType},
    requests::CreateNotificationRequest,
};

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationMessage {
    ConnectionRequest {
        link_id: i64,
        parent_name: String,
    },
    ConnectionAccepted {
        link_id: i64,
        student_name: String,
    },
    ConnectionRejected {
        link_id: i64,
        student_name: String,
    },
    CourseApproved {
        course_id: i64,
        course_title: String,
    },
    CourseRejected {
        course_id: i64,
        course_title: String,
        note: Option<String>,
    },
    NewEnrollment {
        enrollment_id: i64,
        course_title: String,
        student_name: String,
    },
    CourseCompleted {
        enrollment_id: i64,
        course_title: String,
        student_name: String,
        certificate_code: String,
    },
    SubmissionGraded {
        submission_id: i64,
        assignment_title: String,
        score: f64,
        max_score: f64,
    },
    QuizScored {
        attempt_id: i64,
        quiz_title: String,
        percentage: f64,
        passed: bool,
    },
    BadgeAwarded {
        badge_id: i64,
        badge_name: String,
        reason: Option<String>,
    },
}

/// 渲染结果
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNotification {
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: ReferenceType,
    pub reference_id: i64,
}

impl NotificationMessage {
    pub fn render(&self) -> RenderedNotification {
        use NotificationMessage::*;

        let (notification_type, title, content, reference_type, reference_id) = match self {
            ConnectionRequest {
                link_id,
                parent_name,
            } => (
                NotificationType::ConnectionRequest,
                "新的家长关联申请".to_string(),
                Some(format!("{parent_name} 申请关联你的账号，请确认或拒绝")),
                ReferenceType::ParentLink,
                *link_id,
            ),
            ConnectionAccepted {
                link_id,
                student_name,
            } => (
                NotificationType::ConnectionAccepted,
                "关联申请已通过".to_string(),
                Some(format!("{student_name} 已接受你的关联申请")),
                ReferenceType::ParentLink,
                *link_id,
            ),
            ConnectionRejected {
                link_id,
                student_name,
            } => (
                NotificationType::ConnectionRejected,
                "关联申请被拒绝".to_string(),
                Some(format!("{student_name} 拒绝了你的关联申请")),
                ReferenceType::ParentLink,
                *link_id,
            ),
            CourseApproved {
                course_id,
                course_title,
            } => (
                NotificationType::CourseApproved,
                format!("课程「{course_title}」已通过审核"),
                Some("课程已发布，学生现在可以选课".to_string()),
                ReferenceType::Course,
                *course_id,
            ),
            CourseRejected {
                course_id,
                course_title,
                note,
            } => (
                NotificationType::CourseRejected,
                format!("课程「{course_title}」未通过审核"),
                Some(match note.as_deref().map(str::trim) {
                    Some(note) if !note.is_empty() => format!("审核意见：{note}"),
                    _ => "请修改后重新提交审核".to_string(),
                }),
                ReferenceType::Course,
                *course_id,
            ),
            NewEnrollment {
                enrollment_id,
                course_title,
                student_name,
            } => (
                NotificationType::CourseEnrollment,
                format!("「{course_title}」有新学生加入"),
                Some(format!("{student_name} 选修了你的课程")),
                ReferenceType::Enrollment,
                *enrollment_id,
            ),
            CourseCompleted {
                enrollment_id,
                course_title,
                student_name,
                certificate_code,
            } => (
                NotificationType::CourseCompleted,
                format!("{student_name} 完成了课程「{course_title}」"),
                Some(format!("结业证书编号：{certificate_code}")),
                ReferenceType::Enrollment,
                *enrollment_id,
            ),
            SubmissionGraded {
                submission_id,
                assignment_title,
                score,
                max_score,
            } => (
                NotificationType::SubmissionGraded,
                format!("作业「{assignment_title}」已评分"),
                Some(format!("得分：{score} / {max_score}")),
                ReferenceType::Submission,
                *submission_id,
            ),
            QuizScored {
                attempt_id,
                quiz_title,
                percentage,
                passed,
            } => (
                NotificationType::QuizScored,
                format!("测验「{quiz_title}」成绩已出"),
                Some(format!(
                    "正确率 {:.2}%，{}",
                    percentage,
                    if *passed { "已通过" } else { "未通过" }
                )),
                ReferenceType::QuizAttempt,
                *attempt_id,
            ),
            BadgeAwarded {
                badge_id,
                badge_name,
                reason,
            } => (
                NotificationType::BadgeAwarded,
                format!("获得徽章「{badge_name}」"),
                reason.clone().filter(|r| !r.trim().is_empty()),
                ReferenceType::Badge,
                *badge_id,
            ),
        };

        RenderedNotification {
            notification_type,
            title,
            content,
            reference_type,
            reference_id,
        }
    }

    /// 每个接收者一条通知
    pub fn to_requests(&self, recipients: &[i64]) -> Vec<CreateNotificationRequest> {
        let rendered = self.render();
        recipients
            .iter()
            .map(|&user_id| CreateNotificationRequest {
                user_id,
                notification_type: rendered.notification_type,
                title: rendered.title.clone(),
                content: rendered.content.clone(),
                reference_type: Some(rendered.reference_type),
                reference_id: Some(rendered.reference_id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_rejected_includes_note() {
        let rendered = NotificationMessage::CourseRejected {
            course_id: 3,
            course_title: "Rust 101".into(),
            note: Some("缺少大纲".into()),
        }
        .render();
        assert_eq!(rendered.notification_type, NotificationType::CourseRejected);
        assert_eq!(rendered.title, "课程「Rust 101」未通过审核");
        assert_eq!(rendered.content.as_deref(), Some("审核意见：缺少大纲"));
        assert_eq!(rendered.reference_type, ReferenceType::Course);
        assert_eq!(rendered.reference_id, 3);
    }

    #[test]
    fn test_blank_note_uses_default_text() {
        let rendered = NotificationMessage::CourseRejected {
            course_id: 3,
            course_title: "Rust 101".into(),
            note: Some("   ".into()),
        }
        .render();
        assert_eq!(rendered.content.as_deref(), Some("请修改后重新提交审核"));
    }

    #[test]
    fn test_quiz_scored_formats_percentage() {
        let rendered = NotificationMessage::QuizScored {
            attempt_id: 9,
            quiz_title: "Ownership".into(),
            percentage: 66.666,
            passed: false,
        }
        .render();
        assert_eq!(rendered.content.as_deref(), Some("正确率 66.67%，未通过"));
    }

    #[test]
    fn test_to_requests_fans_out_per_recipient() {
        let message = NotificationMessage::SubmissionGraded {
            submission_id: 5,
            assignment_title: "Essay".into(),
            score: 45.0,
            max_score: 50.0,
        };
        let requests = message.to_requests(&[4, 5]);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].user_id, 4);
        assert_eq!(requests[1].user_id, 5);
        assert_eq!(requests[1].content.as_deref(), Some("得分：45 / 50"));
        assert_eq!(requests[0].reference_type, Some(ReferenceType::Submission));
    }
}
