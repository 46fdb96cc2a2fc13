use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub enum CourseStatus {
    Draft,     // 草稿
    Pending,   // 待审核
    Published, // 已发布
    Rejected,  // 已驳回
    Archived,  // 已归档
}

impl CourseStatus {
    /// 状态机：只允许以下流转
    pub fn can_transition_to(&self, next: CourseStatus) -> bool {
        matches!(
            (self, next),
            (CourseStatus::Draft, CourseStatus::Pending)
                | (CourseStatus::Rejected, CourseStatus::Pending)
                | (CourseStatus::Pending, CourseStatus::Published)
                | (CourseStatus::Pending, CourseStatus::Rejected)
                | (CourseStatus::Published, CourseStatus::Archived)
        )
    }

    /// 教师可编辑内容的状态
    pub fn is_editable(&self) -> bool {
        !matches!(self, CourseStatus::Pending | CourseStatus::Archived)
    }
}

impl<'de> Deserialize<'de> for CourseStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<CourseStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的课程状态: '{s}'. 支持的状态: draft, pending, published, rejected, archived"
            ))
        })
    }
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CourseStatus::Draft => "draft",
            CourseStatus::Pending => "pending",
            CourseStatus::Published => "published",
            CourseStatus::Rejected => "rejected",
            CourseStatus::Archived => "archived",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for CourseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CourseStatus::Draft),
            "pending" => Ok(CourseStatus::Pending),
            "published" => Ok(CourseStatus::Published),
            "rejected" => Ok(CourseStatus::Rejected),
            "archived" => Ok(CourseStatus::Archived),
            _ => Err(format!("Invalid course status: {s}")),
        }
    }
}

// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: CourseStatus,
    pub review_note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_status_transitions() {
        use CourseStatus::*;
        assert!(Draft.can_transition_to(Pending));
        assert!(Rejected.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Published));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Published.can_transition_to(Archived));

        assert!(!Draft.can_transition_to(Published));
        assert!(!Archived.can_transition_to(Published));
        assert!(!Published.can_transition_to(Pending));
        assert!(!Draft.can_transition_to(Archived));
    }

    #[test]
    fn test_pending_course_is_not_editable() {
        assert!(!CourseStatus::Pending.is_editable());
        assert!(CourseStatus::Rejected.is_editable());
    }
}
