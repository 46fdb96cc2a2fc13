use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 完成课程所需进度
pub const COMPLETE_PROGRESS: i32 = 100;

// 选课状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum EnrollmentStatus {
    Active,    // 学习中
    Completed, // 已完成
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Active => write!(f, "active"),
            EnrollmentStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EnrollmentStatus::Active),
            "completed" => Ok(EnrollmentStatus::Completed),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

// 选课实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub progress: i32,
    pub status: EnrollmentStatus,
    pub certificate_code: Option<String>,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Enrollment {
    /// 合并上报的进度：限制在 0..=100 且不回退
    pub fn merge_progress(current: i32, reported: i32) -> i32 {
        reported.clamp(0, COMPLETE_PROGRESS).max(current)
    }

    pub fn is_completed(&self) -> bool {
        self.status == EnrollmentStatus::Completed
    }
}

/// 进度上报结果
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub enrollment: Enrollment,
    /// 本次上报使课程首次完成
    pub newly_completed: bool,
}

/// 生成证书编号
pub fn new_certificate_code() -> String {
    format!(
        "CERT-{}",
        uuid::Uuid::new_v4().simple().to_string().to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_clamped_and_monotonic() {
        assert_eq!(Enrollment::merge_progress(0, 40), 40);
        assert_eq!(Enrollment::merge_progress(40, 20), 40);
        assert_eq!(Enrollment::merge_progress(40, 250), 100);
        assert_eq!(Enrollment::merge_progress(0, -5), 0);
    }

    #[test]
    fn test_certificate_codes_are_unique() {
        let a = new_certificate_code();
        let b = new_certificate_code();
        assert!(a.starts_with("CERT-"));
        assert_eq!(a.len(), 5 + 32);
        assert_ne!(a, b);
    }
}
