use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::submissions::entities::SubmissionStatus;

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub max_score: f64,
    pub due_at: Option<DateTime<Utc>>,
    pub allow_late_submission: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at.is_some_and(|due| now > due)
    }

    /// 在 `now` 提交时应得的状态；截止后且不允许迟交时返回 None
    pub fn submission_status_at(&self, now: DateTime<Utc>) -> Option<SubmissionStatus> {
        if !self.is_past_due(now) {
            Some(SubmissionStatus::Submitted)
        } else if self.allow_late_submission {
            Some(SubmissionStatus::Late)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn assignment(due_at: Option<DateTime<Utc>>, allow_late: bool) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 1,
            course_id: 1,
            created_by: 1,
            title: "Essay".into(),
            description: None,
            max_score: 100.0,
            due_at,
            allow_late_submission: allow_late,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_submission_status_respects_deadline() {
        let now = Utc::now();
        let open = assignment(Some(now + Duration::hours(1)), false);
        assert_eq!(open.submission_status_at(now), Some(SubmissionStatus::Submitted));

        let closed = assignment(Some(now - Duration::hours(1)), false);
        assert_eq!(closed.submission_status_at(now), None);

        let late_ok = assignment(Some(now - Duration::hours(1)), true);
        assert_eq!(late_ok.submission_status_at(now), Some(SubmissionStatus::Late));

        let no_deadline = assignment(None, false);
        assert!(!no_deadline.is_past_due(now));
    }
}
