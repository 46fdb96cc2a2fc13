//! 日历窗口与截止日期事件

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::assignments::entities::Assignment;
use crate::models::courses::entities::Course;
use crate::models::dashboards::responses::CalendarEvent;
use crate::models::submissions::entities::Submission;

/// 仪表盘中“即将截止”的范围
pub const UPCOMING_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl CalendarWindow {
    /// 缺省起点为当前时间，缺省终点为起点之后 `default_days` 天
    pub fn resolve(
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        default_days: i64,
        max_days: i64,
    ) -> Result<Self, String> {
        let from = from.unwrap_or(now);
        let to = match to {
            Some(to) => to,
            None => from
                .checked_add_signed(Duration::days(default_days))
                .ok_or_else(|| "开始时间超出可查询范围".to_string())?,
        };

        if to < from {
            return Err("结束时间不能早于开始时间".to_string());
        }
        if to - from > Duration::days(max_days) {
            return Err(format!("查询范围不能超过 {max_days} 天"));
        }

        Ok(Self { from, to })
    }

    pub fn upcoming(now: DateTime<Utc>) -> Self {
        Self {
            from: now,
            to: now + Duration::days(UPCOMING_DAYS),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at <= self.to
    }
}

/// 窗口内有截止日期的作业，按截止时间、作业 ID 排序
pub fn build_events(
    window: CalendarWindow,
    assignments: &[Assignment],
    courses: &HashMap<i64, Course>,
    submissions: &HashMap<i64, Submission>,
) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = assignments
        .iter()
        .filter_map(|assignment| {
            let due_at = assignment.due_at.filter(|due| window.contains(*due))?;
            let course = courses.get(&assignment.course_id)?;
            let submission = submissions.get(&assignment.id);
            Some(CalendarEvent {
                assignment_id: assignment.id,
                course_id: course.id,
                course_title: course.title.clone(),
                title: assignment.title.clone(),
                due_at,
                submitted: submission.is_some(),
                graded: submission.is_some_and(|s| s.is_graded()),
            })
        })
        .collect();

    events.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(a.assignment_id.cmp(&b.assignment_id)));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::entities::CourseStatus;
    use crate::models::submissions::entities::SubmissionStatus;

    fn course() -> Course {
        let now = Utc::now();
        Course {
            id: 1,
            teacher_id: 2,
            title: "Rust 101".into(),
            description: None,
            category: None,
            status: CourseStatus::Published,
            review_note: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn assignment(id: i64, due_at: Option<DateTime<Utc>>) -> Assignment {
        let now = Utc::now();
        Assignment {
            id,
            course_id: 1,
            created_by: 2,
            title: format!("Assignment {id}"),
            description: None,
            max_score: 100.0,
            due_at,
            allow_late_submission: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn submission(assignment_id: i64, status: SubmissionStatus) -> Submission {
        let now = Utc::now();
        Submission {
            id: assignment_id * 10,
            assignment_id,
            student_id: 3,
            content: Some("answer".into()),
            attachment_token: None,
            status,
            score: None,
            feedback: None,
            graded_by: None,
            submitted_at: now,
            graded_at: None,
            updated_at: now,
        }
    }

    #[test]
    fn test_window_defaults_and_limits() {
        let now = Utc::now();
        let window = CalendarWindow::resolve(None, None, now, 30, 366).unwrap();
        assert_eq!(window.from, now);
        assert_eq!(window.to, now + Duration::days(30));

        assert!(CalendarWindow::resolve(Some(now), Some(now - Duration::days(1)), now, 30, 366).is_err());
        assert!(CalendarWindow::resolve(Some(now), Some(now + Duration::days(400)), now, 30, 366).is_err());
        assert!(CalendarWindow::resolve(Some(now), Some(now), now, 30, 366).is_ok());
    }

    #[test]
    fn test_window_rejects_far_future_start() {
        let now = Utc::now();
        let far = DateTime::<Utc>::MAX_UTC - Duration::days(1);

        assert!(CalendarWindow::resolve(Some(far), None, now, 30, 366).is_err());
        // 显式给出终点时不做日期加法
        let window = CalendarWindow::resolve(Some(far), Some(far + Duration::seconds(1)), now, 30, 366)
            .unwrap();
        assert_eq!(window.from, far);
    }

    #[test]
    fn test_events_are_filtered_sorted_and_flagged() {
        let now = Utc::now();
        let window = CalendarWindow::resolve(Some(now), None, now, 30, 366).unwrap();
        let due = now + Duration::days(3);
        let assignments = vec![
            assignment(5, Some(due)),
            assignment(4, Some(due)),
            assignment(3, Some(now + Duration::days(1))),
            assignment(2, None),
            assignment(1, Some(now + Duration::days(60))),
        ];
        let courses = HashMap::from([(1, course())]);
        let submissions = HashMap::from([
            (4, submission(4, SubmissionStatus::Graded)),
            (3, submission(3, SubmissionStatus::Submitted)),
        ]);

        let events = build_events(window, &assignments, &courses, &submissions);
        let ids: Vec<_> = events.iter().map(|e| e.assignment_id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
        assert!(events[0].submitted && !events[0].graded);
        assert!(events[1].submitted && events[1].graded);
        assert!(!events[2].submitted);
    }
}
