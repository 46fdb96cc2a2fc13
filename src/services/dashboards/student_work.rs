//! 单个学生的学习数据汇总，供仪表盘、成绩、日历共用

use std::collections::HashMap;

use actix_web::HttpResponse;
use chrono::{DateTime, Utc};

use super::calendar::{CalendarWindow, build_events};
use crate::models::assignments::entities::Assignment;
use crate::models::courses::entities::Course;
use crate::models::dashboards::responses::{AssignmentGrade, CalendarEvent, QuizGrade};
use crate::models::enrollments::entities::Enrollment;
use crate::models::quizzes::entities::{Quiz, QuizAttempt};
use crate::models::submissions::entities::{Submission, score_percentage};
use crate::services::context::storage_failure;
use crate::services::courses::ranking::round_for_display;
use crate::storage::Storage;

pub(crate) struct StudentWork {
    pub enrollments: Vec<Enrollment>,
    pub courses: HashMap<i64, Course>,
    pub assignments: Vec<Assignment>,
    /// 按作业 ID 索引
    pub submissions: HashMap<i64, Submission>,
    pub quizzes: HashMap<i64, Quiz>,
    pub attempts: Vec<QuizAttempt>,
}

impl StudentWork {
    pub async fn load(storage: &dyn Storage, student_id: i64) -> Result<Self, HttpResponse> {
        let enrollments = storage
            .list_student_enrollments(student_id)
            .await
            .map_err(storage_failure("查询选课记录失败"))?;
        let course_ids: Vec<i64> = enrollments.iter().map(|e| e.course_id).collect();

        let courses = storage
            .get_courses_by_ids(&course_ids)
            .await
            .map_err(storage_failure("查询课程失败"))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let assignments = storage
            .list_assignments_for_courses(&course_ids)
            .await
            .map_err(storage_failure("查询作业失败"))?;
        let submissions = storage
            .list_student_submissions(student_id)
            .await
            .map_err(storage_failure("查询提交记录失败"))?
            .into_iter()
            .map(|s| (s.assignment_id, s))
            .collect();
        let quizzes: HashMap<i64, Quiz> = storage
            .list_quizzes_for_courses(&course_ids)
            .await
            .map_err(storage_failure("查询测验失败"))?
            .into_iter()
            .map(|q| (q.id, q))
            .collect();
        // 只保留仍在选课程中的测验作答
        let attempts = storage
            .list_student_attempts(student_id)
            .await
            .map_err(storage_failure("查询测验作答失败"))?
            .into_iter()
            .filter(|a| quizzes.contains_key(&a.quiz_id))
            .collect();

        Ok(Self {
            enrollments,
            courses,
            assignments,
            submissions,
            quizzes,
            attempts,
        })
    }

    pub fn completed_count(&self) -> i64 {
        self.enrollments.iter().filter(|e| e.is_completed()).count() as i64
    }

    pub fn active_count(&self) -> i64 {
        self.enrollments.len() as i64 - self.completed_count()
    }

    pub fn average_progress(&self) -> f64 {
        if self.enrollments.is_empty() {
            return 0.0;
        }
        let total: i64 = self.enrollments.iter().map(|e| i64::from(e.progress)).sum();
        round_for_display(total as f64 / self.enrollments.len() as f64)
    }

    pub fn assignment_grades(&self) -> Vec<AssignmentGrade> {
        let mut grades: Vec<AssignmentGrade> = self
            .assignments
            .iter()
            .filter_map(|assignment| {
                let submission = self.submissions.get(&assignment.id).filter(|s| s.is_graded())?;
                let score = submission.score?;
                let course = self.courses.get(&assignment.course_id)?;
                Some(AssignmentGrade {
                    submission_id: submission.id,
                    course_id: course.id,
                    course_title: course.title.clone(),
                    assignment_id: assignment.id,
                    assignment_title: assignment.title.clone(),
                    score,
                    max_score: assignment.max_score,
                    percentage: round_for_display(
                        score_percentage(score, assignment.max_score).unwrap_or(0.0),
                    ),
                    feedback: submission.feedback.clone(),
                    graded_at: submission.graded_at,
                })
            })
            .collect();
        grades.sort_by(|a, b| b.graded_at.cmp(&a.graded_at).then(a.submission_id.cmp(&b.submission_id)));
        grades
    }

    pub fn quiz_grades(&self) -> Vec<QuizGrade> {
        let mut grades: Vec<QuizGrade> = self
            .attempts
            .iter()
            .filter_map(|attempt| {
                let quiz = self.quizzes.get(&attempt.quiz_id)?;
                let course = self.courses.get(&quiz.course_id)?;
                Some(QuizGrade {
                    attempt_id: attempt.id,
                    course_id: course.id,
                    course_title: course.title.clone(),
                    quiz_id: quiz.id,
                    quiz_title: quiz.title.clone(),
                    score: attempt.score,
                    max_score: attempt.max_score,
                    percentage: round_for_display(attempt.percentage),
                    passed: attempt.passed,
                    attempt_number: attempt.attempt_number,
                    submitted_at: attempt.submitted_at,
                })
            })
            .collect();
        grades.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.attempt_id.cmp(&a.attempt_id)));
        grades
    }

    /// 与课程排行榜口径一致：已评分作业加上每个测验的最好成绩
    pub fn average_percentage(&self) -> Option<f64> {
        let mut items: Vec<f64> = self
            .assignments
            .iter()
            .filter_map(|assignment| {
                let submission = self.submissions.get(&assignment.id).filter(|s| s.is_graded())?;
                score_percentage(submission.score?, assignment.max_score)
            })
            .collect();

        let mut best: HashMap<i64, f64> = HashMap::new();
        for attempt in &self.attempts {
            best.entry(attempt.quiz_id)
                .and_modify(|p| *p = p.max(attempt.percentage))
                .or_insert(attempt.percentage);
        }
        items.extend(best.into_values());

        if items.is_empty() {
            None
        } else {
            Some(round_for_display(items.iter().sum::<f64>() / items.len() as f64))
        }
    }

    pub fn events(&self, window: CalendarWindow) -> Vec<CalendarEvent> {
        build_events(window, &self.assignments, &self.courses, &self.submissions)
    }

    /// 未来几天内尚未提交的作业
    pub fn upcoming_unsubmitted(&self, now: DateTime<Utc>) -> Vec<CalendarEvent> {
        self.events(CalendarWindow::upcoming(now))
            .into_iter()
            .filter(|e| !e.submitted)
            .collect()
    }
}
