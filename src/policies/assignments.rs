use chrono::{DateTime, Utc};

use super::{Actor, CoursePolicy, CourseRelation, Denial, allow};
use crate::models::assignments::entities::Assignment;
use crate::models::courses::entities::Course;
use crate::models::submissions::entities::{Submission, SubmissionStatus};

pub struct AssignmentPolicy;

impl AssignmentPolicy {
    pub fn view(actor: &Actor, course: &Course, relation: CourseRelation) -> bool {
        CoursePolicy::view_content(actor, course, relation)
    }

    pub fn manage(actor: &Actor, course: &Course) -> bool {
        CoursePolicy::manage(actor, course)
    }
}

pub struct SubmissionPolicy;

impl SubmissionPolicy {
    /// 学生提交作业，返回应写入的提交状态
    pub fn submit(
        actor: &Actor,
        assignment: &Assignment,
        relation: CourseRelation,
        existing: Option<&Submission>,
        now: DateTime<Utc>,
    ) -> Result<SubmissionStatus, Denial> {
        allow(actor.is_student(), Denial::Forbidden)?;
        allow(relation.enrolled, Denial::NotEnrolled)?;
        allow(!existing.is_some_and(|s| s.is_graded()), Denial::AlreadyGraded)?;
        assignment
            .submission_status_at(now)
            .ok_or(Denial::DeadlinePassed)
    }

    /// 提交者本人、课程管理者、提交者的关联家长可查看
    pub fn view(
        actor: &Actor,
        course: &Course,
        submission: &Submission,
        linked_parent: bool,
    ) -> bool {
        submission.student_id == actor.id
            || CoursePolicy::manage(actor, course)
            || (actor.is_parent() && linked_parent)
    }

    pub fn grade(actor: &Actor, course: &Course, submission: &Submission) -> Result<(), Denial> {
        allow(CoursePolicy::manage(actor, course), Denial::Forbidden)?;
        allow(!submission.is_graded(), Denial::AlreadyGraded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::entities::CourseStatus;
    use crate::policies::fixtures::*;
    use chrono::Duration;

    fn assignment(due_at: Option<DateTime<Utc>>, allow_late: bool) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 20,
            course_id: 10,
            created_by: TEACHER.id,
            title: "Essay".into(),
            description: None,
            max_score: 100.0,
            due_at,
            allow_late_submission: allow_late,
            created_at: now,
            updated_at: now,
        }
    }

    fn submission(status: SubmissionStatus) -> Submission {
        let now = Utc::now();
        Submission {
            id: 30,
            assignment_id: 20,
            student_id: STUDENT.id,
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

    const ENROLLED: CourseRelation = CourseRelation {
        enrolled: true,
        parent_of_enrolled: false,
    };

    #[test]
    fn test_submit_rules() {
        let now = Utc::now();
        let open = assignment(Some(now + Duration::days(1)), false);
        assert_eq!(
            SubmissionPolicy::submit(&STUDENT, &open, ENROLLED, None, now),
            Ok(SubmissionStatus::Submitted)
        );
        assert_eq!(
            SubmissionPolicy::submit(&STUDENT, &open, CourseRelation::default(), None, now),
            Err(Denial::NotEnrolled)
        );

        let graded = submission(SubmissionStatus::Graded);
        assert_eq!(
            SubmissionPolicy::submit(&STUDENT, &open, ENROLLED, Some(&graded), now),
            Err(Denial::AlreadyGraded)
        );

        let closed = assignment(Some(now - Duration::days(1)), false);
        assert_eq!(
            SubmissionPolicy::submit(&STUDENT, &closed, ENROLLED, None, now),
            Err(Denial::DeadlinePassed)
        );
        let late = assignment(Some(now - Duration::days(1)), true);
        assert_eq!(
            SubmissionPolicy::submit(&STUDENT, &late, ENROLLED, None, now),
            Ok(SubmissionStatus::Late)
        );
    }

    #[test]
    fn test_view_and_grade() {
        let published = course(CourseStatus::Published);
        let pending = submission(SubmissionStatus::Submitted);

        assert!(SubmissionPolicy::view(&STUDENT, &published, &pending, false));
        assert!(SubmissionPolicy::view(&TEACHER, &published, &pending, false));
        assert!(SubmissionPolicy::view(&PARENT, &published, &pending, true));
        assert!(!SubmissionPolicy::view(&PARENT, &published, &pending, false));
        assert!(!SubmissionPolicy::view(&OTHER_TEACHER, &published, &pending, false));

        assert_eq!(SubmissionPolicy::grade(&TEACHER, &published, &pending), Ok(()));
        assert_eq!(
            SubmissionPolicy::grade(&OTHER_TEACHER, &published, &pending),
            Err(Denial::Forbidden)
        );
        assert_eq!(
            SubmissionPolicy::grade(&ADMIN, &published, &submission(SubmissionStatus::Graded)),
            Err(Denial::AlreadyGraded)
        );
    }
}
