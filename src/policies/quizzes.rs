use super::{Actor, CoursePolicy, Denial, allow};
use crate::models::courses::entities::Course;
use crate::models::quizzes::entities::Quiz;

pub struct QuizPolicy;

impl QuizPolicy {
    /// 已选课学生在次数上限内可作答
    pub fn attempt(
        actor: &Actor,
        quiz: &Quiz,
        enrolled: bool,
        attempts_used: i64,
    ) -> Result<(), Denial> {
        allow(actor.is_student(), Denial::Forbidden)?;
        allow(enrolled, Denial::NotEnrolled)?;
        let within_limit = quiz
            .max_attempts
            .is_none_or(|limit| attempts_used < i64::from(limit));
        allow(within_limit, Denial::AttemptLimitReached)
    }

    pub fn see_answers(actor: &Actor, course: &Course) -> bool {
        CoursePolicy::manage(actor, course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::entities::CourseStatus;
    use crate::policies::fixtures::*;
    use chrono::Utc;

    fn quiz(max_attempts: Option<i32>) -> Quiz {
        let now = Utc::now();
        Quiz {
            id: 40,
            course_id: 10,
            created_by: TEACHER.id,
            title: "Basics".into(),
            description: None,
            questions: Vec::new(),
            pass_percentage: 60.0,
            max_attempts,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_attempt_limit() {
        assert_eq!(QuizPolicy::attempt(&STUDENT, &quiz(Some(2)), true, 1), Ok(()));
        assert_eq!(
            QuizPolicy::attempt(&STUDENT, &quiz(Some(2)), true, 2),
            Err(Denial::AttemptLimitReached)
        );
        assert_eq!(QuizPolicy::attempt(&STUDENT, &quiz(None), true, 50), Ok(()));
        assert_eq!(
            QuizPolicy::attempt(&STUDENT, &quiz(None), false, 0),
            Err(Denial::NotEnrolled)
        );
        assert_eq!(
            QuizPolicy::attempt(&TEACHER, &quiz(None), true, 0),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn test_answers_visible_to_course_managers() {
        let published = course(CourseStatus::Published);
        assert!(QuizPolicy::see_answers(&TEACHER, &published));
        assert!(QuizPolicy::see_answers(&ADMIN, &published));
        assert!(!QuizPolicy::see_answers(&STUDENT, &published));
    }
}
