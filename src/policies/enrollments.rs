use super::{Actor, Denial, allow};
use crate::models::courses::entities::{Course, CourseStatus};
use crate::models::enrollments::entities::Enrollment;

pub struct EnrollmentPolicy;

impl EnrollmentPolicy {
    /// 仅学生可选修已发布且未选过的课程
    pub fn enroll(actor: &Actor, course: &Course, already_enrolled: bool) -> Result<(), Denial> {
        allow(actor.is_student(), Denial::Forbidden)?;
        allow(course.status == CourseStatus::Published, Denial::CourseNotPublished)?;
        allow(!already_enrolled, Denial::AlreadyEnrolled)
    }

    pub fn update_progress(actor: &Actor, enrollment: &Enrollment) -> bool {
        actor.is_student() && enrollment.student_id == actor.id
    }

    pub fn drop(actor: &Actor, enrollment: &Enrollment) -> bool {
        actor.is_admin() || enrollment.student_id == actor.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enrollments::entities::EnrollmentStatus;
    use crate::policies::fixtures::*;
    use chrono::Utc;

    fn enrollment(student_id: i64) -> Enrollment {
        let now = Utc::now();
        Enrollment {
            id: 1,
            course_id: 10,
            student_id,
            progress: 0,
            status: EnrollmentStatus::Active,
            certificate_code: None,
            enrolled_at: now,
            completed_at: None,
            updated_at: now,
        }
    }

    #[test]
    fn test_enroll_rules() {
        let published = course(CourseStatus::Published);
        assert_eq!(EnrollmentPolicy::enroll(&STUDENT, &published, false), Ok(()));
        assert_eq!(
            EnrollmentPolicy::enroll(&STUDENT, &published, true),
            Err(Denial::AlreadyEnrolled)
        );
        assert_eq!(
            EnrollmentPolicy::enroll(&STUDENT, &course(CourseStatus::Draft), false),
            Err(Denial::CourseNotPublished)
        );
        assert_eq!(
            EnrollmentPolicy::enroll(&PARENT, &published, false),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn test_progress_and_drop() {
        let own = enrollment(STUDENT.id);
        let other = enrollment(99);
        assert!(EnrollmentPolicy::update_progress(&STUDENT, &own));
        assert!(!EnrollmentPolicy::update_progress(&STUDENT, &other));
        assert!(!EnrollmentPolicy::update_progress(&ADMIN, &own));
        assert!(EnrollmentPolicy::drop(&ADMIN, &other));
        assert!(!EnrollmentPolicy::drop(&TEACHER, &own));
    }
}
