use super::{Actor, CourseRelation, Denial, allow};
use crate::models::courses::entities::{Course, CourseStatus};

pub struct CoursePolicy;

impl CoursePolicy {
    /// 管理员与授课教师总能查看；已发布课程对所有登录用户可见
    pub fn view(actor: &Actor, course: &Course) -> bool {
        actor.is_admin() || Self::is_owner(actor, course) || course.status == CourseStatus::Published
    }

    pub fn manage(actor: &Actor, course: &Course) -> bool {
        actor.is_admin() || Self::is_owner(actor, course)
    }

    /// 修改课程内容：需要管理权限且课程处于可编辑状态
    pub fn edit(actor: &Actor, course: &Course) -> Result<(), Denial> {
        allow(Self::manage(actor, course), Denial::Forbidden)?;
        allow(course.status.is_editable(), Denial::CourseNotEditable)
    }

    pub fn review(actor: &Actor) -> bool {
        actor.is_admin()
    }

    pub fn view_roster(actor: &Actor, course: &Course) -> bool {
        Self::manage(actor, course)
    }

    /// 课程内容（作业、测验）的可见性
    pub fn view_content(actor: &Actor, course: &Course, relation: CourseRelation) -> bool {
        Self::manage(actor, course) || relation.enrolled || relation.parent_of_enrolled
    }

    fn is_owner(actor: &Actor, course: &Course) -> bool {
        actor.is_teacher() && course.teacher_id == actor.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::fixtures::*;

    #[test]
    fn test_view_draft_only_owner_and_admin() {
        let draft = course(CourseStatus::Draft);
        assert!(CoursePolicy::view(&ADMIN, &draft));
        assert!(CoursePolicy::view(&TEACHER, &draft));
        assert!(!CoursePolicy::view(&OTHER_TEACHER, &draft));
        assert!(!CoursePolicy::view(&STUDENT, &draft));

        let published = course(CourseStatus::Published);
        assert!(CoursePolicy::view(&STUDENT, &published));
        assert!(CoursePolicy::view(&PARENT, &published));
    }

    #[test]
    fn test_manage_and_review() {
        let published = course(CourseStatus::Published);
        assert!(CoursePolicy::manage(&TEACHER, &published));
        assert!(!CoursePolicy::manage(&OTHER_TEACHER, &published));
        assert!(CoursePolicy::review(&ADMIN));
        assert!(!CoursePolicy::review(&TEACHER));
        assert!(!CoursePolicy::view_roster(&STUDENT, &published));
    }

    #[test]
    fn test_edit_refuses_pending_course() {
        assert_eq!(CoursePolicy::edit(&TEACHER, &course(CourseStatus::Draft)), Ok(()));
        assert_eq!(
            CoursePolicy::edit(&TEACHER, &course(CourseStatus::Pending)),
            Err(Denial::CourseNotEditable)
        );
        assert_eq!(
            CoursePolicy::edit(&OTHER_TEACHER, &course(CourseStatus::Draft)),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn test_view_content_requires_relation() {
        let published = course(CourseStatus::Published);
        assert!(!CoursePolicy::view_content(&STUDENT, &published, CourseRelation::default()));
        assert!(CoursePolicy::view_content(
            &STUDENT,
            &published,
            CourseRelation { enrolled: true, parent_of_enrolled: false }
        ));
        assert!(CoursePolicy::view_content(
            &PARENT,
            &published,
            CourseRelation { enrolled: false, parent_of_enrolled: true }
        ));
    }
}
