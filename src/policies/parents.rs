use super::{Actor, Denial, allow};
use crate::models::parent_links::entities::{LinkStatus, ParentStudentLink};

pub struct ParentPolicy;

impl ParentPolicy {
    /// 管理员，或与该学生关联已生效的家长
    pub fn view_child(actor: &Actor, link: Option<&ParentStudentLink>) -> Result<(), Denial> {
        if actor.is_admin() {
            return Ok(());
        }
        let linked = actor.is_parent()
            && link.is_some_and(|l| l.parent_id == actor.id && l.status == LinkStatus::Active);
        allow(linked, Denial::ChildAccessDenied)
    }

    /// 只有被申请的学生能响应待确认的申请
    pub fn respond_to_request(actor: &Actor, link: &ParentStudentLink) -> Result<(), Denial> {
        allow(
            actor.is_student() && link.student_id == actor.id,
            Denial::Forbidden,
        )?;
        allow(link.status.can_respond(), Denial::RequestNotPending)
    }

    /// 解除关联：关联双方或管理员
    pub fn remove_link(actor: &Actor, link: &ParentStudentLink) -> bool {
        actor.is_admin() || link.parent_id == actor.id || link.student_id == actor.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parent_links::entities::LinkSource;
    use crate::policies::fixtures::*;
    use chrono::Utc;

    fn link(status: LinkStatus) -> ParentStudentLink {
        let now = Utc::now();
        ParentStudentLink {
            id: 50,
            parent_id: PARENT.id,
            student_id: STUDENT.id,
            status,
            source: LinkSource::Request,
            created_at: now,
            updated_at: now,
            responded_at: None,
        }
    }

    #[test]
    fn test_view_child_requires_active_link() {
        assert_eq!(ParentPolicy::view_child(&ADMIN, None), Ok(()));
        assert_eq!(
            ParentPolicy::view_child(&PARENT, Some(&link(LinkStatus::Active))),
            Ok(())
        );
        assert_eq!(
            ParentPolicy::view_child(&PARENT, Some(&link(LinkStatus::Pending))),
            Err(Denial::ChildAccessDenied)
        );
        assert_eq!(
            ParentPolicy::view_child(&PARENT, None),
            Err(Denial::ChildAccessDenied)
        );
        assert_eq!(
            ParentPolicy::view_child(&TEACHER, Some(&link(LinkStatus::Active))),
            Err(Denial::ChildAccessDenied)
        );
    }

    #[test]
    fn test_respond_only_by_target_student() {
        assert_eq!(
            ParentPolicy::respond_to_request(&STUDENT, &link(LinkStatus::Pending)),
            Ok(())
        );
        assert_eq!(
            ParentPolicy::respond_to_request(&PARENT, &link(LinkStatus::Pending)),
            Err(Denial::Forbidden)
        );
        assert_eq!(
            ParentPolicy::respond_to_request(&STUDENT, &link(LinkStatus::Rejected)),
            Err(Denial::RequestNotPending)
        );
        assert!(ParentPolicy::remove_link(&PARENT, &link(LinkStatus::Active)));
        assert!(!ParentPolicy::remove_link(&TEACHER, &link(LinkStatus::Active)));
    }
}
