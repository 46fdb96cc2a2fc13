use super::Actor;

pub struct BadgePolicy;

impl BadgePolicy {
    pub fn manage(actor: &Actor) -> bool {
        actor.is_admin()
    }

    pub fn award(actor: &Actor) -> bool {
        actor.is_admin() || actor.is_teacher()
    }

    pub fn revoke(actor: &Actor) -> bool {
        actor.is_admin()
    }

    /// 本人、管理员、教师、关联家长可查看用户的徽章
    pub fn view_user_badges(actor: &Actor, user_id: i64, linked_parent: bool) -> bool {
        actor.id == user_id
            || actor.is_admin()
            || actor.is_teacher()
            || (actor.is_parent() && linked_parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::fixtures::*;

    #[test]
    fn test_badge_roles() {
        assert!(BadgePolicy::manage(&ADMIN));
        assert!(!BadgePolicy::manage(&TEACHER));
        assert!(BadgePolicy::award(&TEACHER));
        assert!(!BadgePolicy::award(&STUDENT));
        assert!(!BadgePolicy::revoke(&TEACHER));
    }

    #[test]
    fn test_view_user_badges() {
        assert!(BadgePolicy::view_user_badges(&STUDENT, STUDENT.id, false));
        assert!(!BadgePolicy::view_user_badges(&STUDENT, 99, false));
        assert!(BadgePolicy::view_user_badges(&PARENT, STUDENT.id, true));
        assert!(!BadgePolicy::view_user_badges(&PARENT, STUDENT.id, false));
    }
}
