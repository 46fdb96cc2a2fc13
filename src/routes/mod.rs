pub mod assignments;

pub mod auth;

pub mod badges;

pub mod courses;

pub mod dashboards;

pub mod enrollments;

pub mod files;

pub mod notifications;

pub mod parent_links;

pub mod quizzes;

pub mod submissions;

pub mod users;

pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use badges::configure_badge_routes;
pub use courses::configure_course_routes;
pub use dashboards::configure_dashboard_routes;
pub use enrollments::configure_enrollment_routes;
pub use files::configure_file_routes;
pub use notifications::configure_notification_routes;
pub use parent_links::configure_parent_link_routes;
pub use quizzes::configure_quiz_routes;
pub use submissions::configure_submission_routes;
pub use users::configure_user_routes;
