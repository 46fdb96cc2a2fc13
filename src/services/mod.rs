//! 业务逻辑层
//!
//! 每个业务域一个 `XxxService`，路由层持有懒加载的全局实例；
//! 具体操作拆分在各自的文件中，统一返回 [`context::HandlerResult`]。

/// 生成服务结构体：存储默认从请求的 app_data 中获取，测试时可直接注入
macro_rules! define_service {
    ($name:ident) => {
        pub struct $name {
            storage: Option<std::sync::Arc<dyn $crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub fn with_storage(storage: std::sync::Arc<dyn $crate::storage::Storage>) -> Self {
                Self {
                    storage: Some(storage),
                }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> Result<std::sync::Arc<dyn $crate::storage::Storage>, actix_web::HttpResponse>
            {
                match &self.storage {
                    Some(storage) => Ok(storage.clone()),
                    None => $crate::services::context::storage_from_request(request),
                }
            }
        }
    };
}

pub mod assignments;
pub mod auth;
pub mod badges;
pub(crate) mod context;
pub mod courses;
pub mod dashboards;
pub mod enrollments;
pub mod files;
pub mod notifications;
pub mod parent_links;
pub mod quizzes;
pub mod submissions;
pub mod users;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use badges::BadgeService;
pub use courses::CourseService;
pub use dashboards::DashboardService;
pub use enrollments::EnrollmentService;
pub use files::FileService;
pub use notifications::{NotificationDispatcher, NotificationMessage, NotificationService};
pub use parent_links::ParentLinkService;
pub use quizzes::QuizService;
pub use submissions::SubmissionService;
pub use users::UserService;
