//! 数据模型定义
//!
//! 每个业务域分为 entities（业务实体）、requests（请求参数）、responses（响应结构）。

pub mod assignments;
pub mod auth;
pub mod badges;
pub mod common;
pub mod courses;
pub mod dashboards;
pub mod enrollments;
pub mod files;
pub mod notifications;
pub mod parent_links;
pub mod quizzes;
pub mod submissions;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
