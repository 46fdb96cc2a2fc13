//! 存储层测试辅助函数

use super::SeaOrmStorage;
use crate::models::{
    courses::{
        entities::{Course, CourseStatus},
        requests::CreateCourseRequest,
    },
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use crate::storage::Storage;

pub(crate) async fn create_user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "not-a-real-hash".to_string(),
            role,
            display_name: None,
            avatar_url: None,
        })
        .await
        .expect("create test user")
}

/// 创建并走完审核流程的已发布课程
pub(crate) async fn create_published_course(storage: &SeaOrmStorage, teacher_id: i64) -> Course {
    let course = storage
        .create_course(
            teacher_id,
            CreateCourseRequest {
                title: "Rust 101".to_string(),
                description: None,
                category: None,
                teacher_id: None,
            },
        )
        .await
        .expect("create test course");
    storage
        .transition_course_status(course.id, CourseStatus::Draft, CourseStatus::Pending, None)
        .await
        .expect("submit test course");
    storage
        .transition_course_status(course.id, CourseStatus::Pending, CourseStatus::Published, None)
        .await
        .expect("publish test course")
        .expect("course exists")
}
