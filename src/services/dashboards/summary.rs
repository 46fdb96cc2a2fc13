//! 按角色汇总的首页数据

use actix_web::{HttpRequest, HttpResponse};
use chrono::Utc;

use super::DashboardService;
use super::student_work::StudentWork;
use crate::models::ApiResponse;
use crate::models::courses::entities::CourseStatus;
use crate::models::dashboards::responses::{
    AdminDashboard, ChildSummary, DashboardResponse, LabelCount, ParentDashboard,
    StudentDashboard, TeacherDashboard,
};
use crate::models::parent_links::entities::LinkStatus;
use crate::models::users::entities::UserRole;
use crate::policies::Actor;
use crate::services::context::{HandlerResult, require_actor, storage_failure};
use crate::storage::Storage;

fn label_counts(rows: Vec<(String, i64)>) -> Vec<LabelCount> {
    rows.into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect()
}

fn count_of(rows: &[LabelCount], status: CourseStatus) -> i64 {
    let label = status.to_string();
    rows.iter()
        .find(|row| row.label == label)
        .map_or(0, |row| row.count)
}

pub async fn dashboard(service: &DashboardService, request: &HttpRequest) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;
    let storage = storage.as_ref();

    let response = match actor.role {
        UserRole::Admin => DashboardResponse::Admin(admin_dashboard(storage).await?),
        UserRole::Teacher => DashboardResponse::Teacher(teacher_dashboard(storage, &actor).await?),
        UserRole::Student => DashboardResponse::Student(student_dashboard(storage, &actor).await?),
        UserRole::Parent => DashboardResponse::Parent(parent_dashboard(storage, &actor).await?),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}

async fn admin_dashboard(storage: &dyn Storage) -> Result<AdminDashboard, HttpResponse> {
    let users_by_role = storage
        .count_users_by_role()
        .await
        .map_err(storage_failure("统计用户失败"))?;
    let courses_by_status = label_counts(
        storage
            .count_courses_by_status(None)
            .await
            .map_err(storage_failure("统计课程失败"))?,
    );
    let total_enrollments = storage
        .count_enrollments()
        .await
        .map_err(storage_failure("统计选课失败"))?;

    Ok(AdminDashboard {
        users_by_role: label_counts(users_by_role),
        pending_reviews: count_of(&courses_by_status, CourseStatus::Pending),
        courses_by_status,
        total_enrollments,
    })
}

async fn teacher_dashboard(storage: &dyn Storage, actor: &Actor) -> Result<TeacherDashboard, HttpResponse> {
    let courses = label_counts(
        storage
            .count_courses_by_status(Some(actor.id))
            .await
            .map_err(storage_failure("统计课程失败"))?,
    );
    let distinct_students = storage
        .count_distinct_students_for_teacher(actor.id)
        .await
        .map_err(storage_failure("统计学生失败"))?;
    let submissions_awaiting_grading = storage
        .count_ungraded_submissions_for_teacher(actor.id)
        .await
        .map_err(storage_failure("统计待批改提交失败"))?;

    Ok(TeacherDashboard {
        course_count: courses.iter().map(|row| row.count).sum(),
        published_courses: count_of(&courses, CourseStatus::Published),
        distinct_students,
        submissions_awaiting_grading,
    })
}

async fn unread_count(storage: &dyn Storage, user_id: i64) -> Result<i64, HttpResponse> {
    storage
        .get_unread_notification_count(user_id)
        .await
        .map_err(storage_failure("统计未读通知失败"))
}

async fn badge_count(storage: &dyn Storage, user_id: i64) -> Result<i64, HttpResponse> {
    storage
        .count_user_badges(user_id)
        .await
        .map_err(storage_failure("统计徽章失败"))
}

async fn student_dashboard(storage: &dyn Storage, actor: &Actor) -> Result<StudentDashboard, HttpResponse> {
    let work = StudentWork::load(storage, actor.id).await?;

    Ok(StudentDashboard {
        active_enrollments: work.active_count(),
        completed_enrollments: work.completed_count(),
        average_progress: work.average_progress(),
        upcoming_deadlines: work.upcoming_unsubmitted(Utc::now()),
        badge_count: badge_count(storage, actor.id).await?,
        unread_notifications: unread_count(storage, actor.id).await?,
    })
}

async fn parent_dashboard(storage: &dyn Storage, actor: &Actor) -> Result<ParentDashboard, HttpResponse> {
    let links = storage
        .list_links_for_parent(actor.id, Some(LinkStatus::Active))
        .await
        .map_err(storage_failure("查询已关联学生失败"))?;

    let now = Utc::now();
    let mut children = Vec::with_capacity(links.len());
    for view in links {
        let work = StudentWork::load(storage, view.student.id).await?;
        children.push(ChildSummary {
            enrolled_courses: work.enrollments.len() as i64,
            completed_courses: work.completed_count(),
            average_progress: work.average_progress(),
            average_grade: work.average_percentage(),
            badge_count: badge_count(storage, view.student.id).await?,
            upcoming_deadlines: work.upcoming_unsubmitted(now),
            student: view.student,
        });
    }

    Ok(ParentDashboard {
        children,
        unread_notifications: unread_count(storage, actor.id).await?,
    })
}
