//! 学生成绩与日历（学生本人或其关联家长）

use actix_web::{HttpRequest, HttpResponse};
use chrono::Utc;

use super::DashboardService;
use super::calendar::CalendarWindow;
use super::student_work::StudentWork;
use crate::config::AppConfig;
use crate::models::dashboards::{
    requests::CalendarParams,
    responses::{CalendarResponse, StudentGradesResponse},
};
use crate::models::users::entities::{User, UserRole, UserSummary};
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::{Actor, ParentPolicy};
use crate::services::context::{
    HandlerResult, bad_request, load_user, not_found, require_actor, require_user, storage_failure,
};
use crate::storage::Storage;

/// 校验家长对孩子的访问权限并返回学生信息
async fn load_child(storage: &dyn Storage, actor: &Actor, student_id: i64) -> Result<User, HttpResponse> {
    let link = storage
        .get_link(actor.id, student_id)
        .await
        .map_err(storage_failure("查询关联失败"))?;
    ParentPolicy::view_child(actor, link.as_ref()).map_err(|denial| denial.into_response())?;

    let student = load_user(storage, student_id).await?;
    if student.role != UserRole::Student {
        return Err(not_found(ErrorCode::UserNotFound, "学生不存在"));
    }
    Ok(student)
}

async fn grades_response(storage: &dyn Storage, student: &User) -> HandlerResult {
    let work = StudentWork::load(storage, student.id).await?;

    let response = StudentGradesResponse {
        student: UserSummary::from(student),
        assignments: work.assignment_grades(),
        quizzes: work.quiz_grades(),
        average_percentage: work.average_percentage(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}

async fn calendar_response(
    storage: &dyn Storage,
    student_id: i64,
    params: CalendarParams,
) -> HandlerResult {
    let config = &AppConfig::get().calendar;
    let window = CalendarWindow::resolve(
        params.from,
        params.to,
        Utc::now(),
        config.default_window_days,
        config.max_window_days,
    )
    .map_err(|msg| bad_request(ErrorCode::CalendarRangeInvalid, msg))?;

    let work = StudentWork::load(storage, student_id).await?;
    let response = CalendarResponse {
        student_id,
        from: window.from,
        to: window.to,
        events: work.events(window),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}

pub async fn my_grades(service: &DashboardService, request: &HttpRequest) -> HandlerResult {
    let user = require_user(request)?;
    let storage = service.get_storage(request)?;
    grades_response(storage.as_ref(), &user).await
}

pub async fn child_grades(
    service: &DashboardService,
    request: &HttpRequest,
    student_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;
    let student = load_child(storage.as_ref(), &actor, student_id).await?;
    grades_response(storage.as_ref(), &student).await
}

pub async fn my_calendar(
    service: &DashboardService,
    request: &HttpRequest,
    params: CalendarParams,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;
    calendar_response(storage.as_ref(), actor.id, params).await
}

pub async fn child_calendar(
    service: &DashboardService,
    request: &HttpRequest,
    student_id: i64,
    params: CalendarParams,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;
    let student = load_child(storage.as_ref(), &actor, student_id).await?;
    calendar_response(storage.as_ref(), student.id, params).await
}
