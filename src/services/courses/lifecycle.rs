//! 课程状态流转：提交审核、审核、归档

use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::CourseService;
use crate::models::courses::entities::{Course, CourseStatus};
use crate::models::courses::requests::ReviewCourseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::{Actor, CoursePolicy};
use crate::services::context::{
    HandlerResult, conflict, forbidden, load_course, notify, require_actor, storage_failure,
};
use crate::services::notifications::NotificationMessage;
use crate::storage::Storage;

pub async fn submit_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    if !is_owner(&actor, &course) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "只有授课教师可以提交审核"));
    }

    let course = transition(storage.as_ref(), &course, CourseStatus::Pending, None).await?;
    info!("Course {} submitted for review by teacher {}", course.id, actor.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(course, "课程已提交审核")))
}

pub async fn review_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    review: ReviewCourseRequest,
) -> HandlerResult {
    let actor = require_actor(request)?;
    if !CoursePolicy::review(&actor) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "只有管理员可以审核课程"));
    }
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    let note = review
        .note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let target = if review.approve {
        CourseStatus::Published
    } else {
        CourseStatus::Rejected
    };

    let course = transition(storage.as_ref(), &course, target, note.clone()).await?;
    info!("Course {} reviewed by admin {}: {}", course.id, actor.id, course.status);

    let message = if review.approve {
        NotificationMessage::CourseApproved {
            course_id: course.id,
            course_title: course.title.clone(),
        }
    } else {
        NotificationMessage::CourseRejected {
            course_id: course.id,
            course_title: course.title.clone(),
            note,
        }
    };
    notify(request, vec![course.teacher_id], message).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(course, "课程审核完成")))
}

pub async fn archive_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    if !CoursePolicy::manage(&actor, &course) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "无权归档该课程"));
    }

    let course = transition(storage.as_ref(), &course, CourseStatus::Archived, None).await?;
    info!("Course {} archived by user {}", course.id, actor.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(course, "课程已归档")))
}

fn is_owner(actor: &Actor, course: &Course) -> bool {
    actor.is_teacher() && course.teacher_id == actor.id
}

/// 校验并执行状态流转；并发修改导致当前状态已变化时返回冲突
async fn transition(
    storage: &dyn Storage,
    course: &Course,
    to: CourseStatus,
    note: Option<String>,
) -> Result<Course, HttpResponse> {
    if !course.status.can_transition_to(to) {
        return Err(conflict(
            ErrorCode::CourseInvalidStatus,
            format!("课程状态不能从 {} 变更为 {}", course.status, to),
        ));
    }

    storage
        .transition_course_status(course.id, course.status, to, note)
        .await
        .map_err(storage_failure("更新课程状态失败"))?
        .ok_or_else(|| conflict(ErrorCode::CourseInvalidStatus, "课程状态已被修改，请刷新后重试"))
}
