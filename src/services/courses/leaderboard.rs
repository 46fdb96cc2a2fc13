use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse};

use super::CourseService;
use super::ranking::{StudentItems, rank_students};
use crate::models::courses::responses::LeaderboardResponse;
use crate::models::submissions::entities::score_percentage;
use crate::models::users::entities::UserSummary;
use crate::models::{ApiResponse, ErrorCode};
use crate::policies::CoursePolicy;
use crate::services::context::{
    HandlerResult, course_relation, forbidden, load_course, require_actor, storage_failure,
};

pub async fn course_leaderboard(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    let relation = course_relation(storage.as_ref(), &actor, course_id).await?;
    if !CoursePolicy::view_content(&actor, &course, relation) {
        return Err(forbidden(ErrorCode::CoursePermissionDenied, "无权查看该课程排行榜"));
    }

    let enrollments = storage
        .list_course_enrollments(course_id)
        .await
        .map_err(storage_failure("查询选课记录失败"))?;
    let student_ids: Vec<i64> = enrollments.iter().map(|e| e.student_id).collect();
    let students = storage
        .get_users_by_ids(&student_ids)
        .await
        .map_err(storage_failure("查询学生信息失败"))?;

    let mut items: HashMap<i64, StudentItems> = students
        .iter()
        .map(|u| (u.id, StudentItems::new(UserSummary::from(u))))
        .collect();

    // 已评分的作业
    let assignments = storage
        .list_assignments_for_courses(&[course_id])
        .await
        .map_err(storage_failure("查询作业失败"))?;
    let max_scores: HashMap<i64, f64> = assignments.iter().map(|a| (a.id, a.max_score)).collect();
    let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
    let submissions = storage
        .list_submissions_for_assignments(&assignment_ids)
        .await
        .map_err(storage_failure("查询提交记录失败"))?;

    for submission in submissions.iter().filter(|s| s.is_graded()) {
        let percentage = submission
            .score
            .zip(max_scores.get(&submission.assignment_id).copied())
            .and_then(|(score, max)| score_percentage(score, max));
        if let (Some(percentage), Some(entry)) = (percentage, items.get_mut(&submission.student_id)) {
            entry.percentages.push(percentage);
        }
    }

    // 每个测验取最好的一次作答
    let quizzes = storage
        .list_quizzes_for_courses(&[course_id])
        .await
        .map_err(storage_failure("查询测验失败"))?;
    let quiz_ids: Vec<i64> = quizzes.iter().map(|q| q.id).collect();
    let attempts = storage
        .list_attempts_for_quizzes(&quiz_ids)
        .await
        .map_err(storage_failure("查询测验作答失败"))?;

    let mut best: HashMap<(i64, i64), f64> = HashMap::new();
    for attempt in &attempts {
        best.entry((attempt.quiz_id, attempt.student_id))
            .and_modify(|p| *p = p.max(attempt.percentage))
            .or_insert(attempt.percentage);
    }
    for ((_, student_id), percentage) in best {
        if let Some(entry) = items.get_mut(&student_id) {
            entry.percentages.push(percentage);
        }
    }

    let entries = rank_students(items.into_values().collect());

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        LeaderboardResponse { course_id, entries },
        "查询成功",
    )))
}
