use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::courses::requests::{
    CourseListParams, CreateCourseRequest, ReviewCourseRequest, UpdateCourseRequest,
};
use crate::models::quizzes::requests::CreateQuizRequest;
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, CourseService, EnrollmentService, QuizService};
use crate::utils::SafeCourseId;

// 懒加载的全局服务实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static QUIZ_SERVICE: Lazy<QuizService> = Lazy::new(QuizService::new_lazy);

// HTTP处理程序
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&req, query.into_inner()).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(&req, course_data.into_inner())
        .await
}

pub async fn get_course(req: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, course_id.0).await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeCourseId,
    update_data: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(&req, course_id.0, update_data.into_inner())
        .await
}

pub async fn delete_course(req: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(&req, course_id.0).await
}

pub async fn submit_course(req: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.submit_course(&req, course_id.0).await
}

pub async fn review_course(
    req: HttpRequest,
    course_id: SafeCourseId,
    review_data: web::Json<ReviewCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .review_course(&req, course_id.0, review_data.into_inner())
        .await
}

pub async fn archive_course(req: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.archive_course(&req, course_id.0).await
}

pub async fn leaderboard(req: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.leaderboard(&req, course_id.0).await
}

pub async fn enroll(req: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.enroll(&req, course_id.0).await
}

pub async fn list_roster(
    req: HttpRequest,
    course_id: SafeCourseId,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_roster(&req, course_id.0, query.into_inner())
        .await
}

pub async fn list_assignments(
    req: HttpRequest,
    course_id: SafeCourseId,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(&req, course_id.0, query.into_inner())
        .await
}

pub async fn create_assignment(
    req: HttpRequest,
    course_id: SafeCourseId,
    assignment_data: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, course_id.0, assignment_data.into_inner())
        .await
}

pub async fn list_quizzes(
    req: HttpRequest,
    course_id: SafeCourseId,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .list_quizzes(&req, course_id.0, query.into_inner())
        .await
}

pub async fn create_quiz(
    req: HttpRequest,
    course_id: SafeCourseId,
    quiz_data: web::Json<CreateQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .create_quiz(&req, course_id.0, quiz_data.into_inner())
        .await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                // 管理员查看全部，教师查看自己的，学生与家长浏览已发布的课程
                web::resource("").route(web::get().to(list_courses)).route(
                    web::post()
                        .to(create_course)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                // 查看、修改、删除由课程策略判断
                web::resource("/{course_id}")
                    .route(web::get().to(get_course))
                    .route(web::put().to(update_course))
                    .route(web::delete().to(delete_course)),
            )
            .route(
                "/{course_id}/submit",
                web::post()
                    .to(submit_course)
                    .wrap(middlewares::RequireRole::new(&UserRole::Teacher)),
            )
            .route(
                "/{course_id}/review",
                web::post()
                    .to(review_course)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .route(
                "/{course_id}/archive",
                web::post()
                    .to(archive_course)
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .route("/{course_id}/leaderboard", web::get().to(leaderboard))
            .service(
                web::resource("/{course_id}/enrollments")
                    .route(
                        web::post()
                            .to(enroll)
                            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                    )
                    .route(
                        web::get()
                            .to(list_roster)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{course_id}/assignments")
                    .route(web::get().to(list_assignments))
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{course_id}/quizzes")
                    .route(web::get().to(list_quizzes))
                    .route(
                        web::post()
                            .to(create_quiz)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            ),
    );
}
