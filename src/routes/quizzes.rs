use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::quizzes::requests::SubmitAttemptRequest;
use crate::models::users::entities::UserRole;
use crate::services::QuizService;
use crate::utils::SafeQuizId;

static QUIZ_SERVICE: Lazy<QuizService> = Lazy::new(QuizService::new_lazy);

pub async fn get_quiz(req: HttpRequest, quiz_id: SafeQuizId) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.get_quiz(&req, quiz_id.0).await
}

pub async fn delete_quiz(req: HttpRequest, quiz_id: SafeQuizId) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.delete_quiz(&req, quiz_id.0).await
}

pub async fn submit_attempt(
    req: HttpRequest,
    quiz_id: SafeQuizId,
    attempt_data: web::Json<SubmitAttemptRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .submit_attempt(&req, quiz_id.0, attempt_data.into_inner())
        .await
}

pub async fn list_attempts(req: HttpRequest, quiz_id: SafeQuizId) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.list_attempts(&req, quiz_id.0).await
}

// 配置路由
pub fn configure_quiz_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/quizzes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{quiz_id}")
                    .route(web::get().to(get_quiz))
                    .route(
                        web::delete()
                            .to(delete_quiz)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{quiz_id}/attempts")
                    .route(
                        web::post()
                            .to(submit_attempt)
                            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                    )
                    .route(web::get().to(list_attempts)),
            ),
    );
}
