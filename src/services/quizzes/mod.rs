pub mod attempts;
pub mod detail;
pub mod list;
pub mod scoring;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::respond;
use crate::models::PaginationQuery;
use crate::models::quizzes::requests::{CreateQuizRequest, SubmitAttemptRequest};

define_service!(QuizService);

impl QuizService {
    pub async fn list_quizzes(
        &self,
        request: &HttpRequest,
        course_id: i64,
        pagination: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_quizzes(self, request, course_id, pagination).await)
    }

    pub async fn create_quiz(
        &self,
        request: &HttpRequest,
        course_id: i64,
        create_request: CreateQuizRequest,
    ) -> ActixResult<HttpResponse> {
        respond(list::create_quiz(self, request, course_id, create_request).await)
    }

    pub async fn get_quiz(&self, request: &HttpRequest, quiz_id: i64) -> ActixResult<HttpResponse> {
        respond(detail::get_quiz(self, request, quiz_id).await)
    }

    pub async fn delete_quiz(&self, request: &HttpRequest, quiz_id: i64) -> ActixResult<HttpResponse> {
        respond(detail::delete_quiz(self, request, quiz_id).await)
    }

    pub async fn submit_attempt(
        &self,
        request: &HttpRequest,
        quiz_id: i64,
        attempt_request: SubmitAttemptRequest,
    ) -> ActixResult<HttpResponse> {
        respond(attempts::submit_attempt(self, request, quiz_id, attempt_request).await)
    }

    pub async fn list_attempts(&self, request: &HttpRequest, quiz_id: i64) -> ActixResult<HttpResponse> {
        respond(attempts::list_attempts(self, request, quiz_id).await)
    }
}
