pub mod create;
pub mod detail;
pub mod leaderboard;
pub mod lifecycle;
pub mod list;
pub mod ranking;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::respond;
use crate::models::courses::requests::{
    CourseListParams, CreateCourseRequest, ReviewCourseRequest, UpdateCourseRequest,
};

define_service!(CourseService);

impl CourseService {
    pub async fn list_courses(
        &self,
        request: &HttpRequest,
        params: CourseListParams,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_courses(self, request, params).await)
    }

    pub async fn create_course(
        &self,
        request: &HttpRequest,
        create_request: CreateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        respond(create::create_course(self, request, create_request).await)
    }

    pub async fn get_course(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        respond(detail::get_course(self, request, course_id).await)
    }

    pub async fn update_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
        update_request: UpdateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        respond(detail::update_course(self, request, course_id, update_request).await)
    }

    pub async fn delete_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(detail::delete_course(self, request, course_id).await)
    }

    pub async fn submit_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(lifecycle::submit_course(self, request, course_id).await)
    }

    pub async fn review_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
        review_request: ReviewCourseRequest,
    ) -> ActixResult<HttpResponse> {
        respond(lifecycle::review_course(self, request, course_id, review_request).await)
    }

    pub async fn archive_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(lifecycle::archive_course(self, request, course_id).await)
    }

    pub async fn leaderboard(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        respond(leaderboard::course_leaderboard(self, request, course_id).await)
    }
}
