pub mod detail;
pub mod grade;
pub mod list;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::respond;
use crate::models::PaginationQuery;
use crate::models::submissions::requests::{GradeSubmissionRequest, SubmitAssignmentRequest};

define_service!(SubmissionService);

impl SubmissionService {
    pub async fn submit(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        submit_request: SubmitAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        respond(submit::submit_assignment(self, request, assignment_id, submit_request).await)
    }

    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        pagination: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_submissions(self, request, assignment_id, pagination).await)
    }

    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(detail::get_submission(self, request, submission_id).await)
    }

    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        grade_request: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        respond(grade::grade_submission(self, request, submission_id, grade_request).await)
    }
}
