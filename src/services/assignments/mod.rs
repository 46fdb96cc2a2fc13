pub mod create;
pub mod detail;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::respond;
use crate::models::PaginationQuery;
use crate::models::assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};

define_service!(AssignmentService);

impl AssignmentService {
    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        course_id: i64,
        pagination: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_assignments(self, request, course_id, pagination).await)
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        course_id: i64,
        create_request: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        respond(create::create_assignment(self, request, course_id, create_request).await)
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(detail::get_assignment(self, request, assignment_id).await)
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        update_request: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        respond(detail::update_assignment(self, request, assignment_id, update_request).await)
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(detail::delete_assignment(self, request, assignment_id).await)
    }
}

/// 满分必须为正数
pub(crate) fn validate_max_score(max_score: f64) -> Result<(), &'static str> {
    if max_score.is_finite() && max_score > 0.0 {
        Ok(())
    } else {
        Err("满分必须大于 0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_max_score() {
        assert!(validate_max_score(100.0).is_ok());
        assert!(validate_max_score(0.0).is_err());
        assert!(validate_max_score(-5.0).is_err());
        assert!(validate_max_score(f64::NAN).is_err());
    }
}
