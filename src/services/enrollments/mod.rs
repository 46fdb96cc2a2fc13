pub mod certificate;
pub mod enroll;
pub mod list;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::respond;
use crate::models::PaginationQuery;
use crate::models::enrollments::requests::UpdateProgressRequest;

define_service!(EnrollmentService);

impl EnrollmentService {
    pub async fn enroll(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        respond(enroll::enroll(self, request, course_id).await)
    }

    pub async fn list_roster(
        &self,
        request: &HttpRequest,
        course_id: i64,
        pagination: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_roster(self, request, course_id, pagination).await)
    }

    pub async fn list_my_enrollments(
        &self,
        request: &HttpRequest,
        pagination: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_my_enrollments(self, request, pagination).await)
    }

    pub async fn update_progress(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
        progress_request: UpdateProgressRequest,
    ) -> ActixResult<HttpResponse> {
        respond(manage::update_progress(self, request, enrollment_id, progress_request).await)
    }

    pub async fn drop_enrollment(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(manage::drop_enrollment(self, request, enrollment_id).await)
    }

    pub async fn verify_certificate(
        &self,
        request: &HttpRequest,
        code: String,
    ) -> ActixResult<HttpResponse> {
        respond(certificate::verify_certificate(self, request, code).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{HttpMessage, http::StatusCode, test::TestRequest};
    use std::sync::Arc;

    use crate::models::users::entities::{User, UserRole};
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::{create_published_course, create_user};

    fn request_as(user: &User) -> HttpRequest {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(user.clone());
        req
    }

    #[tokio::test]
    async fn test_enroll_once_then_conflict() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let course = create_published_course(&storage, teacher.id).await;
        let service = EnrollmentService::with_storage(Arc::new(storage));

        let first = service.enroll(&request_as(&student), course.id).await.unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = service.enroll(&request_as(&student), course.id).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_teacher_cannot_enroll() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let course = create_published_course(&storage, teacher.id).await;
        let service = EnrollmentService::with_storage(Arc::new(storage));

        let resp = service.enroll(&request_as(&teacher), course.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_certificate_is_not_found() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let service = EnrollmentService::with_storage(Arc::new(storage));
        let req = TestRequest::default().to_http_request();

        let resp = service
            .verify_certificate(&req, "NOPE-0000".to_string())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_enroll_requires_login() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let service = EnrollmentService::with_storage(Arc::new(storage));
        let req = TestRequest::default().to_http_request();

        let resp = service.enroll(&req, 1).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
