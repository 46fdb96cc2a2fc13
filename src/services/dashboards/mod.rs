pub mod calendar;
pub mod grades;
pub(crate) mod student_work;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::respond;
use crate::models::dashboards::requests::CalendarParams;

define_service!(DashboardService);

impl DashboardService {
    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(summary::dashboard(self, request).await)
    }

    pub async fn my_grades(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(grades::my_grades(self, request).await)
    }

    pub async fn child_grades(&self, request: &HttpRequest, student_id: i64) -> ActixResult<HttpResponse> {
        respond(grades::child_grades(self, request, student_id).await)
    }

    pub async fn my_calendar(
        &self,
        request: &HttpRequest,
        params: CalendarParams,
    ) -> ActixResult<HttpResponse> {
        respond(grades::my_calendar(self, request, params).await)
    }

    pub async fn child_calendar(
        &self,
        request: &HttpRequest,
        student_id: i64,
        params: CalendarParams,
    ) -> ActixResult<HttpResponse> {
        respond(grades::child_calendar(self, request, student_id, params).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{HttpMessage, http::StatusCode, test::TestRequest};
    use std::sync::Arc;

    use crate::models::parent_links::entities::LinkSource;
    use crate::models::users::entities::{User, UserRole};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::create_user;

    fn request_as(user: &User) -> HttpRequest {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(user.clone());
        req
    }

    #[tokio::test]
    async fn test_child_grades_require_active_link() {
        let storage = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let parent = create_user(&storage, "parent1", UserRole::Parent).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let service = DashboardService::with_storage(storage.clone());

        let resp = service.child_grades(&request_as(&parent), student.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // 待确认的申请不授予访问权限
        storage
            .request_link(parent.id, student.id)
            .await
            .unwrap()
            .unwrap();
        let resp = service.child_grades(&request_as(&parent), student.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        storage
            .create_direct_link(parent.id, student.id, LinkSource::Admin)
            .await
            .unwrap()
            .unwrap();
        let resp = service.child_grades(&request_as(&parent), student.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_student_sees_own_empty_grades() {
        let storage = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let service = DashboardService::with_storage(storage);

        let resp = service.my_grades(&request_as(&student)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
