//! 家长与学生的关联
//!
//! 关联有三种建立方式：家长按用户名/邮箱发起申请由学生确认、家长兑换学生生成的邀请码、
//! 管理员直接关联。后两种立即生效。

pub mod admin;
pub mod parent;
pub mod student;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::{conflict, respond};
use crate::models::ErrorCode;
use crate::models::parent_links::entities::LinkConflict;
use crate::models::parent_links::requests::{
    AdminCreateLinkRequest, ConnectionRequest, ParentLinkListParams, RedeemInviteCodeRequest,
};

define_service!(ParentLinkService);

impl ParentLinkService {
    pub async fn create_invite_code(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(student::create_invite_code(self, request).await)
    }

    pub async fn list_connection_requests(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(student::list_connection_requests(self, request).await)
    }

    pub async fn respond_to_request(
        &self,
        request: &HttpRequest,
        link_id: i64,
        accept: bool,
    ) -> ActixResult<HttpResponse> {
        respond(student::respond_to_request(self, request, link_id, accept).await)
    }

    pub async fn list_parents(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(student::list_parents(self, request).await)
    }

    pub async fn request_connection(
        &self,
        request: &HttpRequest,
        connection_request: ConnectionRequest,
    ) -> ActixResult<HttpResponse> {
        respond(parent::request_connection(self, request, connection_request).await)
    }

    pub async fn redeem_invite_code(
        &self,
        request: &HttpRequest,
        redeem_request: RedeemInviteCodeRequest,
    ) -> ActixResult<HttpResponse> {
        respond(parent::redeem_invite_code(self, request, redeem_request).await)
    }

    pub async fn list_children(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(parent::list_children(self, request).await)
    }

    pub async fn remove_child(&self, request: &HttpRequest, student_id: i64) -> ActixResult<HttpResponse> {
        respond(parent::remove_child(self, request, student_id).await)
    }

    pub async fn list_links(
        &self,
        request: &HttpRequest,
        params: ParentLinkListParams,
    ) -> ActixResult<HttpResponse> {
        respond(admin::list_links(self, request, params).await)
    }

    pub async fn create_link(
        &self,
        request: &HttpRequest,
        create_request: AdminCreateLinkRequest,
    ) -> ActixResult<HttpResponse> {
        respond(admin::create_link(self, request, create_request).await)
    }

    pub async fn delete_link(&self, request: &HttpRequest, link_id: i64) -> ActixResult<HttpResponse> {
        respond(admin::delete_link(self, request, link_id).await)
    }
}

pub(crate) fn link_conflict_response(link_conflict: LinkConflict) -> HttpResponse {
    let code = match link_conflict {
        LinkConflict::AlreadyConnected => ErrorCode::AlreadyConnected,
        LinkConflict::RequestAlreadyPending => ErrorCode::RequestAlreadyPending,
    };
    conflict(code, link_conflict.message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{HttpMessage, http::StatusCode, test::TestRequest};
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    use crate::models::parent_links::entities::{LinkSource, LinkStatus};
    use crate::models::users::entities::{User, UserRole};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::create_user;

    fn request_as(user: &User) -> HttpRequest {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(user.clone());
        req
    }

    fn connect_to(identifier: &str) -> ConnectionRequest {
        ConnectionRequest {
            identifier: identifier.to_string(),
        }
    }

    fn redeem(code: &str) -> RedeemInviteCodeRequest {
        RedeemInviteCodeRequest {
            code: code.to_string(),
        }
    }

    #[tokio::test]
    async fn test_request_connection_conflicts() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let parent = create_user(&storage, "parent01", UserRole::Parent).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let storage = Arc::new(storage);
        let service = ParentLinkService::with_storage(storage.clone());

        let resp = service
            .request_connection(&request_as(&parent), connect_to(&teacher.username))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = service
            .request_connection(&request_as(&parent), connect_to("nobody"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = service
            .request_connection(&request_as(&parent), connect_to("student1@example.com"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        // 待确认的申请不能重复发起
        let resp = service
            .request_connection(&request_as(&parent), connect_to(&student.username))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let link = storage.get_link(parent.id, student.id).await.unwrap().unwrap();
        let resp = service
            .respond_to_request(&request_as(&student), link.id, true)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = service
            .request_connection(&request_as(&parent), connect_to(&student.username))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_only_target_student_can_respond() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let parent = create_user(&storage, "parent01", UserRole::Parent).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let other = create_user(&storage, "student2", UserRole::Student).await;
        let link = storage.request_link(parent.id, student.id).await.unwrap().unwrap();
        let storage = Arc::new(storage);
        let service = ParentLinkService::with_storage(storage.clone());

        let resp = service
            .respond_to_request(&request_as(&other), link.id, true)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = service
            .respond_to_request(&request_as(&student), link.id, false)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let current = storage.get_link_by_id(link.id).await.unwrap().unwrap();
        assert_eq!(current.status, LinkStatus::Rejected);

        // 已处理的申请不能再次响应
        let resp = service
            .respond_to_request(&request_as(&student), link.id, true)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_redeem_invite_code_outcomes() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let parent = create_user(&storage, "parent01", UserRole::Parent).await;
        let late_parent = create_user(&storage, "parent02", UserRole::Parent).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let expired_student = create_user(&storage, "student2", UserRole::Student).await;
        let linked_student = create_user(&storage, "student3", UserRole::Student).await;

        storage
            .create_invite_code(student.id, "ABCD2345", Utc::now() + Duration::hours(1))
            .await
            .unwrap();
        storage
            .create_invite_code(expired_student.id, "EXPD2345", Utc::now() - Duration::hours(1))
            .await
            .unwrap();
        storage
            .create_invite_code(linked_student.id, "LINK2345", Utc::now() + Duration::hours(1))
            .await
            .unwrap();
        storage
            .create_direct_link(parent.id, linked_student.id, LinkSource::Admin)
            .await
            .unwrap()
            .unwrap();
        let storage = Arc::new(storage);
        let service = ParentLinkService::with_storage(storage.clone());

        let resp = service.redeem_invite_code(&request_as(&parent), redeem("ZZZZ9999")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = service.redeem_invite_code(&request_as(&parent), redeem("expd-2345")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = service.redeem_invite_code(&request_as(&parent), redeem("abcd-2345")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let link = storage.get_link(parent.id, student.id).await.unwrap().unwrap();
        assert_eq!(link.status, LinkStatus::Active);

        let resp = service
            .redeem_invite_code(&request_as(&late_parent), redeem("ABCD2345"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = service.redeem_invite_code(&request_as(&parent), redeem("LINK2345")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_remove_child_deletes_link() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let parent = create_user(&storage, "parent01", UserRole::Parent).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        storage
            .create_direct_link(parent.id, student.id, LinkSource::Admin)
            .await
            .unwrap()
            .unwrap();
        let storage = Arc::new(storage);
        let service = ParentLinkService::with_storage(storage.clone());

        let resp = service.remove_child(&request_as(&parent), student.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(storage.get_link(parent.id, student.id).await.unwrap().is_none());

        let resp = service.remove_child(&request_as(&parent), student.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
