pub mod awards;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::respond;
use crate::models::PaginationQuery;
use crate::models::badges::requests::{AwardBadgeRequest, CreateBadgeRequest, UpdateBadgeRequest};

define_service!(BadgeService);

impl BadgeService {
    pub async fn list_badges(
        &self,
        request: &HttpRequest,
        pagination: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        respond(manage::list_badges(self, request, pagination).await)
    }

    pub async fn create_badge(
        &self,
        request: &HttpRequest,
        create_request: CreateBadgeRequest,
    ) -> ActixResult<HttpResponse> {
        respond(manage::create_badge(self, request, create_request).await)
    }

    pub async fn update_badge(
        &self,
        request: &HttpRequest,
        badge_id: i64,
        update_request: UpdateBadgeRequest,
    ) -> ActixResult<HttpResponse> {
        respond(manage::update_badge(self, request, badge_id, update_request).await)
    }

    pub async fn delete_badge(&self, request: &HttpRequest, badge_id: i64) -> ActixResult<HttpResponse> {
        respond(manage::delete_badge(self, request, badge_id).await)
    }

    pub async fn award_badge(
        &self,
        request: &HttpRequest,
        badge_id: i64,
        award_request: AwardBadgeRequest,
    ) -> ActixResult<HttpResponse> {
        respond(awards::award_badge(self, request, badge_id, award_request).await)
    }

    pub async fn revoke_badge(
        &self,
        request: &HttpRequest,
        badge_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(awards::revoke_badge(self, request, badge_id, user_id).await)
    }

    pub async fn list_user_badges(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(awards::list_user_badges(self, request, user_id).await)
    }
}
