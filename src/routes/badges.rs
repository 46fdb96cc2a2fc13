use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::badges::requests::{AwardBadgeRequest, CreateBadgeRequest, UpdateBadgeRequest};
use crate::models::users::entities::UserRole;
use crate::services::BadgeService;
use crate::utils::{SafeBadgeId, SafeUserId};

// 懒加载的全局 BadgeService 实例
static BADGE_SERVICE: Lazy<BadgeService> = Lazy::new(BadgeService::new_lazy);

pub async fn list_badges(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    BADGE_SERVICE.list_badges(&req, query.into_inner()).await
}

pub async fn create_badge(
    req: HttpRequest,
    badge_data: web::Json<CreateBadgeRequest>,
) -> ActixResult<HttpResponse> {
    BADGE_SERVICE.create_badge(&req, badge_data.into_inner()).await
}

pub async fn update_badge(
    req: HttpRequest,
    badge_id: SafeBadgeId,
    update_data: web::Json<UpdateBadgeRequest>,
) -> ActixResult<HttpResponse> {
    BADGE_SERVICE
        .update_badge(&req, badge_id.0, update_data.into_inner())
        .await
}

pub async fn delete_badge(req: HttpRequest, badge_id: SafeBadgeId) -> ActixResult<HttpResponse> {
    BADGE_SERVICE.delete_badge(&req, badge_id.0).await
}

pub async fn award_badge(
    req: HttpRequest,
    badge_id: SafeBadgeId,
    award_data: web::Json<AwardBadgeRequest>,
) -> ActixResult<HttpResponse> {
    BADGE_SERVICE
        .award_badge(&req, badge_id.0, award_data.into_inner())
        .await
}

pub async fn revoke_badge(
    req: HttpRequest,
    badge_id: SafeBadgeId,
    user_id: SafeUserId,
) -> ActixResult<HttpResponse> {
    BADGE_SERVICE.revoke_badge(&req, badge_id.0, user_id.0).await
}

// 配置路由
pub fn configure_badge_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/badges")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_badges)).route(
                    web::post()
                        .to(create_badge)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{badge_id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route(web::put().to(update_badge))
                    .route(web::delete().to(delete_badge)),
            )
            // 管理员与教师可颁发，仅管理员可撤销
            .route(
                "/{badge_id}/awards",
                web::post()
                    .to(award_badge)
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .route(
                "/{badge_id}/awards/{user_id}",
                web::delete()
                    .to(revoke_badge)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}
