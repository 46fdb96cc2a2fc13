//! 学生端、家长端与管理员的家长关联路由
//!
//! 成绩与日程挂在 `/student`、`/parent` 作用域下，由 [`DashboardService`] 处理。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::dashboards::requests::CalendarParams;
use crate::models::parent_links::requests::{
    AdminCreateLinkRequest, ConnectionRequest, ParentLinkListParams, RedeemInviteCodeRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{DashboardService, ParentLinkService};
use crate::utils::{SafeLinkId, SafeStudentId};

static PARENT_LINK_SERVICE: Lazy<ParentLinkService> = Lazy::new(ParentLinkService::new_lazy);
static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

// 学生端
pub async fn create_invite_code(req: HttpRequest) -> ActixResult<HttpResponse> {
    PARENT_LINK_SERVICE.create_invite_code(&req).await
}

pub async fn list_connection_requests(req: HttpRequest) -> ActixResult<HttpResponse> {
    PARENT_LINK_SERVICE.list_connection_requests(&req).await
}

pub async fn accept_request(req: HttpRequest, link_id: SafeLinkId) -> ActixResult<HttpResponse> {
    PARENT_LINK_SERVICE
        .respond_to_request(&req, link_id.0, true)
        .await
}

pub async fn reject_request(req: HttpRequest, link_id: SafeLinkId) -> ActixResult<HttpResponse> {
    PARENT_LINK_SERVICE
        .respond_to_request(&req, link_id.0, false)
        .await
}

pub async fn list_parents(req: HttpRequest) -> ActixResult<HttpResponse> {
    PARENT_LINK_SERVICE.list_parents(&req).await
}

pub async fn my_grades(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.my_grades(&req).await
}

pub async fn my_calendar(
    req: HttpRequest,
    query: web::Query<CalendarParams>,
) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.my_calendar(&req, query.into_inner()).await
}

// 家长端
pub async fn request_connection(
    req: HttpRequest,
    connection_data: web::Json<ConnectionRequest>,
) -> ActixResult<HttpResponse> {
    PARENT_LINK_SERVICE
        .request_connection(&req, connection_data.into_inner())
        .await
}

pub async fn redeem_invite_code(
    req: HttpRequest,
    redeem_data: web::Json<RedeemInviteCodeRequest>,
) -> ActixResult<HttpResponse> {
    PARENT_LINK_SERVICE
        .redeem_invite_code(&req, redeem_data.into_inner())
        .await
}

pub async fn list_children(req: HttpRequest) -> ActixResult<HttpResponse> {
    PARENT_LINK_SERVICE.list_children(&req).await
}

pub async fn remove_child(req: HttpRequest, student_id: SafeStudentId) -> ActixResult<HttpResponse> {
    PARENT_LINK_SERVICE.remove_child(&req, student_id.0).await
}

pub async fn child_grades(req: HttpRequest, student_id: SafeStudentId) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.child_grades(&req, student_id.0).await
}

pub async fn child_calendar(
    req: HttpRequest,
    student_id: SafeStudentId,
    query: web::Query<CalendarParams>,
) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE
        .child_calendar(&req, student_id.0, query.into_inner())
        .await
}

// 管理员
pub async fn list_links(
    req: HttpRequest,
    query: web::Query<ParentLinkListParams>,
) -> ActixResult<HttpResponse> {
    PARENT_LINK_SERVICE.list_links(&req, query.into_inner()).await
}

pub async fn create_link(
    req: HttpRequest,
    link_data: web::Json<AdminCreateLinkRequest>,
) -> ActixResult<HttpResponse> {
    PARENT_LINK_SERVICE
        .create_link(&req, link_data.into_inner())
        .await
}

pub async fn delete_link(req: HttpRequest, link_id: SafeLinkId) -> ActixResult<HttpResponse> {
    PARENT_LINK_SERVICE.delete_link(&req, link_id.0).await
}

// 配置路由
pub fn configure_parent_link_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/student")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles()))
                    .route("/invite-codes", web::post().to(create_invite_code))
                    .route("/connection-requests", web::get().to(list_connection_requests))
                    .route(
                        "/connection-requests/{link_id}/accept",
                        web::post().to(accept_request),
                    )
                    .route(
                        "/connection-requests/{link_id}/reject",
                        web::post().to(reject_request),
                    )
                    .route("/parents", web::get().to(list_parents))
                    .route("/grades", web::get().to(my_grades))
                    .route("/calendar", web::get().to(my_calendar)),
            ),
    );

    cfg.service(
        web::scope("/api/v1/parent")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::parent_roles()))
                    .route("/connections", web::post().to(request_connection))
                    .route(
                        "/link",
                        web::post()
                            .to(redeem_invite_code)
                            // 按家长账号限制邀请码尝试次数
                            .wrap(middlewares::RateLimit::invite_code()),
                    )
                    .route("/children", web::get().to(list_children))
                    .route("/children/{student_id}", web::delete().to(remove_child))
                    .route("/children/{student_id}/grades", web::get().to(child_grades))
                    .route(
                        "/children/{student_id}/calendar",
                        web::get().to(child_calendar),
                    ),
            ),
    );

    cfg.service(
        web::scope("/api/v1/admin/parent-links")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .service(
                        web::resource("")
                            .route(web::get().to(list_links))
                            .route(web::post().to(create_link)),
                    )
                    .route("/{link_id}", web::delete().to(delete_link)),
            ),
    );
}
