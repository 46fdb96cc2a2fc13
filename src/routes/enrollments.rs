use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::enrollments::requests::UpdateProgressRequest;
use crate::models::users::entities::UserRole;
use crate::services::EnrollmentService;
use crate::utils::{SafeCertificateCode, SafeEnrollmentId};

// 懒加载的全局 EnrollmentService 实例
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn list_my_enrollments(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_my_enrollments(&req, query.into_inner())
        .await
}

pub async fn update_progress(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentId,
    progress_data: web::Json<UpdateProgressRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .update_progress(&req, enrollment_id.0, progress_data.into_inner())
        .await
}

pub async fn drop_enrollment(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentId,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.drop_enrollment(&req, enrollment_id.0).await
}

pub async fn verify_certificate(
    req: HttpRequest,
    code: SafeCertificateCode,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.verify_certificate(&req, code.0).await
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .route(
                "",
                web::get()
                    .to(list_my_enrollments)
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .route(
                "/{enrollment_id}/progress",
                web::put()
                    .to(update_progress)
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .route(
                "/{enrollment_id}",
                web::delete().to(drop_enrollment).wrap(
                    middlewares::RequireRole::new_any(&[&UserRole::Student, &UserRole::Admin]),
                ),
            ),
    );

    // 证书核验对外公开
    cfg.service(
        web::scope("/api/v1/certificates").route("/{code}", web::get().to(verify_certificate)),
    );
}
