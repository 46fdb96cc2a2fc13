/*!
 * 速率限制中间件
 *
 * 固定窗口计数：窗口编号为 `当前秒数 / window_secs`，计数存放在全局 moka 缓存中，
 * 键为 `前缀:标识:窗口编号`，过期由缓存 TTL 负责。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 *
 * - 已认证请求以用户 ID 计数，否则以客户端 IP 计数
 * - 超过限制返回 429，并带 `Retry-After` 头
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 最长窗口，决定计数条目的存活时间
const MAX_WINDOW_SECS: u64 = 3600;

static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64, key_prefix: &'static str) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            key_prefix,
        }
    }

    /// 登录：5次/分钟
    pub fn login() -> Self {
        Self::new(5, 60, "login")
    }

    /// 注册：3次/分钟
    pub fn register() -> Self {
        Self::new(3, 60, "register")
    }

    /// 刷新令牌：10次/分钟
    pub fn refresh_token() -> Self {
        Self::new(10, 60, "refresh")
    }

    /// 邀请码兑换：10次/分钟，防止枚举
    pub fn invite_code() -> Self {
        Self::new(10, 60, "invite_code")
    }

    /// 文件上传：10次/分钟
    pub fn file_upload() -> Self {
        Self::new(10, 60, "upload")
    }

    fn window_key(&self, identifier: &str, now_secs: u64) -> String {
        format!(
            "{}:{}:{}",
            self.key_prefix,
            identifier,
            now_secs / self.window_secs
        )
    }

    /// 距离当前窗口结束的秒数
    fn retry_after(&self, now_secs: u64) -> u64 {
        self.window_secs - now_secs % self.window_secs
    }
}

/// 提取客户端 IP
///
/// 部署在反向代理之后时需由代理设置 X-Forwarded-For / X-Real-IP；
/// 直接暴露在不可信网络时，转发头可能被伪造。
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
        && is_valid_ip(ip.trim())
    {
        return ip.trim().to_string();
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
        && is_valid_ip(ip.trim())
    {
        return ip.trim().to_string();
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "请求过于频繁，请稍后再试",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let identifier = req
                .extensions()
                .get::<User>()
                .map(|user| format!("user:{}", user.id))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));

            let now_secs = chrono::Utc::now().timestamp().max(0) as u64;
            let cache_key = limit.window_key(&identifier, now_secs);

            // 原子自增
            let count = RATE_LIMIT_CACHE
                .entry(cache_key.clone())
                .and_upsert_with(|existing| {
                    let next = existing.map_or(1, |entry| entry.into_value().saturating_add(1));
                    std::future::ready(next)
                })
                .await
                .into_value();

            if count > limit.max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    cache_key, count, limit.max_requests
                );
                return Ok(req.into_response(
                    create_rate_limit_response(limit.retry_after(now_secs)).map_into_right_body(),
                ));
            }

            let remaining = limit.max_requests - count;
            let mut res = srv.call(req).await?;
            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(limit.max_requests),
            );
            headers.insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(remaining),
            );
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        assert_eq!(RateLimit::register().max_requests, 3);
        assert_eq!(RateLimit::invite_code().key_prefix, "invite_code");
    }

    #[test]
    fn test_fixed_window_keys() {
        let limit = RateLimit::login();
        assert_eq!(limit.window_key("ip:1.2.3.4", 119), "login:ip:1.2.3.4:1");
        assert_eq!(limit.window_key("ip:1.2.3.4", 120), "login:ip:1.2.3.4:2");
        assert_eq!(limit.retry_after(119), 1);
        assert_eq!(limit.retry_after(120), 60);
    }

    #[test]
    fn test_window_is_clamped() {
        assert_eq!(RateLimit::new(1, 0, "x").window_secs, 1);
        assert_eq!(RateLimit::new(1, 86_400, "x").window_secs, MAX_WINDOW_SECS);
    }
}
