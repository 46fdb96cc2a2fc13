//! 对象缓存
//!
//! 缓存后端以插件形式注册到 [`register`]，启动时按 `cache.type` 选择。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端异常，调用方应视为未命中
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 认证中间件缓存用户信息的键
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}
