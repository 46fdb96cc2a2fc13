use crate::cache::ObjectCache;
use crate::cache::object_cache::{MokaCacheWrapper, RedisObjectCache};
use crate::errors::{LmsError, Result};
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

static OBJECT_CACHE_REGISTRY: Lazy<RwLock<HashMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    let mut registry = OBJECT_CACHE_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.insert(name.into(), constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(name)
        .cloned()
}

/// 注册内置缓存后端
pub fn register_builtin_plugins() {
    register_object_cache_plugin(
        "moka",
        Arc::new(|| {
            Box::pin(async {
                MokaCacheWrapper::new()
                    .map(|cache| Box::new(cache) as Box<dyn ObjectCache>)
                    .map_err(LmsError::cache_connection)
            }) as BoxedObjectCacheFuture
        }),
    );
    register_object_cache_plugin(
        "redis",
        Arc::new(|| {
            Box::pin(async {
                RedisObjectCache::new()
                    .await
                    .map(|cache| Box::new(cache) as Box<dyn ObjectCache>)
                    .map_err(LmsError::cache_connection)
            }) as BoxedObjectCacheFuture
        }),
    );
}

pub fn debug_object_cache_registry() {
    let registry = OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if registry.is_empty() {
        tracing::debug!("No object cache plugins registered.");
    } else {
        tracing::debug!("Registered object cache plugins:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheResult;

    #[tokio::test]
    async fn test_builtin_moka_plugin_round_trip() {
        register_builtin_plugins();
        assert!(get_object_cache_plugin("redis").is_some());

        let constructor = get_object_cache_plugin("moka").unwrap();
        let cache = constructor().await.unwrap();
        cache.insert_raw("user:1".into(), "{}".into(), 0).await;
        assert_eq!(cache.get_raw("user:1").await, CacheResult::Found("{}".into()));
        cache.remove("user:1").await;
        assert_eq!(cache.get_raw("user:1").await, CacheResult::NotFound);
    }
}
