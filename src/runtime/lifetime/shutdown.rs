use std::time::Duration;

use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

pub async fn listen_for_shutdown() {
    // 等待 Ctrl+C 信号
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        // 无法监听信号时不主动退出，交由服务器自身结束
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");
}

/// 等待通知后台任务写完队列，超时后放弃
///
/// 调用前须释放所有 `NotificationDispatcher`，否则队列不会关闭。
/// 返回 false 表示超时或任务异常退出。
pub async fn drain_notifications(worker: JoinHandle<()>, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, worker).await {
        Ok(Ok(())) => {
            debug!("Notification queue drained");
            true
        }
        Ok(Err(e)) => {
            error!("Notification worker failed: {}", e);
            false
        }
        Err(_) => {
            warn!(
                "Notification queue not drained within {} s, remaining notifications dropped",
                timeout.as_secs()
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::models::users::entities::UserRole;
    use crate::services::notifications::dispatcher::NotificationDispatcher;
    use crate::services::notifications::templates::NotificationMessage;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support::create_user};

    #[tokio::test]
    async fn test_drain_writes_queued_notifications() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let storage: Arc<dyn Storage> = Arc::new(storage);

        let (dispatcher, worker) = NotificationDispatcher::start(storage.clone(), 16);
        for badge_id in 1..=5 {
            dispatcher
                .dispatch(
                    vec![student.id],
                    NotificationMessage::BadgeAwarded {
                        badge_id,
                        badge_name: format!("Badge {badge_id}"),
                        reason: None,
                    },
                )
                .await;
        }
        drop(dispatcher);

        assert!(drain_notifications(worker, Duration::from_secs(5)).await);
        assert_eq!(storage.get_unread_notification_count(student.id).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_drain_gives_up_while_sender_alive() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let (dispatcher, worker) = NotificationDispatcher::start(storage, 4);

        assert!(!drain_notifications(worker, Duration::from_millis(50)).await);
        drop(dispatcher);
    }
}
