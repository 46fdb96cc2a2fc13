//! 通知分发
//!
//! 请求处理中只把 `(接收者, 消息)` 放入有界队列，由后台任务写库；
//! 队列已满或已关闭时改为在当前请求中直接写入。任何失败都只记录日志。

use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::templates::NotificationMessage;
use crate::errors::Result;
use crate::storage::Storage;

#[derive(Debug)]
struct NotificationJob {
    recipients: Vec<i64>,
    message: NotificationMessage,
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<NotificationJob>,
    storage: Arc<dyn Storage>,
}

impl NotificationDispatcher {
    /// 创建分发器并启动后台写入任务
    pub fn start(storage: Arc<dyn Storage>, queue_capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(queue_capacity.max(1));
        let worker = tokio::spawn(notification_worker(storage.clone(), receiver));
        (Self { sender, storage }, worker)
    }

    pub async fn dispatch(&self, mut recipients: Vec<i64>, message: NotificationMessage) {
        recipients.sort_unstable();
        recipients.dedup();
        if recipients.is_empty() {
            return;
        }

        let job = NotificationJob {
            recipients,
            message,
        };
        match self.sender.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) => {
                warn!("Notification queue is full, writing directly");
                log_failure(persist(self.storage.as_ref(), &job).await);
            }
            Err(TrySendError::Closed(job)) => {
                warn!("Notification worker stopped, writing directly");
                log_failure(persist(self.storage.as_ref(), &job).await);
            }
        }
    }
}

async fn persist(storage: &dyn Storage, job: &NotificationJob) -> Result<usize> {
    storage
        .create_notifications_batch(job.message.to_requests(&job.recipients))
        .await
}

fn log_failure(result: Result<usize>) {
    match result {
        Ok(count) => debug!("Persisted {} notification(s)", count),
        Err(e) => error!("Failed to persist notifications: {}", e),
    }
}

async fn notification_worker(storage: Arc<dyn Storage>, mut receiver: mpsc::Receiver<NotificationJob>) {
    while let Some(job) = receiver.recv().await {
        log_failure(persist(storage.as_ref(), &job).await);
    }
    debug!("Notification worker drained and stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support::create_user};

    fn badge_message() -> NotificationMessage {
        NotificationMessage::BadgeAwarded {
            badge_id: 1,
            badge_name: "Early Bird".into(),
            reason: None,
        }
    }

    #[tokio::test]
    async fn test_worker_persists_one_row_per_recipient() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let parent = create_user(&storage, "parent01", UserRole::Parent).await;
        let storage: Arc<dyn Storage> = Arc::new(storage);

        let (dispatcher, worker) = NotificationDispatcher::start(storage.clone(), 8);
        dispatcher
            .dispatch(vec![student.id, parent.id, student.id], badge_message())
            .await;
        drop(dispatcher);
        worker.await.unwrap();

        assert_eq!(storage.get_unread_notification_count(student.id).await.unwrap(), 1);
        assert_eq!(storage.get_unread_notification_count(parent.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_closed_queue_falls_back_to_direct_write() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let storage: Arc<dyn Storage> = Arc::new(storage);

        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);
        let dispatcher = NotificationDispatcher {
            sender,
            storage: storage.clone(),
        };
        dispatcher.dispatch(vec![student.id], badge_message()).await;

        assert_eq!(storage.get_unread_notification_count(student.id).await.unwrap(), 1);
    }
}
