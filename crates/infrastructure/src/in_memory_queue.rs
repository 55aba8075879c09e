use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use beacon_core::{BeaconError, BeaconResult, QueuePublisher};

/// 内存队列发布实现
///
/// 按队列名保存已发布的负载，适用于嵌入式部署和测试。可以注入发布失败
/// 来模拟Broker不可达。
#[derive(Debug, Default)]
pub struct InMemoryQueuePublisher {
    queues: RwLock<HashMap<String, Vec<serde_json::Value>>>,
    fail: AtomicBool,
}

impl InMemoryQueuePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开后所有发布都返回 `MessageQueue` 错误
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// 指定队列中按发布顺序排列的负载
    pub async fn messages(&self, queue: &str) -> Vec<serde_json::Value> {
        self.queues
            .read()
            .await
            .get(queue)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn queue_len(&self, queue: &str) -> usize {
        self.queues.read().await.get(queue).map_or(0, Vec::len)
    }

    pub async fn total_published(&self) -> usize {
        self.queues.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl QueuePublisher for InMemoryQueuePublisher {
    async fn publish(&self, queue: &str, payload: &serde_json::Value) -> BeaconResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(BeaconError::MessageQueue(format!(
                "内存队列拒绝发布到 {queue}"
            )));
        }

        self.queues
            .write()
            .await
            .entry(queue.to_string())
            .or_default()
            .push(payload.clone());

        debug!("消息已发布到内存队列: {}", queue);
        Ok(())
    }

    fn name(&self) -> &str {
        "InMemory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_per_queue() {
        let publisher = InMemoryQueuePublisher::new();
        publisher.publish("a", &json!({"n": 1})).await.unwrap();
        publisher.publish("b", &json!({"n": 2})).await.unwrap();
        publisher.publish("a", &json!({"n": 3})).await.unwrap();

        assert_eq!(publisher.messages("a").await, vec![json!({"n": 1}), json!({"n": 3})]);
        assert_eq!(publisher.queue_len("b").await, 1);
        assert_eq!(publisher.queue_len("missing").await, 0);
        assert_eq!(publisher.total_published().await, 3);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let publisher = InMemoryQueuePublisher::new();
        publisher.set_fail(true);

        let err = publisher.publish("a", &json!({})).await.unwrap_err();
        assert!(err.is_publish_failure());
        assert_eq!(publisher.total_published().await, 0);

        publisher.set_fail(false);
        assert!(publisher.publish("a", &json!({})).await.is_ok());
    }
}
