use async_trait::async_trait;

use crate::Result;

/// 点对点消息发布接口，每个设备一个逻辑队列
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// 将负载发布到名为 `queue` 的队列，队列不存在时自动创建
    ///
    /// 返回 `Ok(())` 仅表示消息已交给Broker，不代表设备已经消费。
    async fn publish(&self, queue: &str, payload: &serde_json::Value) -> Result<()>;

    /// 实现名称，用于日志
    fn name(&self) -> &str;
}
