//! 存储与消息队列的具体实现

pub mod database;
pub mod in_memory_queue;
pub mod in_memory_store;
pub mod message_queue;

pub use database::*;
pub use in_memory_queue::InMemoryQueuePublisher;
pub use in_memory_store::InMemoryDeviceStore;
pub use message_queue::RabbitMqPublisher;
