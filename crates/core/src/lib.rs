//! # Beacon Core
//!
//! 设备注册与函数触发分发系统的核心库：数据模型、错误类型、配置，以及
//! 设备存储（[`DeviceStore`]）和队列发布（[`QueuePublisher`]）两个协作者接口。

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::{
    ApiConfig, AppConfig, DatabaseConfig, DispatcherConfig, MessageQueueConfig,
    MessageQueueType, ObservabilityConfig,
};
pub use errors::*;
pub use models::{
    now_utc, Device, DeviceId, DeviceSummary, DispatchReceipt, FUNCTION_TRIGGERED,
    NO_DEVICE_AVAILABLE,
};
pub use traits::{DeviceStore, QueuePublisher};

/// 统一的Result类型
pub type BeaconResult<T> = std::result::Result<T, BeaconError>;
