//! # 数据模型
//!
//! 设备注册表和函数触发分发的核心数据结构。
//!
//! - [`Device`] - 已注册的远程执行目标，名称即队列路由键
//! - [`DeviceSummary`] - 设备的对外JSON表示
//! - [`DispatchReceipt`] - 一次成功分发的结果
//!
//! 所有时间字段均为 `DateTime<Utc>`，并通过 [`now_utc`] 截断到微秒。

pub mod device;
pub mod dispatch;

pub use device::*;
pub use dispatch::*;
