//! 设备注册与函数触发分发
//!
//! [`DeviceRegistry`] 管理设备生命周期，[`DispatchCoordinator`] 通过
//! [`DeviceSelector`] 选出最久未触发的设备并把负载发布到该设备的队列。

pub mod coordinator;
pub mod registry;
pub mod selector;

#[cfg(test)]
mod selector_test;
#[cfg(test)]
pub mod test_utils;

pub use coordinator::{next_trigger_time, DispatchCoordinator};
pub use registry::DeviceRegistry;
pub use selector::{DeviceSelector, LeastRecentlyTriggeredSelector};
