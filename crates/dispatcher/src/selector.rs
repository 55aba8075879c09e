use tracing::debug;

use beacon_core::Device;

/// 设备选择策略
///
/// 纯策略组件：只根据传入的设备列表做决定，没有副作用。
pub trait DeviceSelector: Send + Sync {
    /// 选出分发目标，列表为空时返回 `None`
    fn select<'a>(&self, devices: &'a [Device]) -> Option<&'a Device>;

    fn name(&self) -> &str;
}

/// 最久未触发优先
///
/// 选择 `last_triggered` 最小的设备，从未触发的设备视为最小。相同时间按
/// 注册时间、再按设备ID决定，因此结果与输入顺序无关，设备集合不变时重复
/// 调用总是返回同一个设备。
pub struct LeastRecentlyTriggeredSelector;

impl LeastRecentlyTriggeredSelector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LeastRecentlyTriggeredSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceSelector for LeastRecentlyTriggeredSelector {
    fn select<'a>(&self, devices: &'a [Device]) -> Option<&'a Device> {
        if devices.is_empty() {
            debug!("没有已注册的设备");
            return None;
        }

        let selected = devices.iter().min_by_key(|device| device.recency_key())?;

        debug!(
            "最久未触发策略选择设备: {} (上次触发: {:?}, 候选数: {})",
            selected.name,
            selected.last_triggered,
            devices.len()
        );

        Some(selected)
    }

    fn name(&self) -> &str {
        "LeastRecentlyTriggered"
    }
}
