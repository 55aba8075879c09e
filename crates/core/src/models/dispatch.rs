use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DeviceId;

/// 分发成功时返回给调用方的消息
pub const FUNCTION_TRIGGERED: &str = "function triggered";

/// 没有已注册设备时返回给调用方的消息
pub const NO_DEVICE_AVAILABLE: &str = "No device available";

/// 一次成功分发的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    pub device_id: DeviceId,
    pub device_name: String,
    /// 写入设备 last_triggered 的时间
    pub triggered_at: DateTime<Utc>,
    /// 占用设备时的尝试次数（1表示无竞争）
    pub attempts: u32,
}
