use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::BeaconError, Result};

/// 设备名称最大长度
pub const MAX_DEVICE_NAME_LEN: usize = 255;

/// 对外展示时间的格式
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 设备标识，创建时分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(Uuid);

impl DeviceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DeviceId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for DeviceId {
    type Err = BeaconError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| BeaconError::InvalidDeviceId(format!("'{s}' 不是有效的设备ID: {e}")))
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 已注册的远程执行目标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    /// 全局唯一，同时也是该设备专属队列的名称
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// 首次成功分发之前为空
    pub last_triggered: Option<DateTime<Utc>>,
}

impl Device {
    /// 创建待注册的设备，名称不合法时返回验证错误
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_device_name(&name)?;
        let now = now_utc();
        Ok(Self {
            id: DeviceId::new(),
            name,
            created_at: now,
            last_updated: now,
            last_triggered: None,
        })
    }

    /// 队列路由键
    pub fn routing_key(&self) -> &str {
        &self.name
    }

    /// 按“最久未触发”排序的键：未触发视为最小，再按注册时间和ID稳定排序
    pub fn recency_key(&self) -> (Option<DateTime<Utc>>, DateTime<Utc>, DeviceId) {
        (self.last_triggered, self.created_at, self.id)
    }

    pub fn summary(&self) -> DeviceSummary {
        DeviceSummary {
            id: self.id,
            name: self.name.clone(),
            last_triggered: self
                .last_triggered
                .map(|t| t.format(DISPLAY_TIME_FORMAT).to_string()),
        }
    }
}

/// 设备的对外表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub id: DeviceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_triggered: Option<String>,
}

pub fn validate_device_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(BeaconError::validation("设备名称不能为空"));
    }
    if name.chars().count() > MAX_DEVICE_NAME_LEN {
        return Err(BeaconError::validation(format!(
            "设备名称长度不能超过 {MAX_DEVICE_NAME_LEN} 个字符"
        )));
    }
    Ok(())
}

/// 当前UTC时间，截断到微秒，保证经过 Postgres/SQLite 往返后仍可做精确比较
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
