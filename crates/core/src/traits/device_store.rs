use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    models::{Device, DeviceId},
    Result,
};

/// 设备存储抽象接口
///
/// 持久化的设备集合，按ID查找，名称全局唯一。所有写操作都会刷新
/// `last_updated`。
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// 注册新设备
    ///
    /// # 错误
    ///
    /// * `DuplicateDeviceName` - 名称已被占用，已有设备保持不变
    /// * `Validation` - 名称不合法
    async fn create(&self, device: &Device) -> Result<Device>;

    /// 按ID查找设备
    async fn get_by_id(&self, id: &DeviceId) -> Result<Option<Device>>;

    /// 删除设备并返回被删除的记录，不存在时返回 `None`
    async fn delete(&self, id: &DeviceId) -> Result<Option<Device>>;

    /// 按 `last_updated` 倒序列出所有设备
    async fn list_by_last_updated(&self) -> Result<Vec<Device>>;

    /// 按 `last_triggered` 倒序列出所有设备，从未触发的设备排在最后
    async fn list_by_trigger_recency(&self) -> Result<Vec<Device>>;

    /// 条件更新 `last_triggered`
    ///
    /// 仅当设备当前的 `last_triggered` 等于 `expected`（两者都为空也视为相等）
    /// 时写入 `new`，并刷新 `last_updated`。返回是否写入成功；设备不存在或值已
    /// 被其他分发修改时返回 `false`。
    async fn swap_last_triggered(
        &self,
        id: &DeviceId,
        expected: Option<DateTime<Utc>>,
        new: Option<DateTime<Utc>>,
    ) -> Result<bool>;

    /// 条件写入 `last_triggered`，不刷新 `last_updated`
    ///
    /// 用于分发过程中的临时占用和撤销：比较规则与 [`swap_last_triggered`]
    /// 相同，但记录的其余字段保持原样，撤销后设备与占用前完全一致。
    ///
    /// [`swap_last_triggered`]: DeviceStore::swap_last_triggered
    async fn reserve_last_triggered(
        &self,
        id: &DeviceId,
        expected: Option<DateTime<Utc>>,
        new: Option<DateTime<Utc>>,
    ) -> Result<bool>;

    /// 检查存储连接健康状态
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
