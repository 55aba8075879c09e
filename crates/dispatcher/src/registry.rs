use std::sync::Arc;

use tracing::{debug, info};

use beacon_core::{BeaconError, BeaconResult, Device, DeviceId, DeviceStore};

/// 设备注册服务
///
/// 对外接受字符串形式的设备ID，解析失败返回 `InvalidDeviceId`，
/// 设备不存在返回 `DeviceNotFound`。
#[derive(Clone)]
pub struct DeviceRegistry {
    store: Arc<dyn DeviceStore>,
}

impl DeviceRegistry {
    pub fn new(store: Arc<dyn DeviceStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn DeviceStore> {
        Arc::clone(&self.store)
    }

    /// 注册设备，名称重复时返回 `DuplicateDeviceName`
    pub async fn register(&self, name: &str) -> BeaconResult<Device> {
        let device = Device::new(name)?;
        let created = self.store.create(&device).await?;
        info!("设备已注册: {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> BeaconResult<Device> {
        let device_id: DeviceId = id.parse()?;
        self.store
            .get_by_id(&device_id)
            .await?
            .ok_or_else(|| BeaconError::device_not_found(id))
    }

    /// 按最近更新时间倒序返回所有设备
    pub async fn list(&self) -> BeaconResult<Vec<Device>> {
        let devices = self.store.list_by_last_updated().await?;
        debug!("列出 {} 个设备", devices.len());
        Ok(devices)
    }

    /// 注销设备并返回被删除的记录
    pub async fn unregister(&self, id: &str) -> BeaconResult<Device> {
        let device_id: DeviceId = id.parse()?;
        let device = self
            .store
            .delete(&device_id)
            .await?
            .ok_or_else(|| BeaconError::device_not_found(id))?;
        info!("设备已注销: {} ({})", device.name, device.id);
        Ok(device)
    }
}
