use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use beacon_core::{now_utc, BeaconError, BeaconResult, Device, DeviceId, DeviceStore};

/// 内存设备存储
///
/// 所有操作在同一把写锁下完成，名称唯一性检查与插入是原子的。
#[derive(Debug, Default)]
pub struct InMemoryDeviceStore {
    devices: RwLock<HashMap<DeviceId, Device>>,
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn sorted_by<K: Ord>(&self, key: impl Fn(&Device) -> K) -> Vec<Device> {
        let mut devices: Vec<Device> = self.devices.read().await.values().cloned().collect();
        devices.sort_by_key(key);
        devices
    }

    async fn write_if(
        &self,
        id: &DeviceId,
        expected: Option<DateTime<Utc>>,
        new: Option<DateTime<Utc>>,
        touch: bool,
    ) -> bool {
        let mut devices = self.devices.write().await;
        match devices.get_mut(id) {
            Some(device) if device.last_triggered == expected => {
                device.last_triggered = new;
                if touch {
                    device.last_updated = now_utc();
                }
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl DeviceStore for InMemoryDeviceStore {
    async fn create(&self, device: &Device) -> BeaconResult<Device> {
        let mut devices = self.devices.write().await;
        if devices.values().any(|d| d.name == device.name) {
            return Err(BeaconError::duplicate_name(&device.name));
        }
        devices.insert(device.id, device.clone());
        debug!("创建设备成功: {} ({})", device.name, device.id);
        Ok(device.clone())
    }

    async fn get_by_id(&self, id: &DeviceId) -> BeaconResult<Option<Device>> {
        Ok(self.devices.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &DeviceId) -> BeaconResult<Option<Device>> {
        Ok(self.devices.write().await.remove(id))
    }

    async fn list_by_last_updated(&self) -> BeaconResult<Vec<Device>> {
        Ok(self
            .sorted_by(|d| std::cmp::Reverse((d.last_updated, d.created_at)))
            .await)
    }

    async fn list_by_trigger_recency(&self) -> BeaconResult<Vec<Device>> {
        // 倒序且未触发的排在最后
        Ok(self
            .sorted_by(|d| {
                (
                    d.last_triggered.is_none(),
                    std::cmp::Reverse(d.last_triggered),
                    d.created_at,
                )
            })
            .await)
    }

    async fn swap_last_triggered(
        &self,
        id: &DeviceId,
        expected: Option<DateTime<Utc>>,
        new: Option<DateTime<Utc>>,
    ) -> BeaconResult<bool> {
        Ok(self.write_if(id, expected, new, true).await)
    }

    async fn reserve_last_triggered(
        &self,
        id: &DeviceId,
        expected: Option<DateTime<Utc>>,
        new: Option<DateTime<Utc>>,
    ) -> BeaconResult<bool> {
        Ok(self.write_if(id, expected, new, false).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let store = InMemoryDeviceStore::new();
        let original = store.create(&Device::new("pixel-7").unwrap()).await.unwrap();

        let err = store
            .create(&Device::new("pixel-7").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, BeaconError::DuplicateDeviceName { .. }));
        assert_eq!(store.list_by_last_updated().await.unwrap(), vec![original]);
    }

    #[tokio::test]
    async fn test_swap_requires_expected_value() {
        let store = InMemoryDeviceStore::new();
        let device = store.create(&Device::new("pixel-7").unwrap()).await.unwrap();
        let now = now_utc();

        assert!(store.swap_last_triggered(&device.id, None, Some(now)).await.unwrap());
        assert!(!store.swap_last_triggered(&device.id, None, Some(now)).await.unwrap());
        assert!(!store
            .swap_last_triggered(&DeviceId::new(), None, Some(now))
            .await
            .unwrap());

        let loaded = store.get_by_id(&device.id).await.unwrap().unwrap();
        assert_eq!(loaded.last_triggered, Some(now));
    }

    #[tokio::test]
    async fn test_reserve_keeps_last_updated() {
        let store = InMemoryDeviceStore::new();
        let device = store.create(&Device::new("pixel-7").unwrap()).await.unwrap();
        let claimed = now_utc() + Duration::seconds(1);

        assert!(store
            .reserve_last_triggered(&device.id, None, Some(claimed))
            .await
            .unwrap());
        let reserved = store.get_by_id(&device.id).await.unwrap().unwrap();
        assert_eq!(reserved.last_triggered, Some(claimed));
        assert_eq!(reserved.last_updated, device.last_updated);

        assert!(store
            .reserve_last_triggered(&device.id, Some(claimed), None)
            .await
            .unwrap());
        assert_eq!(store.get_by_id(&device.id).await.unwrap(), Some(device));
    }

    #[tokio::test]
    async fn test_trigger_recency_order() {
        let store = InMemoryDeviceStore::new();
        let a = store.create(&Device::new("a").unwrap()).await.unwrap();
        store.create(&Device::new("b").unwrap()).await.unwrap();
        let c = store.create(&Device::new("c").unwrap()).await.unwrap();
        let now = now_utc();
        store.swap_last_triggered(&a.id, None, Some(now)).await.unwrap();
        store
            .swap_last_triggered(&c.id, None, Some(now + Duration::seconds(1)))
            .await
            .unwrap();

        let names: Vec<_> = store
            .list_by_trigger_recency()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryDeviceStore::new();
        let device = store.create(&Device::new("pixel-7").unwrap()).await.unwrap();

        assert_eq!(store.delete(&device.id).await.unwrap(), Some(device.clone()));
        assert_eq!(store.delete(&device.id).await.unwrap(), None);
    }
}
