#[cfg(test)]
pub mod mocks {
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};

    use beacon_core::{BeaconError, BeaconResult, Device, DeviceId, DeviceStore};
    pub use beacon_infrastructure::{InMemoryDeviceStore, InMemoryQueuePublisher};

    /// 在条件更新前抢先修改目标设备，模拟并发分发
    pub struct ContendedStore {
        inner: Arc<InMemoryDeviceStore>,
        remaining: AtomicU32,
    }

    impl ContendedStore {
        /// 前 `contentions` 次占用都会被抢先
        pub fn new(inner: Arc<InMemoryDeviceStore>, contentions: u32) -> Self {
            Self {
                inner,
                remaining: AtomicU32::new(contentions),
            }
        }
    }

    #[async_trait]
    impl DeviceStore for ContendedStore {
        async fn create(&self, device: &Device) -> BeaconResult<Device> {
            self.inner.create(device).await
        }

        async fn get_by_id(&self, id: &DeviceId) -> BeaconResult<Option<Device>> {
            self.inner.get_by_id(id).await
        }

        async fn delete(&self, id: &DeviceId) -> BeaconResult<Option<Device>> {
            self.inner.delete(id).await
        }

        async fn list_by_last_updated(&self) -> BeaconResult<Vec<Device>> {
            self.inner.list_by_last_updated().await
        }

        async fn list_by_trigger_recency(&self) -> BeaconResult<Vec<Device>> {
            self.inner.list_by_trigger_recency().await
        }

        async fn swap_last_triggered(
            &self,
            id: &DeviceId,
            expected: Option<DateTime<Utc>>,
            new: Option<DateTime<Utc>>,
        ) -> BeaconResult<bool> {
            self.inner.swap_last_triggered(id, expected, new).await
        }

        async fn reserve_last_triggered(
            &self,
            id: &DeviceId,
            expected: Option<DateTime<Utc>>,
            new: Option<DateTime<Utc>>,
        ) -> BeaconResult<bool> {
            let contend = self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if contend {
                let rival = new.unwrap_or_else(Utc::now) + Duration::seconds(1);
                self.inner
                    .swap_last_triggered(id, expected, Some(rival))
                    .await?;
            }
            self.inner.reserve_last_triggered(id, expected, new).await
        }
    }

    /// 可以注入存储故障的设备存储
    pub struct FaultyStore {
        inner: Arc<InMemoryDeviceStore>,
        swap_calls: AtomicU32,
        /// 从第几次条件写入开始失败（从1计数），0表示不失败
        fail_swap_from: AtomicU32,
        fail_list: AtomicBool,
    }

    impl FaultyStore {
        pub fn new(inner: Arc<InMemoryDeviceStore>) -> Self {
            Self {
                inner,
                swap_calls: AtomicU32::new(0),
                fail_swap_from: AtomicU32::new(0),
                fail_list: AtomicBool::new(false),
            }
        }

        pub fn fail_swap_from(&self, call: u32) {
            self.fail_swap_from.store(call, Ordering::SeqCst);
        }

        pub fn fail_list(&self, fail: bool) {
            self.fail_list.store(fail, Ordering::SeqCst);
        }

        pub fn swap_calls(&self) -> u32 {
            self.swap_calls.load(Ordering::SeqCst)
        }

        fn unavailable() -> BeaconError {
            BeaconError::DatabaseOperation("存储不可用".to_string())
        }

        /// 占用、确认和撤销共用一个计数
        fn check_swap(&self) -> BeaconResult<()> {
            let call = self.swap_calls.fetch_add(1, Ordering::SeqCst) + 1;
            let fail_from = self.fail_swap_from.load(Ordering::SeqCst);
            if fail_from != 0 && call >= fail_from {
                return Err(Self::unavailable());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DeviceStore for FaultyStore {
        async fn create(&self, device: &Device) -> BeaconResult<Device> {
            self.inner.create(device).await
        }

        async fn get_by_id(&self, id: &DeviceId) -> BeaconResult<Option<Device>> {
            self.inner.get_by_id(id).await
        }

        async fn delete(&self, id: &DeviceId) -> BeaconResult<Option<Device>> {
            self.inner.delete(id).await
        }

        async fn list_by_last_updated(&self) -> BeaconResult<Vec<Device>> {
            self.inner.list_by_last_updated().await
        }

        async fn list_by_trigger_recency(&self) -> BeaconResult<Vec<Device>> {
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            self.inner.list_by_trigger_recency().await
        }

        async fn swap_last_triggered(
            &self,
            id: &DeviceId,
            expected: Option<DateTime<Utc>>,
            new: Option<DateTime<Utc>>,
        ) -> BeaconResult<bool> {
            self.check_swap()?;
            self.inner.swap_last_triggered(id, expected, new).await
        }

        async fn reserve_last_triggered(
            &self,
            id: &DeviceId,
            expected: Option<DateTime<Utc>>,
            new: Option<DateTime<Utc>>,
        ) -> BeaconResult<bool> {
            self.check_swap()?;
            self.inner.reserve_last_triggered(id, expected, new).await
        }
    }
}
