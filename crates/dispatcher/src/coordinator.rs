use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use tracing::{debug, error, info, warn};

use beacon_core::{
    now_utc, BeaconError, BeaconResult, Device, DeviceStore, DispatchReceipt, DispatcherConfig,
    QueuePublisher,
};

use crate::selector::{DeviceSelector, LeastRecentlyTriggeredSelector};

/// 已占用、尚未完成投递的设备
#[derive(Debug, Clone)]
struct Claim {
    device: Device,
    /// 占用前观察到的 last_triggered，投递失败时恢复为该值
    previous: Option<DateTime<Utc>>,
    claimed_at: DateTime<Utc>,
    attempts: u32,
}

/// 分发协调器
///
/// 每次分发依次经过：选择设备 → 占用 → 发布 → 确认。
///
/// 占用通过 [`DeviceStore::reserve_last_triggered`] 以上次触发时间为条件写入，
/// 两个并发分发不会选中同一台设备；被抢占的一方重新读取设备列表再选择。
/// 占用和撤销都不刷新 `last_updated`，发布失败时恢复原值后设备记录与分发前
/// 完全一致。只有确认（[`DeviceStore::swap_last_triggered`]）会刷新
/// `last_updated`。发布期间不持有任何存储锁。
pub struct DispatchCoordinator {
    store: Arc<dyn DeviceStore>,
    publisher: Arc<dyn QueuePublisher>,
    selector: Arc<dyn DeviceSelector>,
    claim_attempts: u32,
}

impl DispatchCoordinator {
    pub fn new(
        store: Arc<dyn DeviceStore>,
        publisher: Arc<dyn QueuePublisher>,
        config: &DispatcherConfig,
    ) -> Self {
        Self {
            store,
            publisher,
            selector: Arc::new(LeastRecentlyTriggeredSelector::new()),
            claim_attempts: config.claim_attempts.max(1),
        }
    }

    /// 替换默认的选择策略
    pub fn with_selector(mut self, selector: Arc<dyn DeviceSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn selector(&self) -> &dyn DeviceSelector {
        self.selector.as_ref()
    }

    /// 将负载分发到最久未触发的设备
    ///
    /// # 错误
    ///
    /// * `NoDeviceAvailable` - 没有注册任何设备，未做任何发布或存储修改
    /// * `MessageQueue` / `PublishTimeout` - 发布失败，设备触发时间保持不变
    /// * `PostDispatchPersist` - 消息已投递但触发时间未能保存（记账漂移）
    /// * `DispatchContention` - 多次尝试后仍被并发分发抢占
    pub async fn dispatch(&self, payload: &serde_json::Value) -> BeaconResult<DispatchReceipt> {
        let claim = match self.claim_device().await {
            Ok(claim) => claim,
            Err(e) => {
                record_outcome(&e);
                return Err(e);
            }
        };

        if let Err(e) = self
            .publisher
            .publish(claim.device.routing_key(), payload)
            .await
        {
            warn!(
                device = %claim.device.name,
                publisher = self.publisher.name(),
                "函数触发发布失败: {e}"
            );
            self.release(&claim).await;
            record_outcome(&e);
            return Err(e);
        }

        let receipt = self.confirm(&claim).await;
        match &receipt {
            Ok(receipt) => {
                counter!("beacon_dispatch_total", "outcome" => "triggered").increment(1);
                info!(
                    device = %receipt.device_name,
                    attempts = receipt.attempts,
                    "函数已触发: {}",
                    receipt.triggered_at
                );
            }
            Err(e) => record_outcome(e),
        }
        receipt
    }

    /// 选择设备并以条件更新占用它
    async fn claim_device(&self) -> BeaconResult<Claim> {
        for attempt in 1..=self.claim_attempts {
            let devices = self.store.list_by_trigger_recency().await?;
            let Some(device) = self.selector.select(&devices) else {
                debug!("分发时没有可用设备");
                return Err(BeaconError::NoDeviceAvailable);
            };

            let claimed_at = next_trigger_time(now_utc(), &devices);
            let claimed = self
                .store
                .reserve_last_triggered(&device.id, device.last_triggered, Some(claimed_at))
                .await?;

            if claimed {
                debug!(
                    "{} 策略选中设备 {} (第{}次尝试)",
                    self.selector.name(),
                    device.name,
                    attempt
                );
                return Ok(Claim {
                    device: device.clone(),
                    previous: device.last_triggered,
                    claimed_at,
                    attempts: attempt,
                });
            }

            debug!(
                "设备 {} 已被并发分发占用，重新选择 ({}/{})",
                device.name, attempt, self.claim_attempts
            );
        }

        warn!("{} 次尝试后仍未能占用设备", self.claim_attempts);
        Err(BeaconError::DispatchContention {
            attempts: self.claim_attempts,
        })
    }

    /// 发布成功后把触发时间前移到交付完成的时刻
    async fn confirm(&self, claim: &Claim) -> BeaconResult<DispatchReceipt> {
        let triggered_at = now_utc().max(claim.claimed_at);
        let device = &claim.device;

        match self
            .store
            .swap_last_triggered(&device.id, Some(claim.claimed_at), Some(triggered_at))
            .await
        {
            Ok(true) => Ok(DispatchReceipt {
                device_id: device.id,
                device_name: device.name.clone(),
                triggered_at,
                attempts: claim.attempts,
            }),
            Ok(false) => {
                // 发布期间设备被注销，占用时写入的时间即为最终记录
                warn!(device = %device.name, "确认触发时设备记录已变化");
                Ok(DispatchReceipt {
                    device_id: device.id,
                    device_name: device.name.clone(),
                    triggered_at: claim.claimed_at,
                    attempts: claim.attempts,
                })
            }
            Err(e) => {
                error!(
                    drift = true,
                    device = %device.name,
                    claimed_at = %claim.claimed_at,
                    "消息已投递但触发时间保存失败: {e}"
                );
                counter!("beacon_dispatch_drift_total", "phase" => "confirm").increment(1);
                Err(BeaconError::PostDispatchPersist {
                    device: device.name.clone(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// 发布失败后撤销占用
    async fn release(&self, claim: &Claim) {
        let device = &claim.device;
        match self
            .store
            .reserve_last_triggered(&device.id, Some(claim.claimed_at), claim.previous)
            .await
        {
            Ok(true) => debug!("已撤销设备 {} 的占用", device.name),
            Ok(false) => warn!(device = %device.name, "撤销占用时设备记录已变化"),
            Err(e) => {
                error!(
                    drift = true,
                    device = %device.name,
                    claimed_at = %claim.claimed_at,
                    "发布失败且无法撤销设备占用: {e}"
                );
                counter!("beacon_dispatch_drift_total", "phase" => "release").increment(1);
            }
        }
    }
}

/// 新的触发时间：当前时间，且严格晚于集合中任何已记录的触发时间
pub fn next_trigger_time(now: DateTime<Utc>, devices: &[Device]) -> DateTime<Utc> {
    match devices.iter().filter_map(|d| d.last_triggered).max() {
        Some(latest) if latest >= now => latest + Duration::microseconds(1),
        _ => now,
    }
}

fn record_outcome(error: &BeaconError) {
    let outcome = match error {
        BeaconError::NoDeviceAvailable => "no_device",
        BeaconError::DispatchContention { .. } => "contention",
        e if e.is_publish_failure() => "publish_failed",
        e if e.is_drift() => "drift",
        _ => "error",
    };
    counter!("beacon_dispatch_total", "outcome" => outcome).increment(1);
}
