use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use beacon_core::{now_utc, BeaconResult, Device, DeviceId, DeviceStore};

use crate::database::mapping::MappingHelpers;

const DEVICE_COLUMNS: &str = "id, name, created_at, last_updated, last_triggered";

/// PostgreSQL设备仓储实现
pub struct PostgresDeviceRepository {
    pool: PgPool,
}

impl PostgresDeviceRepository {
    /// 创建新的PostgreSQL设备仓储
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 将数据库行转换为Device模型
    fn row_to_device(row: &sqlx::postgres::PgRow) -> BeaconResult<Device> {
        let id: Uuid = row.try_get("id")?;
        Ok(Device {
            id: DeviceId::from(id),
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
            last_updated: row.try_get("last_updated")?,
            last_triggered: row.try_get("last_triggered")?,
        })
    }

    async fn fetch_all(&self, order_by: &str) -> BeaconResult<Vec<Device>> {
        let rows = sqlx::query(&format!(
            "SELECT {DEVICE_COLUMNS} FROM devices ORDER BY {order_by}"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_device).collect()
    }
}

#[async_trait]
impl DeviceStore for PostgresDeviceRepository {
    async fn create(&self, device: &Device) -> BeaconResult<Device> {
        sqlx::query(
            r#"
            INSERT INTO devices (id, name, created_at, last_updated, last_triggered)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(device.id.as_uuid())
        .bind(&device.name)
        .bind(device.created_at)
        .bind(device.last_updated)
        .bind(device.last_triggered)
        .execute(&self.pool)
        .await
        .map_err(|e| MappingHelpers::insert_error(e, &device.name))?;

        debug!("创建设备成功: {} ({})", device.name, device.id);
        Ok(device.clone())
    }

    async fn get_by_id(&self, id: &DeviceId) -> BeaconResult<Option<Device>> {
        let row = sqlx::query(&format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_device).transpose()
    }

    async fn delete(&self, id: &DeviceId) -> BeaconResult<Option<Device>> {
        let row = sqlx::query(&format!(
            "DELETE FROM devices WHERE id = $1 RETURNING {DEVICE_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            debug!("删除设备成功: {}", id);
        }
        row.as_ref().map(Self::row_to_device).transpose()
    }

    async fn list_by_last_updated(&self) -> BeaconResult<Vec<Device>> {
        self.fetch_all("last_updated DESC, created_at DESC").await
    }

    async fn list_by_trigger_recency(&self) -> BeaconResult<Vec<Device>> {
        self.fetch_all("last_triggered DESC NULLS LAST, created_at ASC")
            .await
    }

    async fn swap_last_triggered(
        &self,
        id: &DeviceId,
        expected: Option<DateTime<Utc>>,
        new: Option<DateTime<Utc>>,
    ) -> BeaconResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET last_triggered = $1, last_updated = $2
            WHERE id = $3 AND last_triggered IS NOT DISTINCT FROM $4
            "#,
        )
        .bind(new)
        .bind(now_utc())
        .bind(id.as_uuid())
        .bind(expected)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn reserve_last_triggered(
        &self,
        id: &DeviceId,
        expected: Option<DateTime<Utc>>,
        new: Option<DateTime<Utc>>,
    ) -> BeaconResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET last_triggered = $1
            WHERE id = $2 AND last_triggered IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(new)
        .bind(id.as_uuid())
        .bind(expected)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn health_check(&self) -> BeaconResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
