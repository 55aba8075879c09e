//! PostgreSQL 与 SQLite 仓储共用的映射辅助函数

use beacon_core::{BeaconError, DeviceId};
use uuid::Uuid;

pub struct MappingHelpers;

impl MappingHelpers {
    /// 将插入失败转换为领域错误，唯一约束冲突视为名称重复
    pub fn insert_error(error: sqlx::Error, name: &str) -> BeaconError {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                BeaconError::duplicate_name(name)
            }
            _ => BeaconError::Database(error),
        }
    }

    /// SQLite 以文本保存设备ID
    pub fn parse_device_id(raw: &str) -> Result<DeviceId, BeaconError> {
        Uuid::parse_str(raw)
            .map(DeviceId::from)
            .map_err(|e| BeaconError::DatabaseOperation(format!("数据库中的设备ID无效 '{raw}': {e}")))
    }
}
