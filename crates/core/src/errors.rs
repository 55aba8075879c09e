use thiserror::Error;

/// Beacon错误类型定义
#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("数据库操作错误: {0}")]
    DatabaseOperation(String),

    #[error("无效的设备ID: {0}")]
    InvalidDeviceId(String),

    #[error("数据验证失败: {0}")]
    Validation(String),

    #[error("设备未找到: {id}")]
    DeviceNotFound { id: String },

    #[error("设备名称已存在: {name}")]
    DuplicateDeviceName { name: String },

    #[error("没有可用的设备")]
    NoDeviceAvailable,

    #[error("消息队列错误: {0}")]
    MessageQueue(String),

    #[error("发布到队列 {queue} 超时 ({timeout_seconds}s)")]
    PublishTimeout { queue: String, timeout_seconds: u64 },

    #[error("消息已投递到设备 {device}，但触发时间保存失败: {message}")]
    PostDispatchPersist { device: String, message: String },

    #[error("设备选择冲突，{attempts} 次尝试后仍未能占用设备")]
    DispatchContention { attempts: u32 },

    #[error("序列化错误: {0}")]
    Serialization(String),

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl BeaconError {
    pub fn device_not_found<S: Into<String>>(id: S) -> Self {
        Self::DeviceNotFound { id: id.into() }
    }

    pub fn duplicate_name<S: Into<String>>(name: S) -> Self {
        Self::DuplicateDeviceName { name: name.into() }
    }

    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// 由调用方输入引起的错误，不涉及任何状态变更
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            BeaconError::InvalidDeviceId(_)
                | BeaconError::Validation(_)
                | BeaconError::DeviceNotFound { .. }
                | BeaconError::DuplicateDeviceName { .. }
                | BeaconError::NoDeviceAvailable
        )
    }

    /// 投递发布阶段的失败（Broker不可达、连接错误、超时）
    pub fn is_publish_failure(&self) -> bool {
        matches!(
            self,
            BeaconError::MessageQueue(_) | BeaconError::PublishTimeout { .. }
        )
    }

    /// 已投递的触发与记录的 last_triggered 不一致
    pub fn is_drift(&self) -> bool {
        matches!(self, BeaconError::PostDispatchPersist { .. })
    }
}

impl From<serde_json::Error> for BeaconError {
    fn from(err: serde_json::Error) -> Self {
        BeaconError::Serialization(err.to_string())
    }
}

/// 统一的Result类型
pub type Result<T> = std::result::Result<T, BeaconError>;
