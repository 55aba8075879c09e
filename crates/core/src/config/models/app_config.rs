use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    api_observability::{ApiConfig, ObservabilityConfig},
    database::DatabaseConfig,
    dispatcher::DispatcherConfig,
    message_queue::MessageQueueConfig,
};

/// 默认配置文件搜索路径
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "config/beacon.toml",
    "beacon.toml",
    "/etc/beacon/config.toml",
];

/// System configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub message_queue: MessageQueueConfig,
    pub dispatcher: DispatcherConfig,
    pub api: ApiConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from config file and environment variables
    ///
    /// Load order:
    /// 1. Default configuration
    /// 2. Config file (TOML format)
    /// 3. Environment variable overrides (prefix: BEACON_, nested keys separated by `__`,
    ///    e.g. `BEACON_DATABASE__URL`)
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        // 1. Load config file if provided
        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        } else if let Some(path) = DEFAULT_CONFIG_PATHS
            .iter()
            .find(|path| Path::new(path).exists())
        {
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }

        // 2. Environment variable overrides - highest priority
        builder = builder.add_source(
            Environment::with_prefix("BEACON")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }

    /// Validate configuration effectiveness
    pub fn validate(&self) -> Result<()> {
        self.database.validate().context("数据库配置验证失败")?;

        self.message_queue
            .validate()
            .context("消息队列配置验证失败")?;

        self.dispatcher
            .validate()
            .context("Dispatcher配置验证失败")?;

        self.api.validate().context("API配置验证失败")?;

        self.observability
            .validate()
            .context("可观测性配置验证失败")?;

        // 发布超时必须先于请求超时触发，才能以发布失败的形式返回给调用方
        if self.message_queue.publish_timeout_seconds >= self.api.request_timeout_seconds {
            return Err(anyhow::anyhow!(
                "消息发布超时 ({}s) 必须小于API请求超时 ({}s)",
                self.message_queue.publish_timeout_seconds,
                self.api.request_timeout_seconds
            ));
        }

        Ok(())
    }
}
