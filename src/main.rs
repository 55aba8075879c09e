use std::time::Duration;

use anyhow::{Context, Result};
use beacon_core::AppConfig;
use clap::{Arg, Command};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use beacon::app::Application;
use beacon::shutdown::{self, ShutdownManager};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let matches = Command::new("beacon")
        .version("1.0.0")
        .about("设备注册与远程函数触发分发系统")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径，未指定时按默认路径搜索"),
        )
        .arg(
            Arg::new("bind")
                .short('b')
                .long("bind")
                .value_name("ADDR")
                .help("HTTP监听地址，覆盖配置文件"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别，覆盖配置文件")
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式，覆盖配置文件")
                .value_parser(["json", "pretty"]),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config");

    // 加载配置
    let mut config = AppConfig::load(config_path.map(String::as_str))
        .context("加载配置失败")?;

    if let Some(bind) = matches.get_one::<String>("bind") {
        config.api.bind_address = bind.clone();
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.observability.log_level = level.clone();
    }
    if let Some(format) = matches.get_one::<String>("log-format") {
        config.observability.log_format = format.clone();
    }

    // 初始化日志系统
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    )?;

    info!("启动Beacon设备分发服务");
    if let Some(path) = config_path {
        info!("配置文件: {path}");
    }

    let metrics = init_metrics(config.observability.metrics_enabled)?;

    // 创建应用实例
    let app = Application::new(config, metrics).await?;

    // 创建优雅关闭管理器
    let shutdown_manager = ShutdownManager::new();

    // 启动应用
    let shutdown_rx = shutdown_manager.subscribe();
    let app_handle = tokio::spawn(async move { app.run(shutdown_rx).await });

    shutdown::supervise(
        &shutdown_manager,
        app_handle,
        shutdown::wait_for_signal(),
        Duration::from_secs(30),
    )
    .await?;

    info!("Beacon设备分发服务已退出");
    Ok(())
}

/// 初始化日志系统
fn init_logging(log_level: &str, log_format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .context("初始化JSON日志格式失败")?;
        }
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .context("初始化Pretty日志格式失败")?;
        }
        _ => {
            return Err(anyhow::anyhow!("不支持的日志格式: {log_format}"));
        }
    }

    Ok(())
}

/// 安装全局Prometheus记录器
fn init_metrics(enabled: bool) -> Result<Option<PrometheusHandle>> {
    if !enabled {
        info!("指标收集已禁用");
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("安装Prometheus指标记录器失败")?;
    Ok(Some(handle))
}
