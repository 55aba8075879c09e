use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;

use beacon_api::{create_app, AppState};
use beacon_core::{AppConfig, QueuePublisher};
use beacon_dispatcher::{DeviceRegistry, DispatchCoordinator};
use beacon_infrastructure::{DatabaseManager, InMemoryQueuePublisher, RabbitMqPublisher};

/// 主应用程序
pub struct Application {
    config: AppConfig,
    database: DatabaseManager,
    router: Router,
}

impl Application {
    /// 连接存储、创建发布器并组装HTTP路由
    pub async fn new(config: AppConfig, metrics: Option<PrometheusHandle>) -> Result<Self> {
        info!("初始化应用程序");

        let database = DatabaseManager::new(&config.database)
            .await
            .context("创建数据库连接池失败")?;
        database.migrate().await.context("数据库迁移失败")?;
        let store = database.device_store();

        let publisher = create_publisher(&config);
        info!("消息队列发布器: {}", publisher.name());

        let coordinator = DispatchCoordinator::new(store.clone(), publisher, &config.dispatcher);
        let state = AppState {
            registry: DeviceRegistry::new(store),
            coordinator: Arc::new(coordinator),
            metrics,
        };
        let router = create_app(state, &config.api, &config.observability);

        Ok(Self {
            config,
            database,
            router,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// 运行API服务器直到收到关闭信号
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let bind_address = &self.config.api.bind_address;
        let listener = TcpListener::bind(bind_address)
            .await
            .with_context(|| format!("绑定地址失败: {bind_address}"))?;

        info!("API服务器启动在 http://{}", listener.local_addr()?);

        axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("API服务器收到关闭信号");
            })
            .await
            .context("API服务器运行失败")?;

        self.database.close().await;
        info!("API服务器已停止");
        Ok(())
    }
}

fn create_publisher(config: &AppConfig) -> Arc<dyn QueuePublisher> {
    if config.message_queue.is_in_memory() {
        Arc::new(InMemoryQueuePublisher::new())
    } else {
        Arc::new(RabbitMqPublisher::new(config.message_queue.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use beacon_core::{DatabaseConfig, MessageQueueType};
    use tower::ServiceExt;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.database = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..DatabaseConfig::default()
        };
        config.message_queue.r#type = MessageQueueType::InMemory;
        config.api.bind_address = "127.0.0.1:0".to_string();
        config
    }

    #[tokio::test]
    async fn test_application_wiring() {
        let app = Application::new(test_config(), None).await.unwrap();

        let request = Request::builder()
            .method("POST")
            .uri("/api/devices")
            .body(Body::from(r#"{"name": "pixel-7"}"#))
            .unwrap();
        let response = app.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .method("POST")
            .uri("/api/run_function")
            .body(Body::from(r#"{"fn": "ping"}"#))
            .unwrap();
        let response = app.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_route_absent_without_recorder() {
        let app = Application::new(test_config(), None).await.unwrap();
        let request = Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();
        let response = app.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let app = Application::new(test_config(), None).await.unwrap();
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(async move { app.run(rx).await });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        tx.send(()).unwrap();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
