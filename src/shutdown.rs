//! 进程关闭：信号监听、关闭广播以及API服务任务的监督

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// 关闭信号广播，克隆后共享同一个通道
#[derive(Clone)]
pub struct ShutdownManager {
    tx: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 订阅关闭信号，关闭之后订阅的接收器会立即收到信号
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        let rx = self.tx.subscribe();
        if !self.triggered.load(Ordering::SeqCst) {
            return rx;
        }
        let (tx, rx) = broadcast::channel(1);
        let _ = tx.send(());
        rx
    }

    /// 触发关闭，重复调用无效果
    pub fn shutdown(&self) {
        if self.triggered.swap(true, Ordering::SeqCst) {
            debug!("关闭已经触发过");
            return;
        }
        info!("触发系统关闭");
        // 可能没有接收者
        let _ = self.tx.send(());
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 等待 Ctrl+C 或 SIGTERM
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("安装Ctrl+C信号处理器失败: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("安装SIGTERM信号处理器失败: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("收到Ctrl+C信号"),
        _ = terminate => info!("收到SIGTERM信号"),
    }
}

/// 等待关闭信号或服务任务结束
///
/// 服务任务先结束时直接返回它的结果，不再等待信号。收到信号后广播关闭，
/// 并在 `grace` 内等待服务退出，超时则中止任务。
pub async fn supervise<F>(
    manager: &ShutdownManager,
    mut server: JoinHandle<Result<()>>,
    signal: F,
    grace: Duration,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        joined = &mut server => {
            let result = joined.context("API服务器任务异常终止")?;
            match &result {
                Ok(()) => warn!("API服务器在收到关闭信号前退出"),
                Err(e) => error!("应用运行失败: {e:#}"),
            }
            return result;
        }
        _ = signal => info!("开始优雅关闭..."),
    }

    manager.shutdown();

    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => joined.context("API服务器任务异常终止")?,
        Err(_) => {
            server.abort();
            warn!("应用关闭超时，强制退出");
            Err(anyhow!("应用未在 {grace:?} 内关闭"))
        }
    }
}
