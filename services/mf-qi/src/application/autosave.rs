//! 定时自动保存

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::handler::ServiceHandler;

/// 按固定间隔保存草稿，直到收到关闭信号
pub async fn run_autosave(
    handler: Arc<ServiceHandler>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // 第一次 tick 立即返回，跳过
    ticker.tick().await;
    info!(period_secs = period.as_secs(), "Autosave task started");

    loop {
        tokio::select! {
            _ = ticker.tick() => handler.autosave().await,
            _ = shutdown.changed() => {
                debug!("Autosave task stopping");
                break;
            }
        }
    }
}
