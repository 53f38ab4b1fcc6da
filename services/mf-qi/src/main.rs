//! mf-qi Service - Packaging line QC inspection form

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mf_qi::api::{AppState, router};
use mf_qi::application::{ReferenceLoader, ServiceHandler, run_autosave};
use mf_qi::infrastructure::DraftRepository;
use qc_adapter_local_store::FileStore;
use qc_adapter_sheets::{SheetsClient, SheetsConfig};
use qc_common::SystemClock;
use qc_config::AppConfig;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // 加载配置
    let config = AppConfig::load("config")?;
    qc_telemetry::init_for_env(&config.telemetry.log_level, config.is_production());
    info!(app = %config.app_name, env = %config.app_env, "Initializing mf-qi Service...");
    let metrics = qc_telemetry::init_metrics()?;

    let store = FileStore::open(&config.draft.store_dir).await?;
    let sheets = Arc::new(SheetsClient::new(SheetsConfig::from(&config.remote))?);

    let handler = Arc::new(ServiceHandler::new(
        Arc::new(ReferenceLoader::new(sheets.clone())),
        DraftRepository::new(Arc::new(store.clone())),
        sheets.clone(),
        Arc::new(SystemClock),
        config.form_number.scheme,
    ));

    match handler.startup().await {
        Some(draft) => info!(
            saved_at = %draft.timestamp,
            rows = draft.row_count,
            "Draft pending, restore or discard it to continue"
        ),
        None => info!("No draft found, started a new form"),
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let autosave = tokio::spawn(run_autosave(
        handler.clone(),
        Duration::from_secs(config.draft.autosave_interval_secs),
        shutdown_rx,
    ));

    let state = AppState::new(handler.clone())
        .with_draft_store(store)
        .with_remote(sheets)
        .with_metrics(metrics);
    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "Starting mf-qi");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 停止定时任务后做最后一次保存
    let _ = shutdown_tx.send(true);
    autosave.await?;
    handler.autosave().await;

    info!("mf-qi stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
