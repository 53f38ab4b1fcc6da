//! Sheets health check

use std::time::Instant;

use qc_common::BaseHealthResult;
use qc_ports::ReferenceDataPort;
use tracing::debug;

/// 以读取产线表作为探测请求
pub async fn check_sheets_health(client: &dyn ReferenceDataPort) -> BaseHealthResult {
    let start = Instant::now();
    let probe = client.fetch_lines().await;
    if let Ok(lines) = &probe {
        debug!(lines = lines.len(), "Sheets health check passed");
    }
    BaseHealthResult::from_probe(start, probe)
}
