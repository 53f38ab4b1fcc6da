//! telemetry - 可观测性库
//!
//! 日志初始化、Prometheus 导出和业务计数器

pub use metrics_exporter_prometheus::{BuildError, PrometheusHandle};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 参考数据回退次数，标签 `table`
pub const REFERENCE_FALLBACK_TOTAL: &str = "qc_reference_fallback_total";
/// 提交次数，标签 `result`
pub const SUBMISSIONS_TOTAL: &str = "qc_submissions_total";
/// 草稿保存次数
pub const DRAFTS_SAVED_TOTAL: &str = "qc_drafts_saved_total";

/// 初始化 tracing
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// 按环境选择日志格式
pub fn init_for_env(log_level: &str, production: bool) {
    if production {
        init_tracing_json(log_level);
    } else {
        init_tracing(log_level);
    }
}

/// 安装全局 Prometheus recorder，返回用于渲染 `/metrics` 的句柄
///
/// 每个进程只能安装一次
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// 记录一次参考数据回退
pub fn record_reference_fallback(table: &'static str) {
    metrics::counter!(REFERENCE_FALLBACK_TOTAL, "table" => table).increment(1);
}

/// 记录一次提交结果
pub fn record_submission(success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!(SUBMISSIONS_TOTAL, "result" => result).increment(1);
}

/// 记录一次草稿保存
pub fn record_draft_saved() {
    metrics::counter!(DRAFTS_SAVED_TOTAL).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_reach_recorder() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_submission(true);
            record_submission(false);
            record_submission(false);
            record_reference_fallback("products");
            record_draft_saved();
        });

        let text = handle.render();
        assert!(text.contains(r#"qc_submissions_total{result="failure"} 2"#), "{}", text);
        assert!(text.contains(r#"qc_submissions_total{result="success"} 1"#));
        assert!(text.contains(r#"qc_reference_fallback_total{table="products"} 1"#));
        assert!(text.contains("qc_drafts_saved_total 1"));
    }
}
