//! 组件健康检查结果

use std::fmt::Display;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// 单次探测结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseHealthResult {
    pub healthy: bool,
    /// 探测耗时（毫秒），失败时为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BaseHealthResult {
    pub fn healthy(latency_ms: u64) -> Self {
        Self {
            healthy: true,
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            latency_ms: None,
            error: Some(error.into()),
        }
    }

    /// 由探测开始时间和结果构造
    pub fn from_probe<T, E: Display>(started: Instant, outcome: Result<T, E>) -> Self {
        match outcome {
            Ok(_) => Self::healthy(started.elapsed().as_millis() as u64),
            Err(e) => Self::unhealthy(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    #[serde(flatten)]
    pub result: BaseHealthResult,
}

/// 汇总，任一组件不健康则整体不健康
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub checks: Vec<ComponentHealth>,
}

impl HealthReport {
    pub fn new() -> Self {
        Self {
            healthy: true,
            checks: Vec::new(),
        }
    }

    pub fn add_check(&mut self, name: impl Into<String>, result: BaseHealthResult) {
        self.healthy &= result.healthy;
        self.checks.push(ComponentHealth {
            name: name.into(),
            result,
        });
    }
}

impl Default for HealthReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_turns_unhealthy() {
        let mut report = HealthReport::new();
        report.add_check("draft-store", BaseHealthResult::healthy(1));
        assert!(report.healthy);

        report.add_check("remote", BaseHealthResult::unhealthy("connection refused"));
        assert!(!report.healthy);
        assert_eq!(report.checks.len(), 2);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["checks"][1]["error"], "connection refused");
        assert!(json["checks"][1].get("latency_ms").is_none());
    }

    #[test]
    fn test_from_probe() {
        let ok = BaseHealthResult::from_probe(Instant::now(), Ok::<_, String>(()));
        assert!(ok.healthy);
        assert!(ok.latency_ms.is_some());

        let failed = BaseHealthResult::from_probe(Instant::now(), Err::<(), _>("disk full"));
        assert!(!failed.healthy);
        assert_eq!(failed.error.as_deref(), Some("disk full"));
    }
}
