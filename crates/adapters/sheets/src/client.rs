//! Sheets client implementation

use std::time::Duration;

use async_trait::async_trait;
use qc_config::SubmissionMode;
use qc_errors::{AppError, AppResult};
use qc_ports::{
    InspectionSubmission, PersonnelRoster, ProductionLine, RecentForm, ReferenceDataPort,
    StandardMatrix, SubmissionPort, SubmissionReceipt,
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::SheetsConfig;
use crate::error::{decode_envelope, map_http_error};

/// 提交应答
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitAck {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    form_number: Option<String>,
}

/// 表格脚本客户端
pub struct SheetsClient {
    http: reqwest::Client,
    endpoint: Secret<String>,
    submission_mode: SubmissionMode,
}

impl SheetsClient {
    /// 创建客户端
    pub fn new(config: SheetsConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;
        Self::with_http_client(config, http)
    }

    /// 使用外部构造的 HTTP 客户端
    pub fn with_http_client(config: SheetsConfig, http: reqwest::Client) -> AppResult<Self> {
        // 提前校验，避免每次请求才发现地址无效
        Url::parse(config.endpoint.expose_secret())
            .map_err(|e| AppError::validation(format!("Invalid sheets endpoint: {}", e)))?;

        info!(
            submission_mode = ?config.submission_mode,
            timeout_secs = config.timeout_secs,
            "Sheets client created"
        );

        Ok(Self {
            http,
            endpoint: config.endpoint,
            submission_mode: config.submission_mode,
        })
    }

    pub fn submission_mode(&self) -> SubmissionMode {
        self.submission_mode
    }

    fn action_url(&self, action: &str, extra: &[(&str, String)]) -> AppResult<Url> {
        let mut url = Url::parse(self.endpoint.expose_secret())
            .map_err(|e| AppError::internal(format!("Invalid sheets endpoint: {}", e)))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("action", action);
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// 执行 `GET ?action=...` 并取出 `field` 字段
    async fn get_action<T: DeserializeOwned>(
        &self,
        action: &str,
        extra: &[(&str, String)],
        field: &str,
    ) -> AppResult<T> {
        let url = self.action_url(action, extra)?;
        debug!(action, "Requesting sheets action");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| map_http_error(e, action))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "{} failed with HTTP {}",
                action, status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| map_http_error(e, action))?;

        decode_envelope(body, action, field)
    }

    /// 读取最近提交的表单，limit 截断到 1..=100
    pub async fn fetch_recent_forms(&self, limit: u32) -> AppResult<Vec<RecentForm>> {
        let limit = limit.clamp(1, 100);
        self.get_action("getRecentForms", &[("limit", limit.to_string())], "forms")
            .await
    }

    /// 追加一条检查记录
    pub async fn submit(&self, submission: &InspectionSubmission) -> AppResult<SubmissionReceipt> {
        let url = Url::parse(self.endpoint.expose_secret())
            .map_err(|e| AppError::internal(format!("Invalid sheets endpoint: {}", e)))?;

        info!(
            form_number = %submission.form_number,
            pallets = submission.pallet_checks.len(),
            "Submitting inspection form"
        );

        let response = self
            .http
            .post(url)
            .json(submission)
            .send()
            .await
            .map_err(|e| map_http_error(e, "submit"))?;

        let status = response.status();

        if self.submission_mode == SubmissionMode::FireAndForget {
            debug!(%status, "Submission sent without acknowledgement check");
            return Ok(SubmissionReceipt::unacknowledged());
        }

        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "submit failed with HTTP {}",
                status
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| map_http_error(e, "submit"))?;

        let ack: SubmitAck = serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "Submission acknowledgement could not be parsed");
            AppError::external_service(format!("submit returned an unparseable acknowledgement: {}", e))
        })?;

        if !ack.success {
            let reason = ack
                .error
                .or(ack.message)
                .unwrap_or_else(|| "no message".to_string());
            return Err(AppError::external_service(format!("submit rejected: {}", reason)));
        }

        Ok(SubmissionReceipt {
            acknowledged: true,
            message: ack.message,
            form_number: ack.form_number,
        })
    }
}

#[async_trait]
impl ReferenceDataPort for SheetsClient {
    async fn fetch_standard_matrix(&self) -> AppResult<StandardMatrix> {
        self.get_action("getMatrix", &[], "matrix").await
    }

    async fn fetch_personnel(&self) -> AppResult<PersonnelRoster> {
        self.get_action("getPersonnel", &[], "personnel").await
    }

    async fn fetch_lines(&self) -> AppResult<Vec<ProductionLine>> {
        self.get_action("getLines", &[], "lines").await
    }

    async fn fetch_recent_forms(&self, limit: u32) -> AppResult<Vec<RecentForm>> {
        self.fetch_recent_forms(limit).await
    }
}

#[async_trait]
impl SubmissionPort for SheetsClient {
    async fn submit(&self, submission: &InspectionSubmission) -> AppResult<SubmissionReceipt> {
        self.submit(submission).await
    }
}
