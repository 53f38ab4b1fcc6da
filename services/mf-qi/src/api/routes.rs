//! 路由与处理函数

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use qc_adapter_local_store::FileStore;
use qc_adapter_sheets::check_sheets_health;
use qc_common::HealthReport;
use qc_errors::AppError;
use qc_ports::{RecentForm, ReferenceDataPort};
use qc_telemetry::PrometheusHandle;
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::extract::{ApiJson, RowIdPath};
use crate::application::{
    ExpiryCorrection, FormView, HeaderUpdateOutcome, RowView, ServiceHandler, SubmitOutcome,
    UpdateHeaderCommand, UpdateRowCommand,
};
use crate::domain::reference::{ReferenceData, ReferenceSources};

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<ServiceHandler>,
    /// 用于健康检查，测试中可为空
    pub draft_store: Option<FileStore>,
    pub remote: Option<Arc<dyn ReferenceDataPort>>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(handler: Arc<ServiceHandler>) -> Self {
        Self {
            handler,
            draft_store: None,
            remote: None,
            metrics: None,
        }
    }

    pub fn with_draft_store(mut self, store: FileStore) -> Self {
        self.draft_store = Some(store);
        self
    }

    pub fn with_remote(mut self, remote: Arc<dyn ReferenceDataPort>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/reference", get(reference))
        .route("/api/reference/refresh", post(refresh_reference))
        .route("/api/form", get(form))
        .route("/api/form/header", put(update_header))
        .route("/api/form/expiry/correct", post(correct_expiry))
        .route("/api/form/reset", post(reset_form))
        .route("/api/rows", post(add_row))
        .route("/api/rows/{id}", patch(update_row).delete(remove_row))
        .route("/api/rows/{id}/all-ok", post(mark_all_ok))
        .route("/api/draft/restore", post(restore_draft))
        .route("/api/draft/discard", post(discard_draft))
        .route("/api/submit", post(submit))
        .route("/api/recent-forms", get(recent_forms))
        .with_state(state)
}

// ========== 健康检查 ==========

#[derive(Debug, Default, Deserialize)]
struct HealthQuery {
    /// 为 true 时探测远端
    #[serde(default)]
    deep: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// 有表使用内置数据
    degraded: bool,
    sources: ReferenceSources,
    #[serde(flatten)]
    report: HealthReport,
}

async fn health(State(state): State<AppState>, Query(query): Query<HealthQuery>) -> impl IntoResponse {
    let mut report = HealthReport::new();
    if let Some(store) = &state.draft_store {
        report.add_check("draft-store", store.health_check().await);
    }
    if query.deep {
        if let Some(remote) = &state.remote {
            report.add_check("remote", check_sheets_health(remote.as_ref()).await);
        }
    }

    let sources = state.handler.reference_sources().await;
    let code = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = HealthResponse {
        status: if report.healthy { "healthy" } else { "unhealthy" },
        version: env!("CARGO_PKG_VERSION"),
        degraded: sources.any_fallback(),
        sources,
        report,
    };
    (code, Json(body))
}

async fn metrics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::not_found("metrics recorder is not installed"))?;
    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        handle.render(),
    ))
}

// ========== 参考数据 ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceView {
    products: Vec<String>,
    #[serde(flatten)]
    data: ReferenceData,
}

async fn reference(State(state): State<AppState>) -> Json<ReferenceView> {
    let data = state.handler.reference_data().await;
    Json(ReferenceView {
        products: data.product_names(),
        data,
    })
}

async fn refresh_reference(State(state): State<AppState>) -> Json<ReferenceSources> {
    Json(state.handler.refresh_reference().await)
}

#[derive(Debug, Default, Deserialize)]
struct RecentFormsQuery {
    limit: Option<u32>,
}

async fn recent_forms(
    State(state): State<AppState>,
    Query(query): Query<RecentFormsQuery>,
) -> ApiResult<Json<Vec<RecentForm>>> {
    Ok(Json(state.handler.recent_forms(query.limit).await?))
}

// ========== 表单 ==========

async fn form(State(state): State<AppState>) -> Json<FormView> {
    Json(state.handler.form_view().await)
}

async fn update_header(
    State(state): State<AppState>,
    ApiJson(cmd): ApiJson<UpdateHeaderCommand>,
) -> ApiResult<Json<HeaderUpdateOutcome>> {
    Ok(Json(state.handler.update_header(cmd).await?))
}

async fn correct_expiry(State(state): State<AppState>) -> ApiResult<Json<ExpiryCorrection>> {
    Ok(Json(state.handler.accept_expiry_correction().await?))
}

async fn reset_form(State(state): State<AppState>) -> ApiResult<Json<FormView>> {
    Ok(Json(state.handler.reset().await?))
}

// ========== 托盘行 ==========

async fn add_row(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<RowView>)> {
    let row = state.handler.add_row().await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn update_row(
    State(state): State<AppState>,
    RowIdPath(id): RowIdPath,
    ApiJson(cmd): ApiJson<UpdateRowCommand>,
) -> ApiResult<Json<RowView>> {
    Ok(Json(state.handler.update_row(id, cmd).await?))
}

async fn remove_row(State(state): State<AppState>, RowIdPath(id): RowIdPath) -> ApiResult<StatusCode> {
    state.handler.remove_row(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_all_ok(
    State(state): State<AppState>,
    RowIdPath(id): RowIdPath,
) -> ApiResult<Json<RowView>> {
    Ok(Json(state.handler.mark_all_ok(id).await?))
}

// ========== 草稿 ==========

async fn restore_draft(State(state): State<AppState>) -> ApiResult<Json<FormView>> {
    Ok(Json(state.handler.restore_draft().await?))
}

async fn discard_draft(State(state): State<AppState>) -> ApiResult<Json<FormView>> {
    Ok(Json(state.handler.discard_draft().await?))
}

// ========== 提交 ==========

async fn submit(State(state): State<AppState>) -> ApiResult<Json<SubmitOutcome>> {
    Ok(Json(state.handler.submit().await?))
}
