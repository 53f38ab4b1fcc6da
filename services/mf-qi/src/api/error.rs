//! API 错误响应

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use qc_errors::AppError;
use tracing::{debug, error};

/// 把 `AppError` 渲染为 RFC 7807 Problem Details
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problem = self.0.to_problem_details();
        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_client_error() {
            debug!(status = problem.status, detail = %problem.detail, "Request rejected");
        } else {
            error!(status = problem.status, detail = %problem.detail, "Request failed");
        }

        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(problem),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
