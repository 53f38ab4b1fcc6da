//! 请求提取器
//!
//! 请求体或路径参数无法解析时，同样以 Problem Details 返回 400

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use qc_errors::AppError;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::domain::value_objects::RowId;

/// JSON 请求体
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ApiError(AppError::validation(e.body_text())))?;
        Ok(Self(value))
    }
}

/// 路径中的行 ID
pub struct RowIdPath(pub RowId);

impl<S> FromRequestParts<S> for RowIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<u32>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| ApiError(AppError::validation(e.body_text())))?;
        Ok(Self(RowId(id)))
    }
}
