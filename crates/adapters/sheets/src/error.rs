//! Error mapping for the sheets adapter

use qc_errors::AppError;
use serde_json::Value;

/// Convert reqwest error to AppError
pub fn map_http_error(err: reqwest::Error, context: &str) -> AppError {
    // 不要把 URL 带进错误信息，里面有部署密钥
    let err = err.without_url();

    if err.is_timeout() {
        AppError::external_service(format!("{}: request timed out", context))
    } else if err.is_connect() {
        AppError::external_service(format!("{}: connection failed: {}", context, err))
    } else if err.is_decode() {
        AppError::external_service(format!("{}: malformed response: {}", context, err))
    } else {
        AppError::external_service(format!("{}: {}", context, err))
    }
}

/// 解析 `{success, <field>: ...}` 形式的应答
pub fn decode_envelope<T>(body: Value, action: &str, field: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success {
        return Err(AppError::external_service(format!(
            "{} rejected: {}",
            action,
            envelope_message(&body).unwrap_or("no message")
        )));
    }

    let payload = body.get(field).cloned().ok_or_else(|| {
        AppError::external_service(format!("{} response is missing `{}`", action, field))
    })?;

    serde_json::from_value(payload).map_err(|e| {
        AppError::external_service(format!("{} returned malformed `{}`: {}", action, field, e))
    })
}

/// 应答中的说明文字，兼容 `message` 和 `error` 两种字段
pub fn envelope_message(body: &Value) -> Option<&str> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
}
