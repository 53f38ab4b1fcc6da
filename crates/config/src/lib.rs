//! qc-config - 配置加载库

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8088
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// 提交方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionMode {
    /// 要求远端返回可解析的 `{success, message}` 应答
    #[default]
    Acknowledged,
    /// 只要 HTTP 请求送达即视为成功
    FireAndForget,
}

/// 远端表格脚本配置
///
/// endpoint 中包含部署密钥，按密钥处理
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub endpoint: Secret<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub submission_mode: SubmissionMode,
}

fn default_timeout_secs() -> u64 {
    15
}

/// 草稿存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    #[serde(default = "default_store_dir")]
    pub store_dir: String,
    #[serde(default = "default_autosave_interval_secs")]
    pub autosave_interval_secs: u64,
}

fn default_store_dir() -> String {
    "data/drafts".to_string()
}

fn default_autosave_interval_secs() -> u64 {
    30
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            autosave_interval_secs: default_autosave_interval_secs(),
        }
    }
}

/// 表单编号方案
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FormNumberScheme {
    /// `QC-` + 毫秒时间戳后 8 位
    #[default]
    Timestamp,
    /// `{序号}/QC/{区域}/{罗马月份}/{年份}`
    Structured,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormNumberConfig {
    #[serde(default)]
    pub scheme: FormNumberScheme,
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub server: ServerConfig,
    pub remote: RemoteConfig,
    #[serde(default)]
    pub draft: DraftConfig,
    #[serde(default)]
    pub form_number: FormNumberConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 顺序: `default.toml` -> `{APP_ENV}.toml` -> `QC_` 前缀环境变量（`__` 分隔层级）
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let figment = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("QC_").split("__"));

        Self::from_figment(figment)
    }

    /// 从已组装的 Figment 提取并校验
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.remote.endpoint.expose_secret();
        let parsed = url::Url::parse(endpoint).map_err(|e| ConfigError::Invalid {
            field: "remote.endpoint",
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "remote.endpoint",
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }

        if self.draft.autosave_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "draft.autosave_interval_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}
