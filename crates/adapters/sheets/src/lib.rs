//! adapter-sheets - 表格脚本服务适配器
//!
//! 远端是一个部署在表格上的脚本，只有两类操作:
//! - `GET ?action=...` 读取参考数据和历史表单
//! - `POST` 追加一条检查记录
//!
//! 所有错误统一映射为 `AppError::ExternalService`

pub mod client;
pub mod config;
pub mod error;
pub mod health;

pub use client::SheetsClient;
pub use config::{SheetsConfig, SheetsConfigBuilder};
pub use health::check_sheets_health;
