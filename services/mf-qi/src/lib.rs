//! mf-qi - 包装线质量检查表服务
//!
//! 一个会话对应一张检查表：加载标准矩阵、录入托盘检查行、自动保存草稿、提交到表格脚本

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
