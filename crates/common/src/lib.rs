//! common - 通用类型和工具库

pub mod health;
pub mod types;
pub mod utils;

pub use health::*;
pub use types::*;
