//! 领域层
//!
//! 包含检查表实体、值对象、日期规则、提交校验与组装

pub mod entities;
pub mod reference;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use reference::*;
pub use services::*;
pub use value_objects::*;
