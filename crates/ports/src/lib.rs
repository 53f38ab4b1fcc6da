//! ports - 抽象 trait 层
//!
//! 定义远端表格服务和本地存储的抽象接口，以及跨边界传输的数据结构

mod local_store;
mod reference;
mod remote;
mod submission;

pub use local_store::*;
pub use reference::*;
pub use remote::*;
pub use submission::*;
