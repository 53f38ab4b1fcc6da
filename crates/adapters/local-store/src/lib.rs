//! adapter-local-store - 本地持久化存储适配器
//!
//! 提供 `LocalStorePort` 的两种实现:
//! - `FileStore`: 每个键一个文件，写入先落临时文件再原子替换
//! - `MemoryStore`: 进程内存储，用于测试和无盘运行

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
