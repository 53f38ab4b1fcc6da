//! 本地持久化存储 trait 定义

use async_trait::async_trait;
use qc_errors::AppResult;

/// 本地键值存储
///
/// 每个键保存一段完整的文本（通常是 JSON），写入即覆盖
#[async_trait]
pub trait LocalStorePort: Send + Sync {
    /// 读取
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// 写入（覆盖）
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// 删除，键不存在时不报错
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// 检查是否存在
    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
