//! 文件存储实现

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use qc_common::BaseHealthResult;
use qc_errors::{AppError, AppResult};
use qc_ports::LocalStorePort;
use tracing::debug;

const FILE_EXTENSION: &str = "json";
const PROBE_KEY: &str = "health-check-probe";

/// 文件存储，目录下每个键对应 `<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// 创建文件存储，目录不存在时自动创建
    pub async fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::storage(format!("Failed to create store dir {}: {}", dir.display(), e))
        })?;
        debug!(dir = %dir.display(), "Local file store opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.{}", key, FILE_EXTENSION)))
    }

    /// 写入并删除探测文件，确认目录可写
    pub async fn health_check(&self) -> BaseHealthResult {
        let start = Instant::now();
        let result = async {
            self.set(PROBE_KEY, "{}").await?;
            self.delete(PROBE_KEY).await
        }
        .await;

        BaseHealthResult::from_probe(start, result)
    }
}

/// 键只允许字母、数字、`-` 和 `_`，避免路径穿越
fn validate_key(key: &str) -> AppResult<()> {
    if key.is_empty() {
        return Err(AppError::validation("Store key must not be empty"));
    }
    if let Some(c) = key
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
    {
        return Err(AppError::validation(format!(
            "Store key `{}` contains invalid character `{}`",
            key, c
        )));
    }
    Ok(())
}

#[async_trait]
impl LocalStorePort for FileStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{}.tmp", FILE_EXTENSION));

        tokio::fs::write(&tmp, value).await.map_err(|e| {
            AppError::storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            AppError::storage(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "Deleted value");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.path_for(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| AppError::storage(format!("Failed to stat {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("qc-store-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_set_get_overwrite_delete() {
        let dir = temp_dir();
        let store = FileStore::open(&dir).await.unwrap();

        assert_eq!(store.get("qc_form_draft").await.unwrap(), None);
        assert!(!store.exists("qc_form_draft").await.unwrap());

        store.set("qc_form_draft", r#"{"v":1}"#).await.unwrap();
        store.set("qc_form_draft", r#"{"v":2}"#).await.unwrap();
        assert_eq!(
            store.get("qc_form_draft").await.unwrap().as_deref(),
            Some(r#"{"v":2}"#)
        );
        assert!(store.exists("qc_form_draft").await.unwrap());
        assert!(dir.join("qc_form_draft.json").exists());

        store.delete("qc_form_draft").await.unwrap();
        assert_eq!(store.get("qc_form_draft").await.unwrap(), None);

        // 重复删除不报错
        store.delete("qc_form_draft").await.unwrap();

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = temp_dir();
        let store = FileStore::open(&dir).await.unwrap();

        let err = store.set("../escape", "x").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.get("").await.is_err());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = temp_dir();
        let store = FileStore::open(&dir).await.unwrap();

        let health = store.health_check().await;
        assert!(health.healthy);
        assert!(!store.exists(PROBE_KEY).await.unwrap());

        let _ = std::fs::remove_dir_all(dir);
    }
}
