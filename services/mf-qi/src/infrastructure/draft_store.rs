//! 草稿仓储

use std::sync::Arc;

use qc_errors::AppResult;
use qc_ports::LocalStorePort;
use tracing::{debug, warn};

use crate::domain::entities::Draft;

/// 草稿固定存储键
pub const DRAFT_KEY: &str = "qc_form_draft";

/// 草稿仓储，在本地存储之上做 JSON 编解码
#[derive(Clone)]
pub struct DraftRepository {
    store: Arc<dyn LocalStorePort>,
}

impl DraftRepository {
    pub fn new(store: Arc<dyn LocalStorePort>) -> Self {
        Self { store }
    }

    /// 覆盖保存
    pub async fn save(&self, draft: &Draft) -> AppResult<()> {
        let json = serde_json::to_string(draft)?;
        self.store.set(DRAFT_KEY, &json).await?;
        debug!(rows = draft.rows.len(), "Draft saved");
        Ok(())
    }

    /// 读取草稿
    ///
    /// 无法解析的草稿会被删除并视为不存在
    pub async fn load(&self) -> AppResult<Option<Draft>> {
        let Some(json) = self.store.get(DRAFT_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Draft>(&json) {
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                warn!(error = %e, "Stored draft is corrupt, discarding it");
                self.store.delete(DRAFT_KEY).await?;
                Ok(None)
            }
        }
    }

    pub async fn delete(&self) -> AppResult<()> {
        self.store.delete(DRAFT_KEY).await
    }
}
