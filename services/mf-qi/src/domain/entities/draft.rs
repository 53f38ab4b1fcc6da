//! 草稿快照

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{InspectionForm, InspectionHeader, PalletCheckRow};

/// 草稿
///
/// 保存完整表头、全部行和行计数器。派生状态（合格率）在恢复时重新计算
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// 保存时间
    pub timestamp: DateTime<Utc>,
    pub header: InspectionHeader,
    #[serde(default)]
    pub rows: Vec<PalletCheckRow>,
    #[serde(default)]
    pub last_row_id: u32,
}

impl Draft {
    pub fn capture(form: &InspectionForm, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            header: form.header().clone(),
            rows: form.rows().to_vec(),
            last_row_id: form.last_row_id(),
        }
    }

    pub fn into_form(self) -> InspectionForm {
        InspectionForm::restore(self.header, self.rows, self.last_row_id)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
