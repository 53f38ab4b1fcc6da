//! 提交载荷与历史记录

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 提交时的标准值快照
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardsSnapshot {
    pub box_p_code: String,
    pub box_content: String,
    pub box_color: String,
    pub sachet_seal: String,
    pub sachet_p_code: String,
    pub shelf_life_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pieces_per_bag: Option<u32>,
}

/// 单个托盘检查记录
///
/// 五项检查结果为 `OK`、`NG` 或空串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalletCheckRecord {
    pub no_pallet: u32,
    pub time: String,
    pub total_check: Option<u32>,
    pub box_p_code: String,
    pub box_content: String,
    pub box_color: String,
    pub sachet_seal: String,
    pub sachet_p_code: String,
    #[serde(rename = "percentOK")]
    pub percent_ok: String,
    pub notes: String,
}

/// 提交到远端的检查表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSubmission {
    pub form_number: String,
    pub check_date: NaiveDate,
    pub prod_date: NaiveDate,
    pub exp_date: NaiveDate,
    pub shift: String,
    pub product_item: String,
    pub line: String,
    pub group: String,
    pub qc_personnel: String,
    pub shift_supervisor: String,
    pub supervisor: String,
    pub section_manager: String,
    pub item_code: String,
    pub standards: StandardsSnapshot,
    pub pallet_checks: Vec<PalletCheckRecord>,
    pub submitted_at: DateTime<Utc>,
}

/// 提交回执
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// 远端是否明确确认
    pub acknowledged: bool,
    pub message: Option<String>,
    /// 远端回传的表单编号（若有）
    pub form_number: Option<String>,
}

impl SubmissionReceipt {
    /// 发后即忘模式下的回执
    pub fn unacknowledged() -> Self {
        Self {
            acknowledged: false,
            message: None,
            form_number: None,
        }
    }
}

/// 已提交的历史表单（远端返回的字段可能不全）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecentForm {
    pub form_number: String,
    pub check_date: Option<String>,
    pub prod_date: Option<String>,
    pub exp_date: Option<String>,
    pub product_item: Option<String>,
    pub line: Option<String>,
    pub shift: Option<String>,
    pub qc_personnel: Option<String>,
    pub pallet_count: Option<u32>,
    pub submitted_at: Option<String>,
}
