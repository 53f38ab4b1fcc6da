//! 查询结果视图

use chrono::{DateTime, NaiveDate, Utc};
use qc_ports::StandardsSnapshot;
use serde::Serialize;

use crate::domain::entities::{Draft, InspectionForm, InspectionHeader, PalletCheckRow};
use crate::domain::reference::ReferenceData;
use crate::domain::services::DateCheck;
use crate::domain::value_objects::{CheckField, PercentOk, RowId};

/// 会话阶段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum SessionPhase {
    /// 参考数据和草稿检查尚未完成
    Starting,
    /// 发现草稿，等待恢复或丢弃
    PendingDraft(DraftInfo),
    Editing,
}

/// 待处理草稿的摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftInfo {
    pub timestamp: DateTime<Utc>,
    pub row_count: usize,
}

impl From<&Draft> for DraftInfo {
    fn from(draft: &Draft) -> Self {
        Self {
            timestamp: draft.timestamp,
            row_count: draft.row_count(),
        }
    }
}

/// 托盘行视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: RowId,
    pub time: String,
    pub total_inspected: Option<u32>,
    pub box_print_code: String,
    pub box_content: String,
    pub box_color: String,
    pub sachet_seal: String,
    pub sachet_print_code: String,
    /// `80%`，未定义时为空串
    pub percent_ok: String,
    pub notes: String,
    pub has_ng: bool,
}

impl From<&PalletCheckRow> for RowView {
    fn from(row: &PalletCheckRow) -> Self {
        let text = |field: CheckField| row.outcome(field).as_str().to_string();
        Self {
            id: row.id(),
            time: row.time().to_string(),
            total_inspected: row.total_inspected(),
            box_print_code: text(CheckField::BoxPrintCode),
            box_content: text(CheckField::BoxContent),
            box_color: text(CheckField::BoxColor),
            sachet_seal: text(CheckField::SachetSeal),
            sachet_print_code: text(CheckField::SachetPrintCode),
            percent_ok: PercentOk::format_optional(row.percent_ok()),
            notes: row.notes().to_string(),
            has_ng: row.has_ng(),
        }
    }
}

/// 表单视图
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    #[serde(flatten)]
    pub phase: SessionPhase,
    pub header: InspectionHeader,
    pub rows: Vec<RowView>,
    pub last_row_id: u32,
    /// 所选产品的标准值，未选或产品不存在时为 None
    pub standards: Option<StandardsSnapshot>,
    pub line_warning: Option<String>,
}

impl FormView {
    pub fn build(phase: &SessionPhase, form: &InspectionForm, reference: &ReferenceData) -> Self {
        let header = form.header();
        Self {
            phase: phase.clone(),
            header: header.clone(),
            rows: form.rows().iter().map(RowView::from).collect(),
            last_row_id: form.last_row_id(),
            standards: reference
                .product(&header.product)
                .map(|_| reference.snapshot_for(&header.product)),
            line_warning: line_warning(header, reference),
        }
    }
}

/// 所选产线不在产品允许范围内时的提示（不阻止提交）
pub fn line_warning(header: &InspectionHeader, reference: &ReferenceData) -> Option<String> {
    if header.line.is_empty() {
        return None;
    }
    let product = reference.product(&header.product)?;
    if product.allows_line(&header.line) {
        return None;
    }
    Some(format!(
        "产线 {} 不在产品 {} 的允许产线中",
        header.line, header.product
    ))
}

/// 表头修改结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderUpdateOutcome {
    pub header: InspectionHeader,
    /// 本次修改触发的日期检查
    pub date_check: Option<DateCheck>,
    pub line_warning: Option<String>,
    pub standards: Option<StandardsSnapshot>,
}

/// 接受到期日更正的结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryCorrection {
    pub expiry_date: NaiveDate,
}

/// 提交结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub form_number: String,
    /// 远端是否明确确认（发后即忘模式下为 false）
    pub acknowledged: bool,
    pub message: Option<String>,
}
