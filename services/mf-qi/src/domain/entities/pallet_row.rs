//! 托盘检查行实体

use chrono::NaiveTime;
use qc_ports::PalletCheckRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::{CheckField, CheckOutcome, PercentOk, RowId};

/// 托盘行错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PalletRowError {
    #[error("时间格式应为 HH:MM: {0}")]
    InvalidTime(String),
}

/// 托盘检查行
///
/// 合格率是派生值，任何检查项或检查数量变化后都会重算
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalletCheckRow {
    /// 行 ID（托盘号）
    id: RowId,
    /// 检查时间 HH:MM
    time: String,
    /// 检查数量（仅记录，不参与合格率计算）
    total_inspected: Option<u32>,
    /// 五项检查结果，顺序见 `CheckField::ALL`
    outcomes: [CheckOutcome; 5],
    /// 合格率
    #[serde(default)]
    percent_ok: Option<PercentOk>,
    /// 备注
    #[serde(default)]
    notes: String,
}

impl PalletCheckRow {
    /// 创建空行
    pub fn new(id: RowId, time: impl Into<String>) -> Self {
        Self {
            id,
            time: time.into(),
            total_inspected: None,
            outcomes: [CheckOutcome::Unset; 5],
            percent_ok: None,
            notes: String::new(),
        }
    }

    // Getters
    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn total_inspected(&self) -> Option<u32> {
        self.total_inspected
    }

    pub fn outcome(&self, field: CheckField) -> CheckOutcome {
        self.outcomes[field.index()]
    }

    pub fn outcomes(&self) -> &[CheckOutcome; 5] {
        &self.outcomes
    }

    pub fn percent_ok(&self) -> Option<PercentOk> {
        self.percent_ok
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// 是否有不合格项（用于高亮）
    pub fn has_ng(&self) -> bool {
        self.outcomes.iter().any(CheckOutcome::is_ng)
    }

    /// 没有任何录入内容
    pub fn is_blank(&self) -> bool {
        self.total_inspected.is_none()
            && !self.outcomes.iter().any(CheckOutcome::is_set)
            && self.notes.trim().is_empty()
    }

    // Mutable setters

    /// 设置检查时间，必须是 HH:MM
    pub fn set_time(&mut self, time: &str) -> Result<(), PalletRowError> {
        let time = time.trim();
        NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|_| PalletRowError::InvalidTime(time.to_string()))?;
        self.time = time.to_string();
        Ok(())
    }

    pub fn set_total_inspected(&mut self, total: Option<u32>) {
        self.total_inspected = total;
        self.recompute();
    }

    pub fn set_outcome(&mut self, field: CheckField, outcome: CheckOutcome) {
        self.outcomes[field.index()] = outcome;
        self.recompute();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// 五项全部置为 OK，只重算一次
    pub fn mark_all_ok(&mut self) {
        self.outcomes = [CheckOutcome::Ok; 5];
        self.recompute();
    }

    /// 重算合格率
    pub fn recompute(&mut self) {
        self.percent_ok = PercentOk::from_outcomes(&self.outcomes);
    }

    /// 转换为提交记录
    pub fn to_record(&self) -> PalletCheckRecord {
        let text = |field: CheckField| self.outcome(field).as_str().to_string();
        PalletCheckRecord {
            no_pallet: self.id.value(),
            time: self.time.clone(),
            total_check: self.total_inspected,
            box_p_code: text(CheckField::BoxPrintCode),
            box_content: text(CheckField::BoxContent),
            box_color: text(CheckField::BoxColor),
            sachet_seal: text(CheckField::SachetSeal),
            sachet_p_code: text(CheckField::SachetPrintCode),
            percent_ok: PercentOk::format_optional(self.percent_ok),
            notes: self.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> PalletCheckRow {
        PalletCheckRow::new(RowId(1), "08:00")
    }

    #[test]
    fn test_new_row_is_blank() {
        let row = row();
        assert!(row.is_blank());
        assert_eq!(row.percent_ok(), None);
        assert!(!row.has_ng());
    }

    #[test]
    fn test_eighty_percent_scenario() {
        let mut row = row();
        row.set_total_inspected(Some(50));
        for field in CheckField::ALL {
            row.set_outcome(field, CheckOutcome::Ok);
        }
        row.set_outcome(CheckField::BoxColor, CheckOutcome::Ng);

        assert_eq!(row.percent_ok().map(|p| p.value()), Some(80));
        assert!(row.has_ng());
        assert_eq!(row.to_record().percent_ok, "80%");
    }

    #[test]
    fn test_quantity_does_not_change_percent() {
        let mut row = row();
        row.set_outcome(CheckField::SachetSeal, CheckOutcome::Ok);
        let before = row.percent_ok();

        row.set_total_inspected(Some(1000));
        assert_eq!(row.percent_ok(), before);
        row.set_total_inspected(None);
        assert_eq!(row.percent_ok(), before);
    }

    #[test]
    fn test_mark_all_ok_clears_ng() {
        let mut row = row();
        row.set_outcome(CheckField::BoxContent, CheckOutcome::Ng);
        assert!(row.has_ng());

        row.mark_all_ok();
        assert!(!row.has_ng());
        assert!(row.percent_ok().unwrap().is_full());
    }

    #[test]
    fn test_set_time_validates_format() {
        let mut row = row();
        assert!(row.set_time("13:45").is_ok());
        assert_eq!(row.time(), "13:45");

        assert_eq!(
            row.set_time("25:00"),
            Err(PalletRowError::InvalidTime("25:00".to_string()))
        );
        assert_eq!(row.time(), "13:45");
    }

    #[test]
    fn test_record_for_unfilled_row() {
        let record = row().to_record();
        assert_eq!(record.no_pallet, 1);
        assert_eq!(record.box_p_code, "");
        assert_eq!(record.percent_ok, "");
        assert_eq!(record.total_check, None);
    }
}
