//! 表单编辑命令
//!
//! 所有字段都是可选的补丁：缺省表示不修改。日期和数量字段可显式传 `null` 清空

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::domain::entities::{InspectionHeader, PalletCheckRow, PalletRowError};
use crate::domain::value_objects::{CheckField, CheckOutcome};

/// 修改表头命令
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateHeaderCommand {
    #[serde(deserialize_with = "double_option")]
    pub check_date: Option<Option<NaiveDate>>,
    #[serde(deserialize_with = "double_option")]
    pub production_date: Option<Option<NaiveDate>>,
    #[serde(deserialize_with = "double_option")]
    pub expiry_date: Option<Option<NaiveDate>>,
    pub shift: Option<String>,
    pub product: Option<String>,
    pub line: Option<String>,
    pub group: Option<String>,
    pub qc_personnel: Option<String>,
    pub shift_supervisor: Option<String>,
    pub supervisor: Option<String>,
    pub section_manager: Option<String>,
}

impl UpdateHeaderCommand {
    /// 生产日期、到期日期或产品有变化时需要重新评估日期规则
    pub fn touches_date_rule(&self) -> bool {
        self.production_date.is_some() || self.expiry_date.is_some() || self.product.is_some()
    }

    /// 只有生产日期或产品变化时才自动填入到期日
    pub fn allows_autofill(&self) -> bool {
        self.production_date.is_some() || self.product.is_some()
    }

    pub fn apply(self, header: &mut InspectionHeader) {
        if let Some(v) = self.check_date {
            header.check_date = v;
        }
        if let Some(v) = self.production_date {
            header.production_date = v;
        }
        if let Some(v) = self.expiry_date {
            header.expiry_date = v;
        }

        let texts = [
            (self.shift, &mut header.shift),
            (self.product, &mut header.product),
            (self.line, &mut header.line),
            (self.group, &mut header.group),
            (self.qc_personnel, &mut header.qc_personnel),
            (self.shift_supervisor, &mut header.shift_supervisor),
            (self.supervisor, &mut header.supervisor),
            (self.section_manager, &mut header.section_manager),
        ];
        for (value, slot) in texts {
            if let Some(value) = value {
                *slot = value.trim().to_string();
            }
        }
    }
}

/// 修改托盘行命令
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRowCommand {
    pub time: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub total_inspected: Option<Option<u32>>,
    pub box_print_code: Option<CheckOutcome>,
    pub box_content: Option<CheckOutcome>,
    pub box_color: Option<CheckOutcome>,
    pub sachet_seal: Option<CheckOutcome>,
    pub sachet_print_code: Option<CheckOutcome>,
    pub notes: Option<String>,
}

impl UpdateRowCommand {
    fn outcome_for(&self, field: CheckField) -> Option<CheckOutcome> {
        match field {
            CheckField::BoxPrintCode => self.box_print_code,
            CheckField::BoxContent => self.box_content,
            CheckField::BoxColor => self.box_color,
            CheckField::SachetSeal => self.sachet_seal,
            CheckField::SachetPrintCode => self.sachet_print_code,
        }
    }

    /// 应用到行；时间格式不对时整条命令不生效
    pub fn apply(self, row: &mut PalletCheckRow) -> Result<(), PalletRowError> {
        if let Some(time) = &self.time {
            row.set_time(time)?;
        }
        if let Some(total) = self.total_inspected {
            row.set_total_inspected(total);
        }
        for field in CheckField::ALL {
            if let Some(outcome) = self.outcome_for(field) {
                row.set_outcome(field, outcome);
            }
        }
        if let Some(notes) = self.notes {
            row.set_notes(notes);
        }
        Ok(())
    }
}

/// 区分"字段缺省"和"显式 null"
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
