//! 检查表实体

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::entities::PalletCheckRow;
use crate::domain::services::date_rule::{self, DateCheck};
use crate::domain::value_objects::RowId;

/// 表头
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspectionHeader {
    /// 检查日期
    pub check_date: Option<NaiveDate>,
    /// 生产日期
    pub production_date: Option<NaiveDate>,
    /// 到期日期
    pub expiry_date: Option<NaiveDate>,
    /// 班次
    pub shift: String,
    /// 产品名（标准矩阵的键）
    pub product: String,
    /// 产线
    pub line: String,
    /// 班组
    pub group: String,

    // 签核人员
    pub qc_personnel: String,
    pub shift_supervisor: String,
    pub supervisor: String,
    pub section_manager: String,
}

/// 检查表
///
/// 行 ID 由 `last_row_id` 计数器发放，删除行后不回收
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionForm {
    header: InspectionHeader,
    rows: Vec<PalletCheckRow>,
    last_row_id: u32,
}

impl InspectionForm {
    /// 新表单，检查日期和生产日期默认为当天
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            header: InspectionHeader {
                check_date: Some(today),
                production_date: Some(today),
                ..Default::default()
            },
            rows: Vec::new(),
            last_row_id: 0,
        }
    }

    /// 由草稿内容重建
    ///
    /// 计数器取存储值与现存最大行号中的较大者，每行重算派生状态
    pub fn restore(header: InspectionHeader, mut rows: Vec<PalletCheckRow>, last_row_id: u32) -> Self {
        rows.iter_mut().for_each(PalletCheckRow::recompute);
        let max_id = rows.iter().map(|r| r.id().value()).max().unwrap_or(0);
        Self {
            header,
            rows,
            last_row_id: last_row_id.max(max_id),
        }
    }

    // Getters
    pub fn header(&self) -> &InspectionHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut InspectionHeader {
        &mut self.header
    }

    pub fn rows(&self) -> &[PalletCheckRow] {
        &self.rows
    }

    pub fn last_row_id(&self) -> u32 {
        self.last_row_id
    }

    pub fn row(&self, id: RowId) -> Option<&PalletCheckRow> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn row_mut(&mut self, id: RowId) -> Option<&mut PalletCheckRow> {
        self.rows.iter_mut().find(|r| r.id() == id)
    }

    /// 追加空行，返回新行
    pub fn add_row(&mut self, time: impl Into<String>) -> &PalletCheckRow {
        self.last_row_id += 1;
        let index = self.rows.len();
        self.rows
            .push(PalletCheckRow::new(RowId(self.last_row_id), time));
        &self.rows[index]
    }

    /// 删除行，其余行的 ID 不变
    pub fn remove_row(&mut self, id: RowId) -> Option<PalletCheckRow> {
        let index = self.rows.iter().position(|r| r.id() == id)?;
        Some(self.rows.remove(index))
    }

    /// 应用保质期规则
    ///
    /// `Rejected` 时清空到期日；`AutoFilled` 时写入预期到期日
    pub fn apply_date_rule(&mut self, shelf_life_days: Option<u32>, allow_autofill: bool) -> DateCheck {
        let check = date_rule::evaluate(
            self.header.production_date,
            self.header.expiry_date,
            shelf_life_days,
            allow_autofill,
        );

        match &check {
            DateCheck::Rejected { .. } => self.header.expiry_date = None,
            DateCheck::AutoFilled { expiry } => self.header.expiry_date = Some(*expiry),
            _ => {}
        }

        check
    }

    /// 接受更正：到期日 = 生产日期 + 保质期
    ///
    /// 生产日期为空或结果不晚于生产日期时不修改
    pub fn correct_expiry(&mut self, shelf_life_days: u32) -> Option<NaiveDate> {
        let expected =
            date_rule::valid_expected_expiry(self.header.production_date?, shelf_life_days)?;
        self.header.expiry_date = Some(expected);
        Some(expected)
    }
}
