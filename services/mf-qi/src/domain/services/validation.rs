//! 提交前校验
//!
//! 按固定顺序检查，返回第一个不满足的约束，任何网络请求之前完成

use chrono::NaiveDate;
use qc_errors::AppError;
use qc_ports::ProductStandard;
use thiserror::Error;

use super::date_rule::{DateRuleError, check_order};
use crate::domain::entities::InspectionForm;
use crate::domain::reference::ReferenceData;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("至少需要一行托盘检查记录")]
    NoRows,

    #[error("必填字段为空: {0}")]
    MissingField(&'static str),

    #[error("产品不在标准矩阵中: {0}")]
    UnknownProduct(String),

    #[error(transparent)]
    InvalidDates(#[from] DateRuleError),
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// 通过校验的表单
#[derive(Debug)]
pub struct ValidatedForm<'a> {
    pub form: &'a InspectionForm,
    pub check_date: NaiveDate,
    pub production_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub product: &'a ProductStandard,
}

/// 校验顺序: 行数、必填字段、产品、日期先后
pub fn validate_for_submission<'a>(
    form: &'a InspectionForm,
    reference: &'a ReferenceData,
) -> Result<ValidatedForm<'a>, SubmissionError> {
    if form.rows().is_empty() {
        return Err(SubmissionError::NoRows);
    }

    let header = form.header();
    let check_date = required_date(header.check_date, "checkDate")?;
    let production_date = required_date(header.production_date, "prodDate")?;
    let expiry_date = required_date(header.expiry_date, "expDate")?;
    required_text(&header.shift, "shift")?;
    required_text(&header.product, "productItem")?;
    required_text(&header.line, "line")?;
    required_text(&header.group, "group")?;
    required_text(&header.qc_personnel, "qcPersonnel")?;

    let product = reference
        .product(&header.product)
        .ok_or_else(|| SubmissionError::UnknownProduct(header.product.clone()))?;

    check_order(production_date, expiry_date)?;

    Ok(ValidatedForm {
        form,
        check_date,
        production_date,
        expiry_date,
        product,
    })
}

fn required_date(value: Option<NaiveDate>, field: &'static str) -> Result<NaiveDate, SubmissionError> {
    value.ok_or(SubmissionError::MissingField(field))
}

fn required_text(value: &str, field: &'static str) -> Result<(), SubmissionError> {
    if value.trim().is_empty() {
        return Err(SubmissionError::MissingField(field));
    }
    Ok(())
}
