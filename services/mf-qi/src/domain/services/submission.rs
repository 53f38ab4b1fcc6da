//! 提交载荷组装

use chrono::{DateTime, Utc};
use qc_ports::InspectionSubmission;

use super::validation::ValidatedForm;
use crate::domain::entities::PalletCheckRow;
use crate::domain::reference::snapshot_of;
use crate::domain::value_objects::FormNumber;

/// 由已校验的表单组装提交载荷
pub fn build_submission(
    validated: &ValidatedForm<'_>,
    form_number: &FormNumber,
    submitted_at: DateTime<Utc>,
) -> InspectionSubmission {
    let header = validated.form.header();
    InspectionSubmission {
        form_number: form_number.to_string(),
        check_date: validated.check_date,
        prod_date: validated.production_date,
        exp_date: validated.expiry_date,
        shift: header.shift.clone(),
        product_item: header.product.clone(),
        line: header.line.clone(),
        group: header.group.clone(),
        qc_personnel: header.qc_personnel.clone(),
        shift_supervisor: header.shift_supervisor.clone(),
        supervisor: header.supervisor.clone(),
        section_manager: header.section_manager.clone(),
        item_code: validated.product.item_code.clone(),
        standards: snapshot_of(validated.product),
        pallet_checks: validated
            .form
            .rows()
            .iter()
            .map(PalletCheckRow::to_record)
            .collect(),
        submitted_at,
    }
}
