//! 保质期规则
//!
//! 到期日期 = 生产日期 + 保质期天数。用户输入的到期日与此不符时给出提示，
//! 由用户决定是否接受更正；到期日不晚于生产日期时直接拒绝

use chrono::{Days, NaiveDate};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRuleError {
    #[error("到期日期 {expiry} 必须晚于生产日期 {production}")]
    ExpiryNotAfterProduction {
        production: NaiveDate,
        expiry: NaiveDate,
    },
}

/// 日期检查结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DateCheck {
    /// 缺少产品或生产日期，未做检查
    Incomplete,
    /// 到期日为空，已按保质期填入
    #[serde(rename_all = "camelCase")]
    AutoFilled { expiry: NaiveDate },
    /// 与保质期一致
    #[serde(rename_all = "camelCase")]
    Confirmed { expiry: NaiveDate },
    /// 与保质期不一致，可接受更正
    #[serde(rename_all = "camelCase")]
    Mismatch {
        expected: NaiveDate,
        actual_days: i64,
        shelf_life_days: u32,
    },
    /// 到期日不晚于生产日期，到期日已清空
    #[serde(rename_all = "camelCase")]
    Rejected {
        production: NaiveDate,
        expiry: NaiveDate,
    },
}

impl DateCheck {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, DateCheck::Mismatch { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, DateCheck::Rejected { .. })
    }
}

/// 预期到期日，超出日期范围时为 None
pub fn expected_expiry(production: NaiveDate, shelf_life_days: u32) -> Option<NaiveDate> {
    production.checked_add_days(Days::new(u64::from(shelf_life_days)))
}

/// 到期日必须晚于生产日期
pub fn check_order(production: NaiveDate, expiry: NaiveDate) -> Result<(), DateRuleError> {
    if expiry <= production {
        return Err(DateRuleError::ExpiryNotAfterProduction { production, expiry });
    }
    Ok(())
}

/// 满足先后顺序的预期到期日
pub fn valid_expected_expiry(production: NaiveDate, shelf_life_days: u32) -> Option<NaiveDate> {
    expected_expiry(production, shelf_life_days)
        .filter(|expiry| check_order(production, *expiry).is_ok())
}

/// 评估日期
///
/// `allow_autofill` 为 true 时，到期日为空会被填为预期值。
/// 保质期为 0 天时预期值不晚于生产日期，不自动填写也不提示更正
pub fn evaluate(
    production: Option<NaiveDate>,
    expiry: Option<NaiveDate>,
    shelf_life_days: Option<u32>,
    allow_autofill: bool,
) -> DateCheck {
    let Some(production) = production else {
        return DateCheck::Incomplete;
    };

    if let Some(expiry) = expiry {
        if check_order(production, expiry).is_err() {
            return DateCheck::Rejected { production, expiry };
        }
    }

    let Some(shelf_life_days) = shelf_life_days else {
        return DateCheck::Incomplete;
    };
    let Some(expected) = valid_expected_expiry(production, shelf_life_days) else {
        return DateCheck::Incomplete;
    };

    match expiry {
        None if allow_autofill => DateCheck::AutoFilled { expiry: expected },
        None => DateCheck::Incomplete,
        Some(expiry) if expiry == expected => DateCheck::Confirmed { expiry },
        Some(expiry) => DateCheck::Mismatch {
            expected,
            actual_days: (expiry - production).num_days(),
            shelf_life_days,
        },
    }
}
