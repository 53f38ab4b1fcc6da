//! 合格率值对象

use std::fmt;

use serde::{Deserialize, Serialize};

use super::CheckOutcome;

/// 每行检查项数量
pub const CHECKS_PER_ROW: u32 = 5;

/// 合格率（0-100 的整数百分比）
///
/// 业务规则:
/// - 只有至少一项已填写时才有值，全部未填写时为 None
/// - 值 = OK 项数 / 5 × 100，与检查数量无关
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PercentOk(u8);

impl PercentOk {
    /// 由五项结果计算
    pub fn from_outcomes(outcomes: &[CheckOutcome; 5]) -> Option<Self> {
        if !outcomes.iter().any(CheckOutcome::is_set) {
            return None;
        }
        let ok_count = outcomes.iter().filter(|o| o.is_ok()).count() as u32;
        Some(Self((ok_count * 100 / CHECKS_PER_ROW) as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_full(&self) -> bool {
        self.0 == 100
    }

    /// 提交载荷中的文本，未定义时为空串
    pub fn format_optional(value: Option<PercentOk>) -> String {
        value.map(|p| p.to_string()).unwrap_or_default()
    }
}

impl fmt::Display for PercentOk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
