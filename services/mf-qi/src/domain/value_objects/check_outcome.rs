//! 检查结果与检查项

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 单项检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CheckOutcome {
    /// 未填写
    #[default]
    #[serde(rename = "")]
    Unset,
    /// 合格
    #[serde(rename = "OK")]
    Ok,
    /// 不合格
    #[serde(rename = "NG")]
    Ng,
}

impl CheckOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckOutcome::Unset => "",
            CheckOutcome::Ok => "OK",
            CheckOutcome::Ng => "NG",
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, CheckOutcome::Unset)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CheckOutcome::Ok)
    }

    pub fn is_ng(&self) -> bool {
        matches!(self, CheckOutcome::Ng)
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("无效的检查结果: {0}")]
pub struct InvalidCheckOutcome(String);

impl FromStr for CheckOutcome {
    type Err = InvalidCheckOutcome;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "-" => Ok(CheckOutcome::Unset),
            "OK" => Ok(CheckOutcome::Ok),
            "NG" => Ok(CheckOutcome::Ng),
            _ => Err(InvalidCheckOutcome(s.to_string())),
        }
    }
}

/// 每个托盘的五个检查项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckField {
    /// 外箱打码
    BoxPrintCode,
    /// 外箱内容
    BoxContent,
    /// 外箱颜色
    BoxColor,
    /// 小袋封口
    SachetSeal,
    /// 小袋打码
    SachetPrintCode,
}

impl CheckField {
    pub const ALL: [CheckField; 5] = [
        CheckField::BoxPrintCode,
        CheckField::BoxContent,
        CheckField::BoxColor,
        CheckField::SachetSeal,
        CheckField::SachetPrintCode,
    ];

    pub fn index(&self) -> usize {
        match self {
            CheckField::BoxPrintCode => 0,
            CheckField::BoxContent => 1,
            CheckField::BoxColor => 2,
            CheckField::SachetSeal => 3,
            CheckField::SachetPrintCode => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_outcome() {
        assert_eq!("ok".parse::<CheckOutcome>().unwrap(), CheckOutcome::Ok);
        assert_eq!(" NG ".parse::<CheckOutcome>().unwrap(), CheckOutcome::Ng);
        assert_eq!("-".parse::<CheckOutcome>().unwrap(), CheckOutcome::Unset);
        assert!("maybe".parse::<CheckOutcome>().is_err());
    }

    #[test]
    fn test_outcome_wire_format() {
        assert_eq!(serde_json::to_string(&CheckOutcome::Unset).unwrap(), r#""""#);
        assert_eq!(serde_json::to_string(&CheckOutcome::Ng).unwrap(), r#""NG""#);
        let parsed: CheckOutcome = serde_json::from_str(r#""OK""#).unwrap();
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_field_indexes_are_distinct() {
        let mut seen = [false; 5];
        for field in CheckField::ALL {
            assert!(!seen[field.index()]);
            seen[field.index()] = true;
        }
    }
}
