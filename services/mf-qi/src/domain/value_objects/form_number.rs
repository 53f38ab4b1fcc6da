//! 表单编号值对象

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use qc_common::utils::month_to_roman;
use qc_config::FormNumberScheme;
use serde::{Deserialize, Serialize};

/// 产线无法推导区域代码时使用
const GENERIC_AREA: &str = "GEN";

/// 表单编号
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormNumber(String);

impl FormNumber {
    /// 按方案生成
    ///
    /// `now` 用于时间戳部分，`local_now` 用于月份和年份
    pub fn generate(
        scheme: FormNumberScheme,
        now: DateTime<Utc>,
        local_now: NaiveDateTime,
        line: &str,
    ) -> Self {
        match scheme {
            FormNumberScheme::Timestamp => Self::timestamp(now),
            FormNumberScheme::Structured => Self::structured(now, local_now, line),
        }
    }

    /// `QC-` + 毫秒时间戳后 8 位
    pub fn timestamp(now: DateTime<Utc>) -> Self {
        let millis = now.timestamp_millis().rem_euclid(100_000_000);
        Self(format!("QC-{:08}", millis))
    }

    /// `{秒级时间戳后 4 位}/QC/{区域}/{罗马月份}/{年份}`
    pub fn structured(now: DateTime<Utc>, local_now: NaiveDateTime, line: &str) -> Self {
        let seq = now.timestamp().rem_euclid(10_000);
        // month() 恒在 1..=12
        let month = month_to_roman(local_now.month()).unwrap_or("I");
        Self(format!(
            "{:04}/QC/{}/{}/{}",
            seq,
            area_code(line),
            month,
            local_now.year()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FormNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 由产线名推导区域代码
///
/// - 含数字: `L` + 数字（`Line 3` -> `L3`）
/// - 否则取前三个字母数字字符的大写
/// - 都没有时为 `GEN`
pub fn area_code(line: &str) -> String {
    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    if !digits.is_empty() {
        return format!("L{}", digits);
    }

    let prefix: String = line
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(3)
        .collect::<String>()
        .to_ascii_uppercase();

    if prefix.is_empty() {
        GENERIC_AREA.to_string()
    } else {
        prefix
    }
}
