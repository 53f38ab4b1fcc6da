//! 通用工具函数

use chrono::{NaiveDateTime, NaiveTime, Timelike};

/// 格式化为 HH:MM
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// 取本地时间的 HH:MM
pub fn hhmm_of(at: NaiveDateTime) -> String {
    format_hhmm(at.time())
}

/// 月份转罗马数字（1-12），越界返回 None
pub fn month_to_roman(month: u32) -> Option<&'static str> {
    const ROMAN: [&str; 12] = [
        "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
    ];
    month
        .checked_sub(1)
        .and_then(|idx| ROMAN.get(idx as usize))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hhmm_pads() {
        let t = NaiveTime::from_hms_opt(7, 3, 59).unwrap();
        assert_eq!(format_hhmm(t), "07:03");
    }

    #[test]
    fn test_month_to_roman() {
        assert_eq!(month_to_roman(1), Some("I"));
        assert_eq!(month_to_roman(4), Some("IV"));
        assert_eq!(month_to_roman(9), Some("IX"));
        assert_eq!(month_to_roman(12), Some("XII"));
        assert_eq!(month_to_roman(0), None);
        assert_eq!(month_to_roman(13), None);
    }
}
