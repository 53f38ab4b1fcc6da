//! 参考数据结构（标准矩阵、人员名单、产线）

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

/// 外箱标准值
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoxStandard {
    /// 打码
    #[serde(rename = "pCode", default)]
    pub print_code: String,
    /// 装箱内容
    #[serde(default, deserialize_with = "string_or_number")]
    pub content: String,
    /// 颜色
    #[serde(default)]
    pub color: String,
}

/// 小袋标准值
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SachetStandard {
    /// 封口不良率上限，例如 `0%`
    #[serde(rename = "seal", default, deserialize_with = "string_or_number")]
    pub seal_percent: String,
    /// 打码
    #[serde(rename = "pCode", default)]
    pub print_code: String,
}

/// 产品标准
///
/// 加载后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStandard {
    #[serde(default)]
    pub item_code: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub shelf_life_days: u32,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub pieces_per_bag: Option<u32>,
    /// 允许的产线，空集合表示不限
    #[serde(default, deserialize_with = "lines_list")]
    pub lines: BTreeSet<String>,
    #[serde(rename = "box", default)]
    pub box_standard: BoxStandard,
    #[serde(rename = "sachet", default)]
    pub sachet_standard: SachetStandard,
}

impl ProductStandard {
    /// 产线是否被允许
    pub fn allows_line(&self, line: &str) -> bool {
        let line = line.trim();
        self.lines.is_empty() || self.lines.iter().any(|l| l.eq_ignore_ascii_case(line))
    }
}

/// 标准矩阵：产品名 -> 产品标准
pub type StandardMatrix = BTreeMap<String, ProductStandard>;

/// 人员名单
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonnelRoster {
    #[serde(default)]
    pub qc_personnel: Vec<String>,
    #[serde(default)]
    pub shift_supervisor: Vec<String>,
    #[serde(default)]
    pub supervisor: Vec<String>,
    #[serde(default)]
    pub section_manager: Vec<String>,
}

/// 产线
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionLine {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_u32")]
    pub capacity: Option<u32>,
}

impl ProductionLine {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            capacity: None,
        }
    }
}

// 表格脚本导出的单元格可能是字符串也可能是数字

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Num(f64),
    Str(String),
}

fn scalar_to_u32(value: Scalar) -> Result<u32, String> {
    match value {
        Scalar::Num(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(n as u32),
        Scalar::Num(n) => Err(format!("expected a non-negative integer, got {}", n)),
        Scalar::Str(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid integer `{}`: {}", s, e)),
    }
}

fn lenient_u32<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
    scalar_to_u32(Scalar::deserialize(de)?).map_err(serde::de::Error::custom)
}

fn lenient_opt_u32<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u32>, D::Error> {
    match Option::<Scalar>::deserialize(de)? {
        None => Ok(None),
        Some(Scalar::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => scalar_to_u32(v).map(Some).map_err(serde::de::Error::custom),
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match Option::<Scalar>::deserialize(de)? {
        None => String::new(),
        Some(Scalar::Str(s)) => s,
        Some(Scalar::Num(n)) if n.fract() == 0.0 => format!("{}", n as i64),
        Some(Scalar::Num(n)) => n.to_string(),
    })
}

/// 产线列表可以是数组，也可以是逗号分隔的字符串
fn lines_list<'de, D: Deserializer<'de>>(de: D) -> Result<BTreeSet<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lines {
        List(Vec<String>),
        Joined(String),
    }

    let raw = match Option::<Lines>::deserialize(de)? {
        None => return Ok(BTreeSet::new()),
        Some(Lines::List(list)) => list,
        Some(Lines::Joined(s)) => s.split(',').map(str::to_string).collect(),
    };

    Ok(raw
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_product_standard() {
        let json = r#"{
            "itemCode": "CA01",
            "shelfLifeDays": "365",
            "piecesPerBag": 24,
            "lines": "Line 1, Line 2",
            "box": {"pCode": "CA-BOX", "content": 24, "color": "Red"},
            "sachet": {"seal": "0%", "pCode": "CA-SCH"}
        }"#;
        let std: ProductStandard = serde_json::from_str(json).unwrap();

        assert_eq!(std.item_code, "CA01");
        assert_eq!(std.shelf_life_days, 365);
        assert_eq!(std.pieces_per_bag, Some(24));
        assert_eq!(std.box_standard.content, "24");
        assert_eq!(std.sachet_standard.seal_percent, "0%");
        assert!(std.allows_line("line 2"));
        assert!(!std.allows_line("Line 9"));
    }

    #[test]
    fn test_missing_lines_allows_any() {
        let json = r#"{"itemCode": "MF01", "shelfLifeDays": 720}"#;
        let std: ProductStandard = serde_json::from_str(json).unwrap();
        assert!(std.lines.is_empty());
        assert!(std.allows_line("anything"));
        assert_eq!(std.pieces_per_bag, None);
    }

    #[test]
    fn test_negative_shelf_life_rejected() {
        let json = r#"{"itemCode": "X", "shelfLifeDays": -3}"#;
        assert!(serde_json::from_str::<ProductStandard>(json).is_err());
    }

    #[test]
    fn test_line_optional_fields() {
        let line: ProductionLine = serde_json::from_str(r#"{"name": "Line 3", "capacity": "1200"}"#).unwrap();
        assert_eq!(line.capacity, Some(1200));
        assert_eq!(line.description, None);
    }
}
