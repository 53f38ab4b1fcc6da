//! 参考数据快照

use std::fmt;

use qc_ports::{PersonnelRoster, ProductStandard, ProductionLine, StandardMatrix, StandardsSnapshot};
use serde::{Deserialize, Serialize};

/// 参考数据表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceTable {
    Products,
    Personnel,
    Lines,
}

impl ReferenceTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceTable::Products => "products",
            ReferenceTable::Personnel => "personnel",
            ReferenceTable::Lines => "lines",
        }
    }
}

impl fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 数据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// 尚未加载
    #[default]
    Unloaded,
    Remote,
    Fallback,
}

/// 各表的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReferenceSources {
    pub products: DataSource,
    pub personnel: DataSource,
    pub lines: DataSource,
}

impl ReferenceSources {
    pub fn get(&self, table: ReferenceTable) -> DataSource {
        match table {
            ReferenceTable::Products => self.products,
            ReferenceTable::Personnel => self.personnel,
            ReferenceTable::Lines => self.lines,
        }
    }

    pub fn set(&mut self, table: ReferenceTable, source: DataSource) {
        match table {
            ReferenceTable::Products => self.products = source,
            ReferenceTable::Personnel => self.personnel = source,
            ReferenceTable::Lines => self.lines = source,
        }
    }

    /// 是否有任一表使用了内置数据
    pub fn any_fallback(&self) -> bool {
        [self.products, self.personnel, self.lines].contains(&DataSource::Fallback)
    }
}

/// 参考数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    pub matrix: StandardMatrix,
    pub personnel: PersonnelRoster,
    pub lines: Vec<ProductionLine>,
    pub sources: ReferenceSources,
}

impl ReferenceData {
    pub fn product(&self, name: &str) -> Option<&ProductStandard> {
        self.matrix.get(name)
    }

    /// 产品名列表（矩阵键顺序）
    pub fn product_names(&self) -> Vec<String> {
        self.matrix.keys().cloned().collect()
    }

    pub fn shelf_life_of(&self, name: &str) -> Option<u32> {
        self.product(name).map(|p| p.shelf_life_days)
    }

    /// 所选产品的标准值快照，产品不存在时为空
    pub fn snapshot_for(&self, name: &str) -> StandardsSnapshot {
        self.product(name).map(snapshot_of).unwrap_or_default()
    }
}

pub fn snapshot_of(product: &ProductStandard) -> StandardsSnapshot {
    StandardsSnapshot {
        box_p_code: product.box_standard.print_code.clone(),
        box_content: product.box_standard.content.clone(),
        box_color: product.box_standard.color.clone(),
        sachet_seal: product.sachet_standard.seal_percent.clone(),
        sachet_p_code: product.sachet_standard.print_code.clone(),
        shelf_life_days: product.shelf_life_days,
        pieces_per_bag: product.pieces_per_bag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_ports::{BoxStandard, SachetStandard};

    fn reference() -> ReferenceData {
        let mut matrix = StandardMatrix::new();
        matrix.insert(
            "Candy Apple 50g".to_string(),
            ProductStandard {
                item_code: "CA01".into(),
                shelf_life_days: 365,
                pieces_per_bag: Some(24),
                lines: Default::default(),
                box_standard: BoxStandard {
                    print_code: "CA-BOX".into(),
                    content: "24".into(),
                    color: "Red".into(),
                },
                sachet_standard: SachetStandard {
                    seal_percent: "0%".into(),
                    print_code: "CA-SCH".into(),
                },
            },
        );
        ReferenceData {
            matrix,
            ..Default::default()
        }
    }

    #[test]
    fn test_snapshot_for_known_product() {
        let snapshot = reference().snapshot_for("Candy Apple 50g");
        assert_eq!(snapshot.box_p_code, "CA-BOX");
        assert_eq!(snapshot.box_color, "Red");
        assert_eq!(snapshot.sachet_seal, "0%");
        assert_eq!(snapshot.shelf_life_days, 365);
        assert_eq!(snapshot.pieces_per_bag, Some(24));
    }

    #[test]
    fn test_snapshot_for_unknown_product_is_empty() {
        assert_eq!(reference().snapshot_for("Nope"), StandardsSnapshot::default());
        assert_eq!(reference().shelf_life_of("Nope"), None);
    }

    #[test]
    fn test_sources() {
        let mut sources = ReferenceSources::default();
        assert!(!sources.any_fallback());
        sources.set(ReferenceTable::Lines, DataSource::Fallback);
        assert_eq!(sources.get(ReferenceTable::Lines), DataSource::Fallback);
        assert!(sources.any_fallback());
    }
}
