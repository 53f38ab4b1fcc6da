//! 内置参考数据
//!
//! 远端不可用时使用，保证表单仍可填写

use qc_ports::{
    BoxStandard, PersonnelRoster, ProductStandard, ProductionLine, SachetStandard, StandardMatrix,
};

const FALLBACK_PERSON: &str = "Admin";

pub fn fallback_matrix() -> StandardMatrix {
    let mut matrix = StandardMatrix::new();
    matrix.insert(
        "Candy Apple 50g".to_string(),
        product("CA01", 365, 24, ("CA-BOX", "24", "Red"), "CA-SCH"),
    );
    matrix.insert(
        "Mint Fresh 100g".to_string(),
        product("MF01", 720, 50, ("MF-BOX", "50", "Green"), "MF-SCH"),
    );
    matrix
}

pub fn fallback_personnel() -> PersonnelRoster {
    let admin = vec![FALLBACK_PERSON.to_string()];
    PersonnelRoster {
        qc_personnel: admin.clone(),
        shift_supervisor: admin.clone(),
        supervisor: admin.clone(),
        section_manager: admin,
    }
}

pub fn fallback_lines() -> Vec<ProductionLine> {
    vec![ProductionLine::named("Line 1"), ProductionLine::named("Line 2")]
}

fn product(
    item_code: &str,
    shelf_life_days: u32,
    pieces_per_bag: u32,
    (box_code, box_content, box_color): (&str, &str, &str),
    sachet_code: &str,
) -> ProductStandard {
    ProductStandard {
        item_code: item_code.to_string(),
        shelf_life_days,
        pieces_per_bag: Some(pieces_per_bag),
        lines: Default::default(),
        box_standard: BoxStandard {
            print_code: box_code.to_string(),
            content: box_content.to_string(),
            color: box_color.to_string(),
        },
        sachet_standard: SachetStandard {
            seal_percent: "0%".to_string(),
            print_code: sachet_code.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_matrix() {
        let matrix = fallback_matrix();
        assert_eq!(matrix.len(), 2);

        let candy = &matrix["Candy Apple 50g"];
        assert_eq!(candy.item_code, "CA01");
        assert_eq!(candy.shelf_life_days, 365);
        assert_eq!(candy.box_standard.color, "Red");
        assert_eq!(candy.sachet_standard.print_code, "CA-SCH");

        let mint = &matrix["Mint Fresh 100g"];
        assert_eq!(mint.shelf_life_days, 720);
        assert_eq!(mint.pieces_per_bag, Some(50));
    }

    #[test]
    fn test_fallback_personnel_and_lines() {
        let roster = fallback_personnel();
        assert_eq!(roster.section_manager, vec!["Admin".to_string()]);
        let names: Vec<_> = fallback_lines().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Line 1", "Line 2"]);
    }
}
