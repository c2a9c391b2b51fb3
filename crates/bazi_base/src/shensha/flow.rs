//! Floating (流年) markers judged against a reference year.

use serde::Serialize;

use crate::ganzhi::Branch;
use crate::pillars::FourPillars;

use super::types::{ReferenceYear, RuleScope, ShenshaHits};

/// Floating markers for one reference year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatingShensha {
    pub reference: ReferenceYear,
    pub branch: Branch,
    pub hits: ShenshaHits,
}

/// Floating markers of `pillars` in `reference`.
pub fn detect_floating(pillars: &FourPillars, reference: ReferenceYear) -> FloatingShensha {
    let branch = reference.branch();
    let hits = super::collect_hits(pillars, Some(branch), |s| s == RuleScope::FloatingYear);
    tracing::trace!(branch = branch.name(), markers = hits.len(), "floating shensha");
    FloatingShensha {
        reference,
        branch,
        hits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shensha::types::ShenshaCode;
    use crate::pillars::Position;

    fn pillars(names: [&str; 4]) -> FourPillars {
        FourPillars {
            year: names[0].parse().unwrap(),
            month: names[1].parse().unwrap(),
            day: names[2].parse().unwrap(),
            hour: names[3].parse().unwrap(),
        }
    }

    #[test]
    fn tai_sui_and_bing_fu() {
        let p = pillars(["乙巳", "壬午", "庚申", "庚辰"]);
        let f = detect_floating(&p, ReferenceYear::Year(2025));
        assert_eq!(f.branch, Branch::Si);
        assert!(f.hits[&ShenshaCode::TaiSui].contains(&Position::Year));
        assert!(f.hits[&ShenshaCode::SuiJia].contains(&Position::Year));
        // 辰 is one step behind 巳
        assert!(f.hits[&ShenshaCode::BingFu].contains(&Position::Hour));
    }

    #[test]
    fn flow_wang_shen_lands_on_anchor() {
        // year 巳 (巳酉丑: 亡神 申), day 申 (申子辰: 亡神 亥)
        let p = pillars(["乙巳", "壬午", "庚申", "庚辰"]);
        let f = detect_floating(&p, ReferenceYear::Branch(Branch::Shen));
        let hits = &f.hits[&ShenshaCode::WangShenFlow];
        assert_eq!(hits.iter().copied().collect::<Vec<_>>(), vec![Position::Year]);
        let f = detect_floating(&p, ReferenceYear::Branch(Branch::Hai));
        assert!(f.hits[&ShenshaCode::WangShenFlow].contains(&Position::Day));
    }

    #[test]
    fn only_floating_codes_reported() {
        let p = pillars(["甲子", "丙寅", "甲寅", "甲子"]);
        let f = detect_floating(&p, ReferenceYear::Year(2020));
        assert!(
            f.hits
                .keys()
                .all(|c| c.group() == crate::shensha::ShenshaGroup::FlowYear)
        );
    }
}
