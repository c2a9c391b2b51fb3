//! Shensha fixtures through the public detectors.

use bazi_base::{
    Branch, FourPillars, Position, ReferenceYear, ShenshaCode, detect_floating, detect_static,
};
use bazi_base::shensha::{RuleScope, rule_for};

fn pillars(names: [&str; 4]) -> FourPillars {
    FourPillars {
        year: names[0].parse().unwrap(),
        month: names[1].parse().unwrap(),
        day: names[2].parse().unwrap(),
        hour: names[3].parse().unwrap(),
    }
}

#[test]
fn jia_day_with_chou_has_tian_yi() {
    let hits = detect_static(&pillars(["丙寅", "丁丑", "甲子", "乙丑"]));
    let tian_yi = &hits[&ShenshaCode::TianYi];
    assert!(tian_yi.contains(&Position::Month));
    assert!(tian_yi.contains(&Position::Hour));
    assert!(!tian_yi.contains(&Position::Year));
}

#[test]
fn jia_yin_day_is_ba_zhuan_and_month_is_jian_lu() {
    let hits = detect_static(&pillars(["戊辰", "甲寅", "甲寅", "甲子"]));
    assert!(hits[&ShenshaCode::BaZhuan].contains(&Position::Day));
    assert!(hits[&ShenshaCode::JianLu].contains(&Position::Month));
    assert!(hits[&ShenshaCode::ZhuanLu].contains(&Position::Day));
}

#[test]
fn tao_hua_is_mirrored_as_xian_chi() {
    for names in [
        ["乙巳", "壬午", "庚申", "庚辰"],
        ["甲子", "丁卯", "壬申", "癸卯"],
        ["丙寅", "辛卯", "甲午", "乙亥"],
    ] {
        let hits = detect_static(&pillars(names));
        assert_eq!(
            hits.get(&ShenshaCode::TaoHua),
            hits.get(&ShenshaCode::XianChi),
            "{names:?}"
        );
    }
}

#[test]
fn static_and_floating_never_mix() {
    let p = pillars(["乙巳", "壬午", "庚申", "庚辰"]);
    let hits = detect_static(&p);
    for code in hits.keys() {
        let rule = rule_for(*code).unwrap();
        assert_ne!(rule.scope(), RuleScope::FloatingYear, "{code}");
    }
    let floating = detect_floating(&p, ReferenceYear::Year(2025));
    for code in floating.hits.keys() {
        assert_eq!(rule_for(*code).unwrap().scope(), RuleScope::FloatingYear);
    }
}

#[test]
fn reference_years_parse() {
    assert_eq!("2025".parse::<ReferenceYear>(), Ok(ReferenceYear::Year(2025)));
    assert_eq!("巳".parse::<ReferenceYear>(), Ok(ReferenceYear::Branch(Branch::Si)));
    assert_eq!("乙巳".parse::<ReferenceYear>(), Ok(ReferenceYear::Branch(Branch::Si)));
    assert!("明年".parse::<ReferenceYear>().is_err());
    assert_eq!(ReferenceYear::Year(2025).branch(), Branch::Si);
}

#[test]
fn floating_by_year_or_branch_agree() {
    let p = pillars(["乙巳", "壬午", "庚申", "庚辰"]);
    let by_year = detect_floating(&p, ReferenceYear::Year(2025));
    let by_branch = detect_floating(&p, ReferenceYear::Branch(Branch::Si));
    assert_eq!(by_year.hits, by_branch.hits);
    assert!(by_year.hits[&ShenshaCode::TaiSui].contains(&Position::Year));
}
