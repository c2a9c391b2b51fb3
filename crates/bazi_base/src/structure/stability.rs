//! Career and wealth stability (官财格局).
//!
//! Chaos per axis mixes structure impurity with the number of 破格 factors
//! on that axis; labels, 0–100 strength levels and wealth rooting are read
//! off the configured threshold tables.

use std::collections::BTreeMap;

use bazi_config::StabilityConfig;
use serde::Serialize;

use crate::structure::StructurePattern;
use crate::structure::poge::{PogeCategory, PogeFactor};
use crate::ten_god::{TenGod, TenGodProfile};

/// Purity assumed when the structure has no confidence.
const DEFAULT_PURITY: f64 = 50.0;

/// Officer pair counts as mixed below this relative difference.
const OFFICER_MIXED_DIFF: f64 = 0.25;
/// A lone officer member below this weight is not prominent.
const OFFICER_PROMINENT: f64 = 0.3;
/// 正财/偏财 are considered equal within this difference.
const WEALTH_TYPE_DIFF: f64 = 0.1;
/// 比劫 above this weight robs an empty wealth star.
const WEALTH_ROB_MIN_BI: f64 = 0.3;

/// Wealth gods counted for rooting.
const ROOTING_GODS: [TenGod; 2] = [TenGod::ZhengCai, TenGod::PianCai];

/// Chaos score and label of one axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStability {
    pub chaos: f64,
    pub factor_count: usize,
    pub label: &'static str,
}

/// A 0–100 score with its level label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredLevel {
    pub score: u8,
    pub level: &'static str,
}

/// Wealth rooting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rooting {
    pub score: f64,
    pub label: &'static str,
}

/// How the chart earns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeMode {
    pub main_mode: &'static str,
    pub tags: Vec<&'static str>,
}

/// Full stability classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilityClassification {
    /// 0–100 structure purity.
    pub purity: f64,
    pub career: CategoryStability,
    pub wealth: CategoryStability,
    pub officer_strength: ScoredLevel,
    pub wealth_strength: ScoredLevel,
    pub rooting: Rooting,
    pub officer_type: &'static str,
    pub wealth_type: &'static str,
    pub income_mode: IncomeMode,
    /// Officer- and wealth-related factor names.
    pub risk_tags: Vec<&'static str>,
    /// Factor names per category.
    pub factors: BTreeMap<PogeCategory, Vec<&'static str>>,
}

/// Scale a weight onto 0–100: values ≤ 1 are fractions, larger ones are capped.
pub fn normalize_to_100(value: f64) -> u8 {
    if !value.is_finite() || value <= 0.0 {
        0
    } else if value <= 1.0 {
        (value * 100.0).round() as u8
    } else {
        value.min(100.0).round() as u8
    }
}

fn strength_level(score: u8, cfg: &StabilityConfig) -> &'static str {
    let s = f64::from(score);
    if s >= cfg.level_very_strong {
        "很強"
    } else if s >= cfg.level_strong {
        "較強"
    } else if s >= cfg.level_medium {
        "中等"
    } else {
        "偏弱"
    }
}

fn scored(value: f64, cfg: &StabilityConfig) -> ScoredLevel {
    let score = normalize_to_100(value);
    ScoredLevel {
        score,
        level: strength_level(score, cfg),
    }
}

fn chaos(purity: f64, count: usize, cfg: &StabilityConfig) -> f64 {
    let base = (100.0 - purity) / 100.0;
    let penalty = (count as f64 / cfg.count_divisor * cfg.category_cap).min(cfg.category_cap);
    (base * cfg.purity_weight + penalty).min(1.0)
}

fn axis(
    purity: f64,
    count: usize,
    labels: [&'static str; 4],
    cfg: &StabilityConfig,
) -> CategoryStability {
    let chaos = chaos(purity, count, cfg);
    let label = if chaos < cfg.chaos_stable && count == 0 {
        labels[0]
    } else if chaos < cfg.chaos_mostly_stable {
        labels[1]
    } else if chaos < cfg.chaos_volatile {
        labels[2]
    } else {
        labels[3]
    };
    CategoryStability {
        chaos,
        factor_count: count,
        label,
    }
}

fn officer_type(profile: &TenGodProfile) -> &'static str {
    let guan = profile.god_weight(TenGod::ZhengGuan);
    let sha = profile.god_weight(TenGod::QiSha);
    let total = guan + sha;
    if total <= 0.0 {
        return "無明顯官星";
    }
    if (guan - sha).abs() / total < OFFICER_MIXED_DIFF {
        "官殺並見"
    } else if guan > sha {
        if guan > OFFICER_PROMINENT { "正官為主" } else { "官殺不顯" }
    } else if sha > OFFICER_PROMINENT {
        "七殺為主"
    } else {
        "官殺不顯"
    }
}

fn wealth_type(profile: &TenGodProfile) -> &'static str {
    let zheng = profile.god_weight(TenGod::ZhengCai);
    let pian = profile.god_weight(TenGod::PianCai);
    let cai = zheng + pian;
    let bi = profile.weights.bijie;
    if cai <= 0.0 {
        return if bi > WEALTH_ROB_MIN_BI { "比劫奪財" } else { "財弱" };
    }
    let diff = (zheng - pian).abs();
    if zheng > pian && diff > WEALTH_TYPE_DIFF {
        "正財為主"
    } else if pian > zheng && diff > WEALTH_TYPE_DIFF {
        "偏財為主"
    } else if bi > cai {
        "比劫奪財"
    } else {
        "財官均衡"
    }
}

fn income_mode(profile: &TenGodProfile) -> IncomeMode {
    let w = &profile.weights;
    let (main_mode, tag) = if w.guan >= 0.4 && w.cai >= 0.3 && w.shishang < 0.3 {
        ("穩定工資型", Some("適合體制內"))
    } else if w.shishang >= 0.4 && w.cai >= 0.3 {
        ("浮動績效型", Some("適合銷售/業績制"))
    } else if w.cai >= 0.4 && w.bijie < 0.3 && w.shishang >= 0.3 {
        ("機會偏財型", Some("適合對接項目/資源"))
    } else if w.bijie >= 0.4 && w.cai >= 0.3 {
        ("創業經營型", Some("適合合夥/經營"))
    } else {
        ("穩定工資型", None)
    };
    IncomeMode {
        main_mode,
        tags: tag.into_iter().collect(),
    }
}

fn rooting(profile: &TenGodProfile, cfg: &StabilityConfig) -> Rooting {
    let rooted = ROOTING_GODS
        .iter()
        .filter(|g| profile.entries.iter().any(|e| e.hidden && e.ten_god == **g))
        .count();
    let score = (rooted as f64 / ROOTING_GODS.len() as f64).min(1.0);
    let label = if score >= cfg.rooted {
        "有根"
    } else if score >= cfg.partly_rooted {
        "部分有根"
    } else {
        "無根"
    };
    Rooting { score, label }
}

/// Classify career and wealth stability.
pub fn classify_stability(
    profile: &TenGodProfile,
    structure: &StructurePattern,
    factors: &[PogeFactor],
    cfg: &StabilityConfig,
) -> StabilityClassification {
    let purity = structure
        .confidence
        .map_or(DEFAULT_PURITY, |c| (c * 100.0).clamp(0.0, 100.0));

    let mut by_category: BTreeMap<PogeCategory, Vec<&'static str>> = BTreeMap::new();
    for f in factors {
        by_category.entry(f.category).or_default().push(f.name());
    }
    let count = |c: PogeCategory| by_category.get(&c).map_or(0, Vec::len);

    let career = axis(
        purity,
        count(PogeCategory::Officer),
        ["穩定", "偏穩", "多變", "多波折"],
        cfg,
    );
    let wealth = axis(
        purity,
        count(PogeCategory::Wealth),
        ["穩定", "偏穩", "起伏大", "周期波動"],
        cfg,
    );

    let officer_weight =
        profile.god_weight(TenGod::ZhengGuan) + profile.god_weight(TenGod::QiSha);
    let mut risk_tags: Vec<&'static str> = factors
        .iter()
        .filter(|f| f.category != PogeCategory::Common)
        .map(PogeFactor::name)
        .collect();
    risk_tags.dedup();

    StabilityClassification {
        purity,
        career,
        wealth,
        officer_strength: scored(officer_weight, cfg),
        wealth_strength: scored(profile.weights.cai, cfg),
        rooting: rooting(profile, cfg),
        officer_type: officer_type(profile),
        wealth_type: wealth_type(profile),
        income_mode: income_mode(profile),
        risk_tags,
        factors: by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pillars::FourPillars;
    use crate::strength::day_master_strength;
    use crate::structure::{analyze_poge, determine_structure};
    use bazi_config::{PogeConfig, StrengthConfig};

    fn classify(names: [&str; 4]) -> StabilityClassification {
        let p = FourPillars {
            year: names[0].parse().unwrap(),
            month: names[1].parse().unwrap(),
            day: names[2].parse().unwrap(),
            hour: names[3].parse().unwrap(),
        };
        let prof = TenGodProfile::compute(&p);
        let s = day_master_strength(&p, &prof, &StrengthConfig::default());
        let st = determine_structure(&p, &prof);
        let f = analyze_poge(&p, &prof, &st, &s, &PogeConfig::default());
        classify_stability(&prof, &st, &f, &StabilityConfig::default())
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_to_100(0.0), 0);
        assert_eq!(normalize_to_100(0.456), 46);
        assert_eq!(normalize_to_100(1.0), 100);
        assert_eq!(normalize_to_100(3.2), 3);
        assert_eq!(normalize_to_100(250.0), 100);
        assert_eq!(normalize_to_100(f64::NAN), 0);
    }

    #[test]
    fn chaos_composition() {
        let cfg = StabilityConfig::default();
        assert!((chaos(100.0, 0, &cfg) - 0.0).abs() < 1e-12);
        assert!((chaos(50.0, 0, &cfg) - 0.25).abs() < 1e-12);
        // count penalty caps at 0.5
        assert!((chaos(0.0, 9, &cfg) - 1.0).abs() < 1e-12);
        assert!((chaos(80.0, 1, &cfg) - (0.1 + 0.5 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn axis_labels() {
        let cfg = StabilityConfig::default();
        let labels = ["穩定", "偏穩", "多變", "多波折"];
        assert_eq!(axis(90.0, 0, labels, &cfg).label, "穩定");
        // low chaos but a factor present is never 穩定
        assert_eq!(axis(90.0, 1, labels, &cfg).label, "偏穩");
        assert_eq!(axis(20.0, 1, labels, &cfg).label, "多變");
        assert_eq!(axis(0.0, 3, labels, &cfg).label, "多波折");
    }

    #[test]
    fn mixed_officer_chart_is_officer_risky() {
        let c = classify(["庚申", "辛酉", "甲子", "庚午"]);
        assert!(c.risk_tags.contains(&"官杀混杂"));
        assert!(c.career.factor_count >= 1);
        assert_ne!(c.career.label, "穩定");
        assert_eq!(c.factors[&PogeCategory::Officer][0], "官杀混杂");
    }

    #[test]
    fn rooting_levels() {
        // 甲 day: 戊 (偏财) hidden in 辰 and 寅, 己 (正财) hidden in 丑
        let c = classify(["甲辰", "丁丑", "甲寅", "甲子"]);
        assert_eq!(c.rooting.label, "有根");
        // no earth stems hidden anywhere
        let c = classify(["甲子", "乙卯", "甲子", "乙亥"]);
        assert_eq!(c.rooting.label, "無根");
        assert_eq!(c.wealth_type, "比劫奪財");
    }
}
