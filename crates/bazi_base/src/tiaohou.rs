//! Climate adjustment (调候): cold charts want warmth, hot charts want
//! water, wet charts want drying, dry charts want moisture.
//!
//! The month branch sets the base climate and the visible elements shift
//! it; the four scores then pick the elements the chart needs and the ones
//! it should avoid, refined by season and day-master element.

use serde::{Serialize, Serializer};

use crate::element::{Element, ElementRelation};
use crate::ganzhi::Branch;
use crate::pillars::FourPillars;

/// Weight of metal and wood in the cold / hot / wet scores.
const SIDE_ELEMENT_WEIGHT: f64 = 0.7;
/// Weight of earth in the dry score.
const EARTH_DRY_WEIGHT: f64 = 0.7;
/// Weight of metal in the dry score.
const METAL_DRY_WEIGHT: f64 = 0.3;

/// A pair counts as unbalanced when one side leads by this much...
const IMBALANCE_GAP: f64 = 2.0;
/// ...and reaches this score.
const IMBALANCE_MIN: f64 = 3.0;
/// A runner-up climate above this score is reported.
const SECOND_MIN: f64 = 1.0;

/// Points per needed element present, and the cap of the season score.
const NEED_POINTS: f64 = 2.0;
const SEASON_SCORE_MAX: f64 = 4.0;
/// Cap of the temperature and humidity balance scores.
const BALANCE_MAX: f64 = 3.0;
const BALANCE_SEVERE_GAP: f64 = 4.0;
const BALANCE_SEASON_PENALTY: f64 = 0.5;

/// Season of a month branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// 寅卯辰 spring, 巳午未 summer, 申酉戌 autumn, 亥子丑 winter.
    pub const fn of(month_branch: Branch) -> Self {
        match month_branch {
            Branch::Yin | Branch::Mao | Branch::Chen => Self::Spring,
            Branch::Si | Branch::Wu | Branch::Wei => Self::Summer,
            Branch::Shen | Branch::You | Branch::Xu => Self::Autumn,
            Branch::Hai | Branch::Zi | Branch::Chou => Self::Winter,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Spring => "春",
            Self::Summer => "夏",
            Self::Autumn => "秋",
            Self::Winter => "冬",
        }
    }
}

impl Serialize for Season {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// One of the four climate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Climate {
    Cold,
    Hot,
    Wet,
    Dry,
}

impl Climate {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cold => "寒",
            Self::Hot => "热",
            Self::Wet => "湿",
            Self::Dry => "燥",
        }
    }
}

impl Serialize for Climate {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// Coarse level of a climate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClimateLevel {
    None,
    Slight,
    Heavy,
    Extreme,
}

impl ClimateLevel {
    pub fn of(score: f64) -> Self {
        if score >= 6.0 {
            Self::Extreme
        } else if score >= 3.0 {
            Self::Heavy
        } else if score >= 1.0 {
            Self::Slight
        } else {
            Self::None
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "无",
            Self::Slight => "稍",
            Self::Heavy => "重",
            Self::Extreme => "极",
        }
    }
}

impl Serialize for ClimateLevel {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// The chart's micro-climate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateProfile {
    pub cold: f64,
    pub hot: f64,
    pub wet: f64,
    pub dry: f64,
    pub cold_level: ClimateLevel,
    pub hot_level: ClimateLevel,
    pub wet_level: ClimateLevel,
    pub dry_level: ClimateLevel,
    /// Highest axis; ties go cold, hot, wet, dry.
    pub dominant: Climate,
    /// Runner-up when its score is above 1.
    pub second: Option<Climate>,
}

/// Climate adjustment of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tiaohou {
    pub season: Season,
    pub climate: ClimateProfile,
    /// Elements that correct the climate, in order of urgency.
    pub need: Vec<Element>,
    /// Elements that worsen it.
    pub avoid: Vec<Element>,
    /// Four-character label such as 寒重喜火.
    pub label: &'static str,
    /// Needed elements present and avoided ones kept in check (0–4).
    pub season_score: f64,
    /// Cold against hot (0–3).
    pub temperature_balance: f64,
    /// Wet against dry (0–3).
    pub humidity_balance: f64,
    pub suggestion: String,
}

/// One count per visible stem and per branch element.
fn surface_counts(pillars: &FourPillars) -> [f64; 5] {
    let mut counts = [0.0; 5];
    for stem in pillars.stems() {
        counts[stem.element().index() as usize] += 1.0;
    }
    for branch in pillars.branches() {
        counts[branch.element().index() as usize] += 1.0;
    }
    counts
}

fn count(counts: &[f64; 5], e: Element) -> f64 {
    counts[e.index() as usize]
}

/// Climate scores from the month branch and the visible elements.
pub fn climate_profile(pillars: &FourPillars) -> ClimateProfile {
    let (mut cold, mut hot, mut wet, mut dry) = match pillars.month.branch {
        Branch::Hai | Branch::Zi => (3.0, 0.0, 1.0, 0.0),
        Branch::Chou => (2.0, 0.0, 2.0, 0.0),
        Branch::Si | Branch::Wu => (0.0, 3.0, 0.0, 1.0),
        Branch::Wei => (0.0, 2.0, 0.0, 2.0),
        Branch::Chen => (0.0, 0.0, 2.0, 0.0),
        Branch::Xu => (0.0, 0.0, 0.0, 2.0),
        _ => (0.0, 0.0, 0.0, 0.0),
    };

    let c = surface_counts(pillars);
    let (wood, fire, earth, metal, water) = (
        count(&c, Element::Wood),
        count(&c, Element::Fire),
        count(&c, Element::Earth),
        count(&c, Element::Metal),
        count(&c, Element::Water),
    );
    cold += water + metal * SIDE_ELEMENT_WEIGHT;
    hot += fire + wood * SIDE_ELEMENT_WEIGHT;
    wet += water + wood * SIDE_ELEMENT_WEIGHT;
    dry += fire + earth * EARTH_DRY_WEIGHT + metal * METAL_DRY_WEIGHT;

    let mut ranked = [
        (Climate::Cold, cold),
        (Climate::Hot, hot),
        (Climate::Wet, wet),
        (Climate::Dry, dry),
    ];
    // stable: ties keep the axis order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ClimateProfile {
        cold,
        hot,
        wet,
        dry,
        cold_level: ClimateLevel::of(cold),
        hot_level: ClimateLevel::of(hot),
        wet_level: ClimateLevel::of(wet),
        dry_level: ClimateLevel::of(dry),
        dominant: ranked[0].0,
        second: (ranked[1].1 > SECOND_MIN).then_some(ranked[1].0),
    }
}

fn push(list: &mut Vec<Element>, e: Element) {
    if !list.contains(&e) {
        list.push(e);
    }
}

fn leads(a: f64, b: f64) -> bool {
    a - b >= IMBALANCE_GAP && a >= IMBALANCE_MIN
}

/// Needed and avoided elements for a climate.
fn rules(season: Season, dm: Element, cl: &ClimateProfile) -> (Vec<Element>, Vec<Element>) {
    use Element::*;
    let mut need = Vec::new();
    let mut avoid = Vec::new();

    if leads(cl.cold, cl.hot) {
        push(&mut need, Fire);
        push(&mut need, Earth);
        push(&mut avoid, Water);
    } else if leads(cl.hot, cl.cold) {
        push(&mut need, Water);
        push(&mut need, Metal);
        push(&mut avoid, Fire);
    }

    if leads(cl.wet, cl.dry) {
        push(&mut need, Fire);
        push(&mut need, Earth);
        push(&mut avoid, Water);
    } else if leads(cl.dry, cl.wet) {
        push(&mut need, Water);
        push(&mut need, Earth);
        push(&mut avoid, Fire);
    }

    if need.is_empty() && avoid.is_empty() {
        let cool_damp = cl.cold + cl.wet;
        let warm_dry = cl.hot + cl.dry;
        if cool_damp > warm_dry {
            push(&mut need, Fire);
            push(&mut need, Earth);
        } else if warm_dry > cool_damp {
            push(&mut need, Water);
            push(&mut need, Metal);
        }
    }

    match (season, dm) {
        (Season::Winter, Wood | Earth | Metal | Water) => push(&mut need, Fire),
        (Season::Summer, Metal | Fire | Earth) => push(&mut need, Water),
        (Season::Autumn, Metal) => {
            push(&mut need, Fire);
            push(&mut need, Water);
        }
        (Season::Spring, Wood) => {
            push(&mut need, Metal);
            push(&mut need, Fire);
        }
        _ => {}
    }
    (need, avoid)
}

fn present(counts: &[f64; 5], e: Element) -> bool {
    count(counts, e) > 0.0
}

fn season_score(need: &[Element], avoid: &[Element], counts: &[f64; 5]) -> f64 {
    let mut score = 0.0;
    for e in need {
        if present(counts, *e) {
            score += NEED_POINTS;
        }
    }
    for e in avoid {
        let controller = ElementRelation::OvercomeBy.element_for(*e);
        if !present(counts, *e) || present(counts, controller) {
            score += 1.0;
        }
    }
    f64::min(score, SEASON_SCORE_MAX)
}

fn balance(a: f64, b: f64, season_excess: bool) -> f64 {
    let gap = (a - b).abs();
    let mut score = BALANCE_MAX;
    if gap >= BALANCE_SEVERE_GAP {
        score -= 2.0;
    } else if gap >= IMBALANCE_GAP {
        score -= 1.0;
    }
    if season_excess {
        score -= BALANCE_SEASON_PENALTY;
    }
    ((score * 10.0).round() / 10.0).clamp(0.0, BALANCE_MAX)
}

fn label(cl: &ClimateProfile, need: &[Element]) -> &'static str {
    let needs = |e| need.contains(&e);
    if cl.cold >= IMBALANCE_MIN && needs(Element::Fire) {
        return "寒重喜火";
    }
    if cl.hot >= IMBALANCE_MIN && needs(Element::Water) {
        return "热重喜水";
    }
    if cl.dry >= IMBALANCE_MIN && needs(Element::Water) {
        return "燥重喜水";
    }
    if cl.wet >= IMBALANCE_MIN && needs(Element::Fire) {
        return "湿重喜火";
    }
    if (cl.cold - cl.hot).abs() < IMBALANCE_GAP && (cl.wet - cl.dry).abs() < IMBALANCE_GAP {
        return "平和可补";
    }
    match cl.dominant {
        Climate::Cold => "寒重喜火",
        Climate::Hot => "热重喜水",
        Climate::Dry => "燥重喜水",
        Climate::Wet => "湿重喜火",
    }
}

fn suggestion(cl: &ClimateProfile, need: &[Element]) -> String {
    if need.is_empty() {
        return "命局平和，可适当补益".to_string();
    }
    let names: Vec<&str> = need.iter().map(|e| e.name()).collect();
    format!("命局偏{}，宜行{}运以调候", cl.dominant.name(), names.join("、"))
}

/// Climate adjustment of `pillars`.
pub fn tiaohou(pillars: &FourPillars) -> Tiaohou {
    let season = Season::of(pillars.month.branch);
    let dm = pillars.day_master().element();
    let climate = climate_profile(pillars);
    let (need, avoid) = rules(season, dm, &climate);
    let counts = surface_counts(pillars);

    let temperature_balance = balance(
        climate.cold,
        climate.hot,
        match season {
            Season::Winter => climate.cold > climate.hot + IMBALANCE_GAP,
            Season::Summer => climate.hot > climate.cold + IMBALANCE_GAP,
            _ => false,
        },
    );
    let humidity_balance = balance(
        climate.wet,
        climate.dry,
        match season {
            Season::Spring => climate.wet > climate.dry + IMBALANCE_GAP,
            Season::Autumn => climate.dry > climate.wet + IMBALANCE_GAP,
            _ => false,
        },
    );
    let result = Tiaohou {
        season,
        season_score: season_score(&need, &avoid, &counts),
        temperature_balance,
        humidity_balance,
        label: label(&climate, &need),
        suggestion: suggestion(&climate, &need),
        climate,
        need,
        avoid,
    };
    tracing::debug!(
        season = season.name(),
        dominant = result.climate.dominant.name(),
        label = result.label,
        "tiaohou"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pillars(names: [&str; 4]) -> FourPillars {
        FourPillars {
            year: names[0].parse().unwrap(),
            month: names[1].parse().unwrap(),
            day: names[2].parse().unwrap(),
            hour: names[3].parse().unwrap(),
        }
    }

    #[test]
    fn seasons_by_month() {
        assert_eq!(Season::of(Branch::Chen), Season::Spring);
        assert_eq!(Season::of(Branch::Wei), Season::Summer);
        assert_eq!(Season::of(Branch::Xu), Season::Autumn);
        assert_eq!(Season::of(Branch::Chou), Season::Winter);
    }

    #[test]
    fn winter_water_chart_wants_fire() {
        // 壬 day in 子 month with water and metal around
        let t = tiaohou(&pillars(["庚子", "戊子", "壬申", "辛亥"]));
        assert_eq!(t.season, Season::Winter);
        assert_eq!(t.climate.dominant, Climate::Cold);
        assert!(t.climate.cold_level >= ClimateLevel::Heavy);
        assert_eq!(t.need.first(), Some(&Element::Fire));
        assert!(t.avoid.contains(&Element::Water));
        assert_eq!(t.label, "寒重喜火");
        assert!(t.suggestion.contains('火'));
        // fire missing, 戊 earth present and holding the water in check
        assert_eq!(t.season_score, 3.0);
    }

    #[test]
    fn summer_fire_chart_wants_water() {
        let t = tiaohou(&pillars(["丙午", "甲午", "丙寅", "丁巳"]));
        assert_eq!(t.season, Season::Summer);
        assert_eq!(t.climate.dominant, Climate::Hot);
        assert_eq!(t.need[0], Element::Water);
        assert!(t.need.contains(&Element::Metal));
        assert!(t.avoid.contains(&Element::Fire));
        assert_eq!(t.label, "热重喜水");
        assert!(t.temperature_balance < BALANCE_MAX);
    }

    #[test]
    fn spring_wood_is_pruned_and_warmed() {
        let t = tiaohou(&pillars(["甲寅", "丙寅", "甲寅", "乙卯"]));
        assert!(t.need.contains(&Element::Metal));
        assert!(t.need.contains(&Element::Fire));
    }

    #[test]
    fn lists_never_overlap_and_scores_stay_capped() {
        for i in 0..60u8 {
            let gz = crate::ganzhi::GanZhi::from_index(i);
            let p = FourPillars {
                year: gz.offset(13),
                month: gz.offset(5),
                day: gz,
                hour: gz.offset(37),
            };
            let t = tiaohou(&p);
            for e in &t.need {
                assert_eq!(t.need.iter().filter(|x| *x == e).count(), 1);
            }
            assert!((0.0..=SEASON_SCORE_MAX).contains(&t.season_score));
            assert!((0.0..=BALANCE_MAX).contains(&t.temperature_balance));
            assert!((0.0..=BALANCE_MAX).contains(&t.humidity_balance));
        }
    }
}
