//! Chart assembly and per-query evaluation.
//!
//! [`compute_chart`] runs every birth-only stage once; the result never
//! changes for the same [`BirthInfo`] and is safe to cache. [`query`] adds
//! everything that depends on a reference year or the caller's age.

use std::collections::BTreeMap;

use bazi_config::EngineConfig;
use bazi_time::LunarDate;
use chrono::Datelike;
use serde::Serialize;

use crate::birth::BirthInfo;
use crate::element::Element;
use crate::error::ChartError;
use crate::ganzhi::{Branch, GanZhi, Stem};
use crate::hidden::{Qi, hidden_stems};
use crate::luck::{
    FavorabilityWindow, FlowPeriod, LuckCycleView, LuckTimeline, Scenario, ScenarioKind,
    build_views, favorability_windows, flow_months, flow_year, luck_cycles,
};
use crate::nayin::{nayin, nayin_element};
use crate::palace::{Palaces, palaces};
use crate::pillars::{FourPillars, Position, ResolvedMoment, resolve_pillars};
use crate::shensha::{
    FloatingShensha, ReferenceYear, ShenshaHits, check_reference_year, detect_floating,
    detect_static,
};
use crate::stage12::{LifeStage, life_stage};
use crate::strength::{DayMasterStrength, day_master_strength};
use crate::structure::{
    PogeFactor, StabilityClassification, StructurePattern, analyze_poge, classify_stability,
    determine_structure,
};
use crate::ten_god::{TenGod, TenGodProfile, ten_god};
use crate::tiaohou::{Tiaohou, tiaohou};
use crate::wangxiang::{SeasonState, seasonal_states};
use crate::wuxing::ElementDistribution;
use crate::yongshen::{YongshenProfile, determine_yongshen};

/// Years before the reference year covered by default windows.
const WINDOW_YEARS_BEFORE: i32 = 1;
/// Years after the reference year covered by default windows.
const WINDOW_YEARS_AFTER: i32 = 5;
/// Longest explicit window range, in years.
pub const MAX_WINDOW_YEARS: i32 = 120;

// ---------------------------------------------------------------------------
// Static chart
// ---------------------------------------------------------------------------

/// A hidden stem with its ten god.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HiddenDetail {
    pub stem: Stem,
    pub qi: Qi,
    pub dominance: f64,
    pub ten_god: TenGod,
}

/// One pillar with its hidden stems and na-yin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarDetail {
    pub position: Position,
    pub ganzhi: GanZhi,
    /// Ten god of the visible stem; `None` on the day master itself.
    pub stem_ten_god: Option<TenGod>,
    pub hidden: Vec<HiddenDetail>,
    pub nayin: &'static str,
    pub nayin_element: Element,
    pub void_branches: [Branch; 2],
    /// 星运: the day master's life stage on this branch.
    pub xingyun: LifeStage,
    /// 自坐: this pillar's stem on its own branch.
    pub zizuo: LifeStage,
}

fn pillar_detail(pos: Position, gz: GanZhi, dm: Stem) -> PillarDetail {
    PillarDetail {
        position: pos,
        ganzhi: gz,
        stem_ten_god: (pos != Position::Day).then(|| ten_god(dm, gz.stem)),
        hidden: hidden_stems(gz.branch)
            .iter()
            .map(|h| HiddenDetail {
                stem: h.stem,
                qi: h.qi,
                dominance: h.dominance,
                ten_god: ten_god(dm, h.stem),
            })
            .collect(),
        nayin: nayin(gz),
        nayin_element: nayin_element(gz),
        void_branches: gz.void_branches(),
        xingyun: life_stage(dm, gz.branch),
        zizuo: life_stage(gz.stem, gz.branch),
    }
}

/// Everything derivable from the birth input alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub birth: BirthInfo,
    pub moment: ResolvedMoment,
    pub lunar: LunarDate,
    pub pillars: FourPillars,
    pub details: Vec<PillarDetail>,
    pub day_master: Stem,
    pub elements: ElementDistribution,
    pub ten_gods: TenGodProfile,
    pub seasonal_states: BTreeMap<Element, SeasonState>,
    pub shensha: ShenshaHits,
    pub strength: DayMasterStrength,
    pub structure: StructurePattern,
    pub poge: Vec<PogeFactor>,
    pub stability: StabilityClassification,
    pub yongshen: YongshenProfile,
    pub tiaohou: Tiaohou,
    pub palaces: Palaces,
    pub luck: LuckTimeline,
}

impl Chart {
    /// Gregorian year of the birth clock.
    pub fn birth_year(&self) -> i32 {
        self.moment.local.year()
    }

    /// Age reached in `year`, counting the birth year as 0.
    pub fn age_in(&self, year: i32) -> Option<u32> {
        year.checked_sub(self.birth_year())
            .and_then(|age| u32::try_from(age).ok())
    }

    /// Preset scenario for this chart.
    pub fn scenario(&self, kind: ScenarioKind) -> Scenario {
        kind.scenario(&self.pillars, self.birth.sex)
    }

    /// Luck views for `current_age`.
    pub fn luck_views(&self, current_age: u32) -> Vec<LuckCycleView> {
        build_views(&self.luck.cycles, current_age)
    }
}

/// Compute the static chart.
pub fn compute_chart(birth: &BirthInfo, config: &EngineConfig) -> Result<Chart, ChartError> {
    config.validate()?;
    let (pillars, moment) = resolve_pillars(birth)?;
    let dm = pillars.day_master();

    let details = pillars
        .iter()
        .map(|(pos, gz)| pillar_detail(pos, gz, dm))
        .collect();
    let elements = ElementDistribution::compute(&pillars);
    let ten_gods = TenGodProfile::compute(&pillars);
    let shensha = detect_static(&pillars);
    let strength = day_master_strength(&pillars, &ten_gods, &config.strength);
    tracing::debug!(score = strength.score, band = strength.band.name(), "strength");

    let structure = determine_structure(&pillars, &ten_gods);
    let poge = analyze_poge(&pillars, &ten_gods, &structure, &strength, &config.poge);
    let stability = classify_stability(&ten_gods, &structure, &poge, &config.stability);
    tracing::debug!(structure = structure.name, poge = poge.len(), "structure");

    let yongshen = determine_yongshen(&pillars, &strength, &elements, &structure);
    let luck = luck_cycles(&pillars, &moment, birth.sex, &yongshen, &config.luck)?;

    Ok(Chart {
        birth: birth.clone(),
        lunar: moment.lunar,
        seasonal_states: seasonal_states(pillars.month.branch),
        tiaohou: tiaohou(&pillars),
        palaces: palaces(&pillars),
        moment,
        pillars,
        details,
        day_master: dm,
        elements,
        ten_gods,
        shensha,
        strength,
        structure,
        poge,
        stability,
        yongshen,
        luck,
    })
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// What a query evaluates besides floating markers.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartQuery {
    pub reference: ReferenceYear,
    /// Defaults to the reference year minus the birth year.
    pub current_age: Option<u32>,
    pub include_luck_views: bool,
    pub include_flow_year: bool,
    pub include_flow_months: bool,
    /// Scenarios to build windows for.
    pub scenarios: Vec<ScenarioKind>,
    /// Inclusive year range of windows; defaults around the reference year.
    pub window_years: Option<(i32, i32)>,
}

impl ChartQuery {
    /// Floating markers, luck views and the flowing year of `reference`.
    pub fn new(reference: ReferenceYear) -> Self {
        Self {
            reference,
            current_age: None,
            include_luck_views: true,
            include_flow_year: true,
            include_flow_months: false,
            scenarios: Vec::new(),
            window_years: None,
        }
    }

    pub fn for_year(year: i32) -> Self {
        Self::new(ReferenceYear::Year(year))
    }

    pub fn age(mut self, age: u32) -> Self {
        self.current_age = Some(age);
        self
    }

    pub fn scenario(mut self, kind: ScenarioKind) -> Self {
        if !self.scenarios.contains(&kind) {
            self.scenarios.push(kind);
        }
        self
    }

    pub fn years(mut self, from: i32, to: i32) -> Self {
        self.window_years = Some((from.min(to), from.max(to)));
        self
    }

    pub fn flow_months(mut self, enabled: bool) -> Self {
        self.include_flow_months = enabled;
        self
    }
}

/// Reference-dependent results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub reference: ReferenceYear,
    pub floating: FloatingShensha,
    pub current_age: Option<u32>,
    pub luck_views: Vec<LuckCycleView>,
    pub current_cycle: Option<LuckCycleView>,
    pub flow_year: Option<FlowPeriod>,
    pub flow_months: Vec<FlowPeriod>,
    pub windows: BTreeMap<ScenarioKind, Vec<FavorabilityWindow>>,
}

/// Inclusive window range of a query.
fn window_range(q: &ChartQuery, year: Option<i32>) -> Result<(i32, i32), ChartError> {
    let (from, to) = match (q.window_years, year) {
        (Some(range), _) => range,
        (None, Some(y)) => (y - WINDOW_YEARS_BEFORE, y + WINDOW_YEARS_AFTER),
        (None, None) => {
            return Err(ChartError::UnknownReferenceYear(format!(
                "windows need a calendar year, got branch {}",
                q.reference.branch().name()
            )));
        }
    };
    check_reference_year(from)?;
    check_reference_year(to)?;
    if to - from >= MAX_WINDOW_YEARS {
        return Err(ChartError::UnknownReferenceYear(format!(
            "window range {from}..={to} longer than {MAX_WINDOW_YEARS} years"
        )));
    }
    Ok((from, to))
}

/// Evaluate `q` against a computed chart.
pub fn query(chart: &Chart, q: &ChartQuery, config: &EngineConfig) -> Result<QueryResult, ChartError> {
    let reference = q.reference.validate()?;
    let year = reference.year();
    let floating = detect_floating(&chart.pillars, reference);
    let current_age = q.current_age.or_else(|| year.and_then(|y| chart.age_in(y)));

    // Window containment only looks at calendar years, so windows get the
    // views even when no age is known.
    let show_views = q.include_luck_views && current_age.is_some();
    let views = if show_views || !q.scenarios.is_empty() {
        chart.luck_views(current_age.unwrap_or(0))
    } else {
        Vec::new()
    };
    let current_cycle = current_age.and_then(|_| views.iter().find(|v| v.is_current).cloned());

    let flow = match year {
        Some(y) if q.include_flow_year => Some(flow_year(&chart.pillars, &chart.yongshen, y)),
        _ => None,
    };
    let months = match year {
        Some(y) if q.include_flow_months => flow_months(&chart.pillars, &chart.yongshen, y),
        _ => Vec::new(),
    };

    let mut windows = BTreeMap::new();
    if !q.scenarios.is_empty() {
        let (from, to) = window_range(q, year)?;
        for kind in &q.scenarios {
            let scenario = chart.scenario(*kind);
            windows.insert(
                *kind,
                favorability_windows(
                    &chart.pillars,
                    &chart.yongshen,
                    &views,
                    &scenario,
                    from..=to,
                    &config.window,
                ),
            );
        }
    }
    tracing::debug!(
        branch = floating.branch.name(),
        markers = floating.hits.len(),
        scenarios = windows.len(),
        "query"
    );

    Ok(QueryResult {
        reference,
        floating,
        current_age,
        luck_views: if show_views { views } else { Vec::new() },
        current_cycle,
        flow_year: flow,
        flow_months: months,
        windows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birth::Sex;

    fn chart() -> Chart {
        let birth = BirthInfo::builder()
            .sex(Sex::Female)
            .solar_date(2025, 6, 20)
            .time(8, 0)
            .build()
            .unwrap();
        compute_chart(&birth, &EngineConfig::default()).unwrap()
    }

    #[test]
    fn details_follow_pillars() {
        let c = chart();
        assert_eq!(c.details.len(), 4);
        assert_eq!(c.details[2].position, Position::Day);
        assert!(c.details[2].stem_ten_god.is_none());
        assert!(c.details[0].stem_ten_god.is_some());
        for d in &c.details {
            assert_eq!(d.ganzhi, c.pillars.get(d.position));
            assert_eq!(d.hidden.len(), hidden_stems(d.ganzhi.branch).len());
            assert_eq!(d.xingyun, life_stage(c.day_master, d.ganzhi.branch));
        }
        // 庚申 day sits on its own 禄; 乙巳 year: 乙 on 巳 is 沐浴
        assert_eq!(c.details[2].zizuo, LifeStage::LinGuan);
        assert_eq!(c.details[2].xingyun, c.details[2].zizuo);
        assert_eq!(c.details[0].zizuo, LifeStage::MuYu);
        assert_eq!(c.tiaohou.season, crate::tiaohou::Season::Summer);
        assert_eq!(c.birth_year(), 2025);
        assert_eq!(c.age_in(2035), Some(10));
        assert_eq!(c.age_in(2020), None);
    }

    #[test]
    fn query_derives_age_from_year() {
        let c = chart();
        let r = query(&c, &ChartQuery::for_year(2045), &EngineConfig::default()).unwrap();
        assert_eq!(r.current_age, Some(20));
        assert_eq!(r.luck_views.len(), c.luck.cycles.len());
        let cur = r.current_cycle.unwrap();
        assert!(cur.start_age <= 20 && 20 < cur.end_age);
        assert_eq!(r.flow_year.unwrap().ganzhi.name(), "乙丑");
    }

    #[test]
    fn windows_default_around_reference() {
        let c = chart();
        let q = ChartQuery::for_year(2030).scenario(ScenarioKind::Marriage);
        let r = query(&c, &q, &EngineConfig::default()).unwrap();
        let ws = &r.windows[&ScenarioKind::Marriage];
        assert_eq!(ws.len(), 7);
        assert_eq!(ws[0].year, 2029);
        assert_eq!(ws[6].year, 2035);
    }

    #[test]
    fn branch_reference_cannot_window() {
        let c = chart();
        let q = ChartQuery::new(ReferenceYear::Branch(Branch::Si)).scenario(ScenarioKind::Exam);
        let err = query(&c, &q, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, ChartError::UnknownReferenceYear(_)));
        // without scenarios a branch reference is fine
        let r = query(&c, &ChartQuery::new(ReferenceYear::Branch(Branch::Si)), &EngineConfig::default())
            .unwrap();
        assert!(r.current_age.is_none());
        assert!(r.luck_views.is_empty());
        assert!(r.flow_year.is_none());
    }

    #[test]
    fn windows_keep_luck_level_without_age() {
        let c = chart();
        let cfg = EngineConfig::default();
        let by_year = query(
            &c,
            &ChartQuery::for_year(2045).scenario(ScenarioKind::Career).years(2040, 2050),
            &cfg,
        )
        .unwrap();
        assert_eq!(by_year.current_age, Some(20));
        let by_branch = query(
            &c,
            &ChartQuery::new(ReferenceYear::Branch(Branch::Chou))
                .scenario(ScenarioKind::Career)
                .years(2040, 2050),
            &cfg,
        )
        .unwrap();
        assert!(by_branch.current_age.is_none());
        assert!(by_branch.luck_views.is_empty());
        let a = &by_year.windows[&ScenarioKind::Career];
        let b = &by_branch.windows[&ScenarioKind::Career];
        for w in b {
            let same = a.iter().find(|x| x.year == w.year).unwrap();
            assert_eq!(w, same);
        }
        assert!(b.iter().any(|w| w.reason.luck_level.is_some()));

        // a reference before the birth year still places windows in cycles
        let early = query(
            &c,
            &ChartQuery::for_year(2020).scenario(ScenarioKind::Career).years(2040, 2050),
            &cfg,
        )
        .unwrap();
        assert!(early.current_age.is_none());
        assert_eq!(early.windows[&ScenarioKind::Career], *b);
    }

    #[test]
    fn out_of_range_years_are_rejected() {
        let c = chart();
        let cfg = EngineConfig::default();
        for q in [
            ChartQuery::for_year(i32::MAX).scenario(ScenarioKind::Exam),
            ChartQuery::for_year(i32::MIN),
            ChartQuery::for_year(2030).scenario(ScenarioKind::Exam).years(i32::MIN, i32::MAX),
            ChartQuery::for_year(2030).scenario(ScenarioKind::Exam).years(1900, 2200),
        ] {
            assert!(
                matches!(query(&c, &q, &cfg), Err(ChartError::UnknownReferenceYear(_))),
                "{q:?}"
            );
        }
        let q = ChartQuery::for_year(2030).scenario(ScenarioKind::Exam).years(2000, 2119);
        assert_eq!(query(&c, &q, &cfg).unwrap().windows[&ScenarioKind::Exam].len(), 120);
    }
}
