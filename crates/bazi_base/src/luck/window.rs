//! Favorability windows.
//!
//! Every scenario runs through [`favorability_window`]: the containing luck
//! view, the year's favour, whether the year's ten god falls in a target
//! bucket, and the year branch's relations to the scenario's anchor branch.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use bazi_config::WindowConfig;
use serde::{Serialize, Serializer};

use crate::birth::Sex;
use crate::ganzhi::{Branch, GanZhi, year_ganzhi};
use crate::luck::adapter::LuckCycleView;
use crate::luck::dayun::raw_favour;
use crate::luck::types::{FavourLevel, RawFavour};
use crate::pillars::{FourPillars, Position};
use crate::relations::{BranchRelation, relations_between};
use crate::ten_god::{Bucket, TenGod, ten_god};
use crate::yongshen::YongshenProfile;

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

/// Built-in scenario presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScenarioKind {
    Marriage,
    Career,
    Exam,
    Invest,
}

pub const ALL_SCENARIOS: [ScenarioKind; 4] = [
    ScenarioKind::Marriage,
    ScenarioKind::Career,
    ScenarioKind::Exam,
    ScenarioKind::Invest,
];

impl ScenarioKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Marriage => "marriage",
            Self::Career => "career",
            Self::Exam => "exam",
            Self::Invest => "invest",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Marriage => "婚恋",
            Self::Career => "事业",
            Self::Exam => "考试",
            Self::Invest => "投资",
        }
    }

    /// Build the preset for a chart.
    pub fn scenario(self, pillars: &FourPillars, sex: Sex) -> Scenario {
        match self {
            Self::Marriage => Scenario::marriage(pillars, sex),
            Self::Career => Scenario::career(pillars),
            Self::Exam => Scenario::exam(pillars),
            Self::Invest => Scenario::invest(pillars),
        }
    }
}

impl Display for ScenarioKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ScenarioKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        ALL_SCENARIOS
            .iter()
            .copied()
            .find(|k| k.code().eq_ignore_ascii_case(t) || k.name() == t)
            .ok_or_else(|| format!("unknown scenario: {s}"))
    }
}

impl Serialize for ScenarioKind {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.code())
    }
}

/// Anchor branch and target buckets of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub anchor_position: Position,
    pub anchor: Branch,
    pub targets: Vec<Bucket>,
}

impl Scenario {
    fn at(kind: ScenarioKind, pillars: &FourPillars, pos: Position, targets: Vec<Bucket>) -> Self {
        Self {
            kind,
            anchor_position: pos,
            anchor: pillars.get(pos).branch,
            targets,
        }
    }

    /// Spouse palace (day branch); 财 for men, 官 for women.
    pub fn marriage(pillars: &FourPillars, sex: Sex) -> Self {
        let target = match sex {
            Sex::Male => Bucket::Cai,
            Sex::Female => Bucket::Guan,
        };
        Self::at(ScenarioKind::Marriage, pillars, Position::Day, vec![target])
    }

    /// Month branch; 官 and 财.
    pub fn career(pillars: &FourPillars) -> Self {
        Self::at(
            ScenarioKind::Career,
            pillars,
            Position::Month,
            vec![Bucket::Guan, Bucket::Cai],
        )
    }

    /// Month branch; 官 and 印.
    pub fn exam(pillars: &FourPillars) -> Self {
        Self::at(
            ScenarioKind::Exam,
            pillars,
            Position::Month,
            vec![Bucket::Guan, Bucket::Yin],
        )
    }

    /// Month branch; 财 and 食伤.
    pub fn invest(pillars: &FourPillars) -> Self {
        Self::at(
            ScenarioKind::Invest,
            pillars,
            Position::Month,
            vec![Bucket::Cai, Bucket::ShiShang],
        )
    }
}

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowLevel {
    Golden,
    Good,
    Normal,
    Hard,
}

impl WindowLevel {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Golden => "golden",
            Self::Good => "good",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }

    pub fn from_score(score: f64, cfg: &WindowConfig) -> Self {
        if score >= cfg.golden {
            Self::Golden
        } else if score >= cfg.good {
            Self::Good
        } else if score > cfg.normal {
            Self::Normal
        } else {
            Self::Hard
        }
    }
}

/// Why a window got its level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReason {
    /// Id of the containing luck view, if the year is inside the timeline.
    pub luck_id: Option<String>,
    pub luck_level: Option<FavourLevel>,
    pub year_favour: RawFavour,
    pub ten_god: TenGod,
    pub target_hit: bool,
    /// Relations of the year branch to the anchor.
    pub relations: Vec<BranchRelation>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavorabilityWindow {
    pub scenario: ScenarioKind,
    pub year: i32,
    pub ganzhi: GanZhi,
    pub level: WindowLevel,
    /// In [−clamp, clamp].
    pub score: f64,
    pub reason: WindowReason,
}

fn relation_score(r: BranchRelation, cfg: &WindowConfig) -> f64 {
    match r {
        BranchRelation::LiuHe => cfg.he,
        BranchRelation::SanHe => cfg.san_he,
        BranchRelation::Chong => cfg.chong,
        BranchRelation::Xing | BranchRelation::ZiXing => cfg.xing,
        BranchRelation::Hai => cfg.hai,
        BranchRelation::Po => cfg.po,
    }
}

fn luck_phrase(level: Option<FavourLevel>) -> &'static str {
    match level {
        Some(FavourLevel::Good) => "大运顺",
        Some(FavourLevel::Wave) => "大运有波动",
        Some(FavourLevel::Flat) => "大运平稳",
        None => "未入大运",
    }
}

fn summary(
    gz: GanZhi,
    anchor: Branch,
    luck: Option<FavourLevel>,
    favour: RawFavour,
    god: TenGod,
    hit: bool,
    relations: &[BranchRelation],
) -> String {
    let mut parts = vec![
        luck_phrase(luck).to_string(),
        format!("流年{gz}属{}", favour.name()),
    ];
    if hit {
        parts.push(format!("{}透出应所求", god.name()));
    }
    for r in relations {
        parts.push(format!("{}与{}{}", gz.branch.name(), anchor.name(), r.name()));
    }
    format!("{}。", parts.join("，"))
}

/// Judge one calendar year for a scenario.
pub fn favorability_window(
    pillars: &FourPillars,
    yongshen: &YongshenProfile,
    views: &[LuckCycleView],
    scenario: &Scenario,
    year: i32,
    cfg: &WindowConfig,
) -> FavorabilityWindow {
    let gz = year_ganzhi(year);
    let view = views.iter().find(|v| v.contains_year(year));
    let luck_level = view.map(|v| v.favour_level);
    let favour = raw_favour(gz.stem.element(), yongshen);
    let god = ten_god(pillars.day_master(), gz.stem);
    let target_hit = scenario.targets.contains(&god.bucket());
    let relations = relations_between(gz.branch, scenario.anchor);

    let luck = match luck_level {
        Some(FavourLevel::Good) => cfg.luck_good,
        Some(FavourLevel::Wave) => cfg.luck_wave,
        Some(FavourLevel::Flat) | None => 0.0,
    };
    let raw = luck
        + cfg.year_favour * favour.sign()
        + if target_hit { cfg.target_hit } else { 0.0 }
        + relations.iter().map(|r| relation_score(*r, cfg)).sum::<f64>();
    let score = raw.clamp(-cfg.clamp, cfg.clamp);
    let level = WindowLevel::from_score(score, cfg);
    tracing::trace!(scenario = scenario.kind.code(), year, score, level = level.code(), "window");

    FavorabilityWindow {
        scenario: scenario.kind,
        year,
        ganzhi: gz,
        level,
        score,
        reason: WindowReason {
            luck_id: view.map(|v| v.id.clone()),
            luck_level,
            year_favour: favour,
            ten_god: god,
            target_hit,
            summary: summary(gz, scenario.anchor, luck_level, favour, god, target_hit, &relations),
            relations,
        },
    }
}

/// Windows for every year in `years`.
pub fn favorability_windows(
    pillars: &FourPillars,
    yongshen: &YongshenProfile,
    views: &[LuckCycleView],
    scenario: &Scenario,
    years: impl IntoIterator<Item = i32>,
    cfg: &WindowConfig,
) -> Vec<FavorabilityWindow> {
    years
        .into_iter()
        .map(|y| favorability_window(pillars, yongshen, views, scenario, y, cfg))
        .collect()
}
