//! Ten gods (十神) and their positional weights.
//!
//! Every stem other than the day master itself, visible or hidden, is
//! classified against the day master and weighted by
//! `base × place × (0.7 + 0.6 × season)`, where base is 1.2 for a visible
//! stem or the hidden dominance, place favours the month (1.30) and day
//! (1.15) pillars, and season is the 旺相休囚死 score of the stem's element.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::element::ElementRelation;
use crate::ganzhi::{Branch, Stem};
use crate::hidden::hidden_stems;
use crate::pillars::{FourPillars, Position};
use crate::wangxiang::season_score;

/// Base weight of a visible stem.
pub const VISIBLE_STEM_WEIGHT: f64 = 1.2;

/// Place boost of the month pillar.
pub const MONTH_PLACE_BOOST: f64 = 1.30;

/// Place boost of the day pillar.
pub const DAY_PLACE_BOOST: f64 = 1.15;

// ---------------------------------------------------------------------------
// Ten gods and buckets
// ---------------------------------------------------------------------------

/// The ten gods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TenGod {
    BiJian,
    JieCai,
    ShiShen,
    ShangGuan,
    PianCai,
    ZhengCai,
    QiSha,
    ZhengGuan,
    PianYin,
    ZhengYin,
}

/// All ten gods.
pub const ALL_TEN_GODS: [TenGod; 10] = [
    TenGod::BiJian,
    TenGod::JieCai,
    TenGod::ShiShen,
    TenGod::ShangGuan,
    TenGod::PianCai,
    TenGod::ZhengCai,
    TenGod::QiSha,
    TenGod::ZhengGuan,
    TenGod::PianYin,
    TenGod::ZhengYin,
];

impl TenGod {
    /// Chinese name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BiJian => "比肩",
            Self::JieCai => "劫财",
            Self::ShiShen => "食神",
            Self::ShangGuan => "伤官",
            Self::PianCai => "偏财",
            Self::ZhengCai => "正财",
            Self::QiSha => "七杀",
            Self::ZhengGuan => "正官",
            Self::PianYin => "偏印",
            Self::ZhengYin => "正印",
        }
    }

    /// Bucket the god aggregates into.
    pub const fn bucket(self) -> Bucket {
        match self {
            Self::BiJian | Self::JieCai => Bucket::BiJie,
            Self::ShiShen | Self::ShangGuan => Bucket::ShiShang,
            Self::PianCai | Self::ZhengCai => Bucket::Cai,
            Self::QiSha | Self::ZhengGuan => Bucket::Guan,
            Self::PianYin | Self::ZhengYin => Bucket::Yin,
        }
    }

    /// Parse a Chinese name; 偏官 is accepted for 七杀.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "偏官" {
            return Some(Self::QiSha);
        }
        ALL_TEN_GODS.iter().copied().find(|g| g.name() == name)
    }
}

impl Serialize for TenGod {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// Ten god of `target` seen from the day master `dm`.
pub const fn ten_god(dm: Stem, target: Stem) -> TenGod {
    let same_parity = dm.index() % 2 == target.index() % 2;
    match ElementRelation::between(dm.element(), target.element()) {
        ElementRelation::Same => {
            if same_parity { TenGod::BiJian } else { TenGod::JieCai }
        }
        ElementRelation::Generates => {
            if same_parity { TenGod::ShiShen } else { TenGod::ShangGuan }
        }
        ElementRelation::Overcomes => {
            if same_parity { TenGod::PianCai } else { TenGod::ZhengCai }
        }
        ElementRelation::OvercomeBy => {
            if same_parity { TenGod::QiSha } else { TenGod::ZhengGuan }
        }
        ElementRelation::GeneratedBy => {
            if same_parity { TenGod::PianYin } else { TenGod::ZhengYin }
        }
    }
}

/// The five ten-god buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// 官: 正官 + 七杀.
    Guan,
    /// 财: 正财 + 偏财.
    Cai,
    /// 食伤: 食神 + 伤官.
    ShiShang,
    /// 比劫: 比肩 + 劫财.
    BiJie,
    /// 印: 正印 + 偏印.
    Yin,
}

/// All buckets in [`TenGodWeights`] field order.
pub const ALL_BUCKETS: [Bucket; 5] = [
    Bucket::Guan,
    Bucket::Cai,
    Bucket::ShiShang,
    Bucket::BiJie,
    Bucket::Yin,
];

impl Bucket {
    /// Stable snake_case code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Guan => "guan",
            Self::Cai => "cai",
            Self::ShiShang => "shishang",
            Self::BiJie => "bijie",
            Self::Yin => "yin",
        }
    }

    /// Chinese name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Guan => "官",
            Self::Cai => "财",
            Self::ShiShang => "食伤",
            Self::BiJie => "比劫",
            Self::Yin => "印",
        }
    }

    /// Element relation to the day master shared by the bucket's gods.
    pub const fn relation(self) -> ElementRelation {
        match self {
            Self::Guan => ElementRelation::OvercomeBy,
            Self::Cai => ElementRelation::Overcomes,
            Self::ShiShang => ElementRelation::Generates,
            Self::BiJie => ElementRelation::Same,
            Self::Yin => ElementRelation::GeneratedBy,
        }
    }

    /// Bucket for an element relation.
    pub const fn of_relation(rel: ElementRelation) -> Self {
        match rel {
            ElementRelation::OvercomeBy => Self::Guan,
            ElementRelation::Overcomes => Self::Cai,
            ElementRelation::Generates => Self::ShiShang,
            ElementRelation::Same => Self::BiJie,
            ElementRelation::GeneratedBy => Self::Yin,
        }
    }

    /// Parse a snake_case code.
    pub fn from_code(code: &str) -> Option<Self> {
        ALL_BUCKETS.iter().copied().find(|b| b.code() == code)
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Aggregate weight per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TenGodWeights {
    pub guan: f64,
    pub cai: f64,
    pub shishang: f64,
    pub bijie: f64,
    pub yin: f64,
}

impl TenGodWeights {
    pub const fn get(&self, bucket: Bucket) -> f64 {
        match bucket {
            Bucket::Guan => self.guan,
            Bucket::Cai => self.cai,
            Bucket::ShiShang => self.shishang,
            Bucket::BiJie => self.bijie,
            Bucket::Yin => self.yin,
        }
    }

    fn slot(&mut self, bucket: Bucket) -> &mut f64 {
        match bucket {
            Bucket::Guan => &mut self.guan,
            Bucket::Cai => &mut self.cai,
            Bucket::ShiShang => &mut self.shishang,
            Bucket::BiJie => &mut self.bijie,
            Bucket::Yin => &mut self.yin,
        }
    }

    pub fn add(&mut self, bucket: Bucket, w: f64) {
        *self.slot(bucket) += w;
    }

    pub fn total(&self) -> f64 {
        ALL_BUCKETS.iter().map(|b| self.get(*b)).sum()
    }

    /// Buckets ordered by weight, heaviest first; ties keep field order.
    pub fn ranked(&self) -> [(Bucket, f64); 5] {
        let mut out = ALL_BUCKETS.map(|b| (b, self.get(b)));
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }
}

/// One classified stem occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TenGodEntry {
    pub position: Position,
    pub stem: Stem,
    /// Hidden in the branch rather than on the stem.
    pub hidden: bool,
    pub ten_god: TenGod,
    pub weight: f64,
}

/// All classified stems of a chart and their aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenGodProfile {
    pub day_master: Stem,
    pub entries: Vec<TenGodEntry>,
    pub by_god: BTreeMap<TenGod, f64>,
    pub weights: TenGodWeights,
}

impl TenGodProfile {
    /// Classify and weight every non-day-master stem of `pillars`.
    pub fn compute(pillars: &FourPillars) -> Self {
        let dm = pillars.day_master();
        let month_branch = pillars.month.branch;
        let mut entries = Vec::with_capacity(14);

        for (pos, gz) in pillars.iter() {
            let place = place_boost(pos);
            if pos != Position::Day {
                entries.push(entry(dm, month_branch, pos, gz.stem, false, VISIBLE_STEM_WEIGHT * place));
            }
            for h in hidden_stems(gz.branch) {
                entries.push(entry(dm, month_branch, pos, h.stem, true, h.dominance * place));
            }
        }

        let mut by_god = BTreeMap::new();
        let mut weights = TenGodWeights::default();
        for e in &entries {
            *by_god.entry(e.ten_god).or_insert(0.0) += e.weight;
            weights.add(e.ten_god.bucket(), e.weight);
        }
        Self {
            day_master: dm,
            entries,
            by_god,
            weights,
        }
    }

    /// Weight of a single god (0 when absent).
    pub fn god_weight(&self, god: TenGod) -> f64 {
        self.by_god.get(&god).copied().unwrap_or(0.0)
    }

    /// Whether `god` appears on a visible stem.
    pub fn is_revealed(&self, god: TenGod) -> bool {
        self.entries.iter().any(|e| !e.hidden && e.ten_god == god)
    }

    /// Whether any god of `bucket` appears on a visible stem.
    pub fn bucket_revealed(&self, bucket: Bucket) -> bool {
        self.entries
            .iter()
            .any(|e| !e.hidden && e.ten_god.bucket() == bucket)
    }

    /// Visible stem gods by position (the day position has none).
    pub fn visible(&self, pos: Position) -> Option<TenGod> {
        self.entries
            .iter()
            .find(|e| !e.hidden && e.position == pos)
            .map(|e| e.ten_god)
    }
}

/// Place boost of a pillar position.
pub const fn place_boost(pos: Position) -> f64 {
    match pos {
        Position::Month => MONTH_PLACE_BOOST,
        Position::Day => DAY_PLACE_BOOST,
        Position::Year | Position::Hour => 1.0,
    }
}

/// Season factor in [0.76, 1.3] for a stem under `month_branch`.
pub fn season_factor(month_branch: Branch, stem: Stem) -> f64 {
    0.7 + 0.6 * season_score(month_branch, stem.element())
}

fn entry(
    dm: Stem,
    month_branch: Branch,
    position: Position,
    stem: Stem,
    hidden: bool,
    base: f64,
) -> TenGodEntry {
    TenGodEntry {
        position,
        stem,
        hidden,
        ten_god: ten_god(dm, stem),
        weight: base * season_factor(month_branch, stem),
    }
}
