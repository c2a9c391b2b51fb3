//! Dominant structure (格局), pattern-breaking factors (破格) and the
//! career/wealth stability classification built on them.

pub mod poge;
pub mod stability;

use serde::Serialize;

use crate::pillars::FourPillars;
use crate::relations::lu_branch;
use crate::ten_god::{Bucket, TenGod, TenGodProfile, TenGodWeights};

pub use poge::{PogeCategory, PogeFactor, PogeKind, PogeSpan, Severity, analyze_poge};
pub use stability::{
    CategoryStability, IncomeMode, Rooting, ScoredLevel, StabilityClassification,
    classify_stability,
};

/// Below this total weight the chart has no usable structure.
const DEGENERATE_TOTAL: f64 = 1e-9;

/// Name used when no bucket carries weight.
pub const UNDETERMINED: &str = "未定格";

/// Dominant structure of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructurePattern {
    /// 正官格, 七杀格, 建禄格, ...
    pub name: &'static str,
    /// Bucket the name was derived from.
    pub bucket: Option<Bucket>,
    /// `(top − second) / top`; `None` when every bucket is empty.
    pub confidence: Option<f64>,
    pub weights: TenGodWeights,
}

impl StructurePattern {
    /// Element of the structure's bucket seen from the day master.
    pub fn element(&self, pillars: &FourPillars) -> Option<crate::element::Element> {
        self.bucket
            .map(|b| b.relation().element_for(pillars.day_master().element()))
    }
}

/// Pick the heavier member of a bucket's pair.
fn refine(profile: &TenGodProfile, a: TenGod, b: TenGod) -> TenGod {
    if profile.god_weight(b) > profile.god_weight(a) { b } else { a }
}

fn pattern_name(pillars: &FourPillars, profile: &TenGodProfile, bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Guan => match refine(profile, TenGod::ZhengGuan, TenGod::QiSha) {
            TenGod::QiSha => "七杀格",
            _ => "正官格",
        },
        Bucket::Cai => match refine(profile, TenGod::ZhengCai, TenGod::PianCai) {
            TenGod::PianCai => "偏财格",
            _ => "正财格",
        },
        Bucket::ShiShang => match refine(profile, TenGod::ShiShen, TenGod::ShangGuan) {
            TenGod::ShangGuan => "伤官格",
            _ => "食神格",
        },
        Bucket::Yin => match refine(profile, TenGod::ZhengYin, TenGod::PianYin) {
            TenGod::PianYin => "偏印格",
            _ => "正印格",
        },
        Bucket::BiJie => {
            if lu_branch(pillars.day_master()) == pillars.month.branch {
                "建禄格"
            } else {
                "比劫格"
            }
        }
    }
}

/// Determine the dominant structure from the bucket weights.
pub fn determine_structure(pillars: &FourPillars, profile: &TenGodProfile) -> StructurePattern {
    let weights = profile.weights;
    let ranked = weights.ranked();
    let (top_bucket, top) = ranked[0];
    let second = ranked[1].1;

    let pattern = if top <= DEGENERATE_TOTAL {
        StructurePattern {
            name: UNDETERMINED,
            bucket: None,
            confidence: None,
            weights,
        }
    } else {
        StructurePattern {
            name: pattern_name(pillars, profile, top_bucket),
            bucket: Some(top_bucket),
            confidence: Some(((top - second) / top).clamp(0.0, 1.0)),
            weights,
        }
    };
    tracing::debug!(name = pattern.name, confidence = ?pattern.confidence, "structure");
    pattern
}
