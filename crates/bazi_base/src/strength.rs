//! Day-master strength (日主强弱).
//!
//! Three signals feed one weighted sum:
//! - seasonal support: the 旺相休囚死 score of the day master's element;
//! - rooting: hidden stems of the day master's element (or its mother) in
//!   the branches, plus a bonus when the day branch itself is home ground;
//! - help against drain: 比劫/印 weights versus 官杀/财/食伤 weights, with
//!   印 softening the drain.
//!
//! The score maps to five bands. 从强 and 从弱 are gated tails: a score in
//! the tail that fails its gate falls back to 身强 / 身弱.

use bazi_config::StrengthConfig;
use serde::{Serialize, Serializer};

use crate::element::ElementRelation;
use crate::ganzhi::Branch;
use crate::hidden::hidden_stems;
use crate::pillars::FourPillars;
use crate::ten_god::{TenGodProfile, place_boost};
use crate::wangxiang::season_score;

/// Root weight of a hidden stem identical to the day master.
const ROOT_SAME_STEM: f64 = 1.0;
/// Root weight of a hidden stem of the day master's element.
const ROOT_SAME_ELEMENT: f64 = 0.6;
/// Root weight of a hidden stem generating the day master.
const ROOT_MOTHER: f64 = 0.3;

/// Day-branch bonus when the branch element is the day master's.
const DAY_BRANCH_HOME: f64 = 0.8;
/// Day-branch bonus when only a hidden stem matches.
const DAY_BRANCH_HIDDEN: f64 = 0.4;
/// Scale applied to the day-branch bonus.
const DAY_BRANCH_SCALE: f64 = 0.5;

const BI_COEF: f64 = 0.8;
const PRINT_COEF: f64 = 0.85;
const GUAN_DRAIN: f64 = 0.85;
const CAI_DRAIN: f64 = 0.75;
const SHISHANG_DRAIN: f64 = 0.55;

/// 印 softens drain by `min(PRINT_MITIGATION_CAP, PRINT_MITIGATION × print)`.
const PRINT_MITIGATION: f64 = 0.35;
const PRINT_MITIGATION_CAP: f64 = 0.30;

/// Hidden officer stems below this dominance are not roots.
const OFFICER_ROOT_MIN_DOMINANCE: f64 = 0.2;

/// 从强 needs seasonal support or rooting at least this high.
const CONG_QIANG_MIN_MONTH: f64 = 0.7;
const CONG_QIANG_MIN_ROOT: f64 = 0.9;
/// 从弱 needs seasonal support and rooting at most this high.
const CONG_RUO_MAX_MONTH: f64 = 0.4;
const CONG_RUO_MAX_ROOT: f64 = 0.6;

/// Qualitative factor thresholds (得令, 得地, 得生, 得助).
const DE_LING: f64 = 0.4;
const DE_DI: f64 = 0.3;
const DE_SHENG: f64 = 0.2;
const DE_ZHU: f64 = 0.15;

/// Five strength bands, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrengthBand {
    CongRuo,
    ShenRuo,
    PingHeng,
    ShenQiang,
    CongQiang,
}

impl StrengthBand {
    /// Chinese name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CongRuo => "从弱",
            Self::ShenRuo => "身弱",
            Self::PingHeng => "平衡",
            Self::ShenQiang => "身强",
            Self::CongQiang => "从强",
        }
    }

    /// 从强 or 从弱.
    pub const fn is_tail(self) -> bool {
        matches!(self, Self::CongRuo | Self::CongQiang)
    }
}

impl Serialize for StrengthBand {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// Signals behind the score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthDetail {
    /// Seasonal support of the day master (0.1–1.0).
    pub w_month: f64,
    /// Rooting sum.
    pub root: f64,
    /// `bi_power + print_power`.
    pub help: f64,
    /// Raw drain of 官杀, 财 and 食伤.
    pub drain: f64,
    /// Drain after 印 mitigation.
    pub drain_eff: f64,
    pub bi_power: f64,
    pub print_power: f64,
    /// An officer element stands in a branch or its stronger hidden stems.
    pub officer_root: bool,
    /// 得令 / 得地 / 得生 / 得助 that apply.
    pub factors: Vec<&'static str>,
}

/// Day-master strength score and band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayMasterStrength {
    pub score: f64,
    pub band: StrengthBand,
    pub detail: StrengthDetail,
}

fn rooting(pillars: &FourPillars) -> f64 {
    let dm = pillars.day_master();
    let dm_el = dm.element();
    let mut root = 0.0;
    for (pos, gz) in pillars.iter() {
        let place = place_boost(pos);
        for h in hidden_stems(gz.branch) {
            let k = if h.stem == dm {
                ROOT_SAME_STEM
            } else if h.stem.element() == dm_el {
                ROOT_SAME_ELEMENT
            } else if h.stem.element() == dm_el.generated_by() {
                ROOT_MOTHER
            } else {
                continue;
            };
            root += k * h.dominance * place;
        }
    }
    root + DAY_BRANCH_SCALE * day_branch_bonus(pillars)
}

fn day_branch_bonus(pillars: &FourPillars) -> f64 {
    let dm_el = pillars.day_master().element();
    let day = pillars.day.branch;
    if day.element() == dm_el {
        DAY_BRANCH_HOME
    } else if hidden_stems(day).iter().any(|h| h.stem.element() == dm_el) {
        DAY_BRANCH_HIDDEN
    } else {
        0.0
    }
}

/// Whether the officer element (克我) is rooted in any branch.
pub fn has_officer_root(pillars: &FourPillars) -> bool {
    let officer = ElementRelation::OvercomeBy.element_for(pillars.day_master().element());
    pillars.branches().iter().any(|b: &Branch| {
        b.element() == officer
            || hidden_stems(*b)
                .iter()
                .any(|h| h.stem.element() == officer && h.dominance >= OFFICER_ROOT_MIN_DOMINANCE)
    })
}

fn saturate(x: f64, scale: f64) -> f64 {
    (x / scale).clamp(0.0, 1.0)
}

/// Score and band the day master of `pillars`.
pub fn day_master_strength(
    pillars: &FourPillars,
    profile: &TenGodProfile,
    cfg: &StrengthConfig,
) -> DayMasterStrength {
    let w_month = season_score(pillars.month.branch, pillars.day_master().element());
    let root = rooting(pillars);

    let w = &profile.weights;
    let bi_power = BI_COEF * w.bijie;
    let print_power = PRINT_COEF * w.yin;
    let help = bi_power + print_power;
    let drain = GUAN_DRAIN * w.guan + CAI_DRAIN * w.cai + SHISHANG_DRAIN * w.shishang;
    let drain_eff = drain * (1.0 - (PRINT_MITIGATION * print_power).min(PRINT_MITIGATION_CAP));

    let raw = cfg.w_month * w_month + cfg.w_root * saturate(root, cfg.root_saturation)
        + cfg.w_help * saturate(help, cfg.help_saturation)
        - cfg.w_drain * saturate(drain_eff, cfg.drain_saturation)
        + cfg.bias;
    let score = if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.5 };

    let officer_root = has_officer_root(pillars);
    let band = if score >= cfg.cong_qiang {
        let gate = help >= cfg.cong_ratio * drain_eff
            && drain_eff <= cfg.cong_qiang_max_drain
            && (w_month >= CONG_QIANG_MIN_MONTH || root >= CONG_QIANG_MIN_ROOT)
            && !officer_root;
        if gate { StrengthBand::CongQiang } else { StrengthBand::ShenQiang }
    } else if score >= cfg.shen_qiang {
        StrengthBand::ShenQiang
    } else if score >= cfg.ping_heng {
        StrengthBand::PingHeng
    } else if score >= cfg.shen_ruo {
        StrengthBand::ShenRuo
    } else {
        let gate = drain_eff >= cfg.cong_ratio * help
            && help <= cfg.cong_ruo_max_help
            && w_month <= CONG_RUO_MAX_MONTH
            && root <= CONG_RUO_MAX_ROOT;
        if gate { StrengthBand::CongRuo } else { StrengthBand::ShenRuo }
    };

    let mut factors = Vec::new();
    if w_month > DE_LING {
        factors.push("得令");
    }
    if root > DE_DI {
        factors.push("得地");
    }
    if print_power > DE_SHENG {
        factors.push("得生");
    }
    if bi_power > DE_ZHU {
        factors.push("得助");
    }

    tracing::debug!(score, band = band.name(), w_month, root, help, drain_eff, "day master strength");
    DayMasterStrength {
        score,
        band,
        detail: StrengthDetail {
            w_month,
            root,
            help,
            drain,
            drain_eff,
            bi_power,
            print_power,
            officer_root,
            factors,
        },
    }
}
