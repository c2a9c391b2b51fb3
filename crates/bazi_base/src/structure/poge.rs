//! Pattern-breaking factors (破格).
//!
//! Common factors are checked on every chart; pattern-specific ones only
//! when the structure name carries the matching marker character. Each
//! factor gets a severity score from its base score, where it sits (stem,
//! branch or both), how many life areas it touches and whether it overlaps
//! with at least two other factors.

use bazi_config::PogeConfig;
use serde::{Serialize, Serializer};

use crate::pillars::FourPillars;
use crate::relations::count_chong_pairs;
use crate::strength::DayMasterStrength;
use crate::structure::StructurePattern;
use crate::ten_god::{TenGod, TenGodProfile};

// ---------------------------------------------------------------------------
// Thresholds on ten-god weights
// ---------------------------------------------------------------------------

const MIXED_OFFICER_MIN: f64 = 0.5;
const YIN_BURY: f64 = 1.2;
const YIN_BURY_MAX_SCORE: f64 = 0.5;
const YIN_BURY_MAX_BI: f64 = 0.5;
const YIN_HEAVY: f64 = 1.5;
/// 偏印 dominates when it exceeds 正印 by this factor.
const PIAN_YIN_DOMINANCE: f64 = 1.2;
const PIAN_YIN_BURY_MIN: f64 = 0.8;
const PIAN_YIN_HEAVY_MIN: f64 = 1.0;
const CAI_HEAVY: f64 = 1.0;
const CAI_HEAVY_MAX_BI: f64 = 0.4;
const SHI_OVERFLOW: f64 = 1.5;
const SHI_OVERFLOW_VS_SCORE: f64 = 1.8;
const SHI_OVERFLOW_VS_OTHERS: f64 = 1.4;
const SHI_LEANING: f64 = 1.3;
const SHI_LEANING_VS_SCORE: f64 = 1.4;
const BI_CROWD: f64 = 1.5;
const MAX_CHONG_PAIRS: usize = 2;

const SHANG_SEES_GUAN_MIN_SHANG: f64 = 0.5;
const SHANG_SEES_GUAN_MAX_YIN: f64 = 0.3;
const BI_ROBS_CAI_MIN_BI: f64 = 0.7;
const BI_ROBS_CAI_MAX_GUAN: f64 = 0.4;
const CAI_BREAKS_YIN_MIN_CAI: f64 = 0.8;
const CAI_BREAKS_YIN_MAX_BI: f64 = 0.4;
const XIAO_STEALS_MIN_PIAN_YIN: f64 = 0.6;
const XIAO_STEALS_MAX_CAI: f64 = 0.4;

/// Factors overlapping with at least this many others count as a combination.
const COMBO_MIN_OVERLAPS: usize = 2;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// Where a factor sits in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PogeSpan {
    Stem,
    Branch,
    Both,
}

impl PogeSpan {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stem => "天干",
            Self::Branch => "地支",
            Self::Both => "天干地支",
        }
    }

    fn weight(self, cfg: &PogeConfig) -> f64 {
        match self {
            Self::Stem => cfg.stem_weight,
            Self::Branch => cfg.branch_weight,
            Self::Both => cfg.both_weight,
        }
    }
}

impl Serialize for PogeSpan {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// Every pattern-breaking factor the engine recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PogeKind {
    GuanShaHunZa,
    XiaoYinMaiShen,
    YinZhongShenMai,
    XiaoYinTaiWang,
    YinXingGuoZhong,
    CaiDuoShenRuo,
    ShiShangGuoWang,
    ShiShangPianWang,
    BiJieChengQun,
    GenQiShouSun,
    ShangGuanJianGuan,
    BiJieDuoCai,
    CaiXingHuaiYin,
    XiaoShenDuoShi,
}

impl PogeKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::GuanShaHunZa => "官杀混杂",
            Self::XiaoYinMaiShen => "枭印太旺（身埋）",
            Self::YinZhongShenMai => "印重身埋",
            Self::XiaoYinTaiWang => "枭印太旺",
            Self::YinXingGuoZhong => "印星过重",
            Self::CaiDuoShenRuo => "财多身弱",
            Self::ShiShangGuoWang => "食伤过旺",
            Self::ShiShangPianWang => "食伤偏旺",
            Self::BiJieChengQun => "比劫成群",
            Self::GenQiShouSun => "根气受损",
            Self::ShangGuanJianGuan => "伤官见官",
            Self::BiJieDuoCai => "比劫夺财",
            Self::CaiXingHuaiYin => "财星坏印",
            Self::XiaoShenDuoShi => "枭神夺食",
        }
    }

    pub const fn span(self) -> PogeSpan {
        match self {
            Self::GuanShaHunZa | Self::ShangGuanJianGuan | Self::XiaoShenDuoShi => PogeSpan::Stem,
            Self::GenQiShouSun => PogeSpan::Branch,
            _ => PogeSpan::Both,
        }
    }

    /// Base severity before weighting.
    pub const fn base_score(self) -> f64 {
        match self {
            Self::GuanShaHunZa => 1.5,
            Self::XiaoYinMaiShen | Self::YinZhongShenMai => 1.4,
            Self::XiaoYinTaiWang | Self::YinXingGuoZhong => 1.2,
            Self::CaiDuoShenRuo => 1.4,
            Self::ShiShangGuoWang => 1.3,
            Self::ShiShangPianWang => 0.8,
            Self::BiJieChengQun => 1.3,
            Self::GenQiShouSun => 1.4,
            Self::ShangGuanJianGuan => 1.8,
            Self::BiJieDuoCai => 1.6,
            Self::CaiXingHuaiYin => 1.7,
            Self::XiaoShenDuoShi => 1.9,
        }
    }

    /// Life areas the factor touches.
    pub const fn impact_areas(self) -> &'static [&'static str] {
        match self {
            Self::GuanShaHunZa => &["事业", "心性", "决策"],
            Self::XiaoYinMaiShen | Self::YinZhongShenMai => &["性格", "行动力", "决策"],
            Self::XiaoYinTaiWang | Self::YinXingGuoZhong => &["性格", "行动力"],
            Self::CaiDuoShenRuo => &["财运", "健康", "压力"],
            Self::ShiShangGuoWang => &["人际", "口舌", "是非"],
            Self::ShiShangPianWang => &["人际", "口舌"],
            Self::BiJieChengQun => &["财运", "人际", "竞争"],
            Self::GenQiShouSun => &["健康", "稳定性", "根基"],
            Self::ShangGuanJianGuan => &["事业", "官运", "名声"],
            Self::BiJieDuoCai => &["财运", "合作", "竞争"],
            Self::CaiXingHuaiYin => &["学业", "事业", "贵人"],
            Self::XiaoShenDuoShi => &["才华", "表现", "收入"],
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::GuanShaHunZa => "正官七杀同时出现，心性不定，事业多变",
            Self::XiaoYinMaiShen => "偏印过多埋没日主，思虑过多缺乏行动",
            Self::YinZhongShenMai => "印星过多埋没日主，思虑过多缺乏行动",
            Self::XiaoYinTaiWang => "偏印过旺，思虑过多，需要比劫或财星平衡",
            Self::YinXingGuoZhong => "印星过旺，思虑过多，需要比劫或财星平衡",
            Self::CaiDuoShenRuo => "财星过旺而日主过弱，难以承担财富",
            Self::ShiShangGuoWang => "食伤过多且透干，言多必失，易招是非",
            Self::ShiShangPianWang => "食伤略多，需注意言行，避免口舌是非",
            Self::BiJieChengQun => "比劫过多，竞争激烈，财运受损",
            Self::GenQiShouSun => "日主根基被冲刑破坏，稳定性差",
            Self::ShangGuanJianGuan => "伤官克官星，且无印星制伤，官运受损",
            Self::BiJieDuoCai => "比劫夺财，且无官杀制比劫，财运受损",
            Self::CaiXingHuaiYin => "财星克印星，且无比劫解救，学业事业受阻",
            Self::XiaoShenDuoShi => "偏印克食神，且无财星制印，才华难展",
        }
    }

    /// Category by fixed vocabulary, then by marker characters in the name.
    pub fn category(self) -> PogeCategory {
        PogeCategory::of_name(self.name())
    }
}

impl Serialize for PogeKind {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Categories and severity
// ---------------------------------------------------------------------------

/// Which stability axis a factor weighs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PogeCategory {
    Officer,
    Wealth,
    Common,
}

const OFFICER_VOCABULARY: &[&str] = &["官杀混杂", "伤官见官", "杀重无制"];
const WEALTH_VOCABULARY: &[&str] = &["财多身弱", "比劫夺财", "比劫成群", "财星坏印"];
const OFFICER_MARKERS: &[&str] = &["官", "殺", "杀"];
const WEALTH_MARKERS: &[&str] = &["財", "财", "比劫"];

impl PogeCategory {
    /// Classify a factor name.
    pub fn of_name(name: &str) -> Self {
        if OFFICER_VOCABULARY.contains(&name) {
            Self::Officer
        } else if WEALTH_VOCABULARY.contains(&name) {
            Self::Wealth
        } else if OFFICER_MARKERS.iter().any(|m| name.contains(m)) {
            Self::Officer
        } else if WEALTH_MARKERS.iter().any(|m| name.contains(m)) {
            Self::Wealth
        } else {
            Self::Common
        }
    }
}

/// Severity level of a factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Minor,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Minor => "微瑕",
            Self::Mild => "轻微",
            Self::Moderate => "中等",
            Self::Severe => "严重",
        }
    }

    pub const fn suggestion(self) -> &'static str {
        match self {
            Self::Minor => "可以忽略",
            Self::Mild => "略有瑕疵，影响不大",
            Self::Moderate => "有一定影响，需注意防范",
            Self::Severe => "需大运解救，否则影响重大",
        }
    }

    pub fn from_score(score: f64, cfg: &PogeConfig) -> Self {
        if score >= cfg.severe {
            Self::Severe
        } else if score >= cfg.moderate {
            Self::Moderate
        } else if score >= cfg.mild {
            Self::Mild
        } else {
            Self::Minor
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// One detected pattern-breaking factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PogeFactor {
    pub kind: PogeKind,
    pub category: PogeCategory,
    pub span: PogeSpan,
    pub impact_areas: &'static [&'static str],
    pub description: &'static str,
    /// Overlaps with at least two other factors.
    pub combo: bool,
    pub score: f64,
    pub severity: Severity,
}

impl PogeFactor {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

fn common_factors(
    pillars: &FourPillars,
    profile: &TenGodProfile,
    strength: &DayMasterStrength,
) -> Vec<PogeKind> {
    let w = &profile.weights;
    let zheng_guan = profile.god_weight(TenGod::ZhengGuan);
    let qi_sha = profile.god_weight(TenGod::QiSha);
    let zheng_yin = profile.god_weight(TenGod::ZhengYin);
    let pian_yin = profile.god_weight(TenGod::PianYin);
    let score = strength.score;
    let mut out = Vec::new();

    if zheng_guan > MIXED_OFFICER_MIN && qi_sha > MIXED_OFFICER_MIN {
        out.push(PogeKind::GuanShaHunZa);
    }

    let pian_dominant = pian_yin > zheng_yin * PIAN_YIN_DOMINANCE;
    if w.yin > YIN_BURY {
        if score < YIN_BURY_MAX_SCORE && w.bijie < YIN_BURY_MAX_BI {
            out.push(if pian_dominant && pian_yin > PIAN_YIN_BURY_MIN {
                PogeKind::XiaoYinMaiShen
            } else {
                PogeKind::YinZhongShenMai
            });
        } else if w.yin > YIN_HEAVY {
            out.push(if pian_dominant && pian_yin > PIAN_YIN_HEAVY_MIN {
                PogeKind::XiaoYinTaiWang
            } else {
                PogeKind::YinXingGuoZhong
            });
        }
    }

    if w.cai > CAI_HEAVY && w.bijie < CAI_HEAVY_MAX_BI {
        out.push(PogeKind::CaiDuoShenRuo);
    }

    let shi_revealed =
        profile.is_revealed(TenGod::ShiShen) || profile.is_revealed(TenGod::ShangGuan);
    let main_others = w.guan.max(w.cai).max(w.yin);
    if shi_revealed
        && w.shishang > SHI_OVERFLOW
        && w.shishang > score * SHI_OVERFLOW_VS_SCORE
        && w.shishang > main_others * SHI_OVERFLOW_VS_OTHERS
    {
        out.push(PogeKind::ShiShangGuoWang);
    } else if shi_revealed && w.shishang > SHI_LEANING && w.shishang > score * SHI_LEANING_VS_SCORE
    {
        out.push(PogeKind::ShiShangPianWang);
    }

    if w.bijie > BI_CROWD {
        out.push(PogeKind::BiJieChengQun);
    }

    if count_chong_pairs(&pillars.branches()) > MAX_CHONG_PAIRS {
        out.push(PogeKind::GenQiShouSun);
    }
    out
}

fn pattern_factors(profile: &TenGodProfile, structure: &StructurePattern) -> Vec<PogeKind> {
    let w = &profile.weights;
    let name = structure.name;
    let cong = name.contains('从');
    let mut out = Vec::new();

    if name.contains('官')
        && !cong
        && profile.god_weight(TenGod::ShangGuan) > SHANG_SEES_GUAN_MIN_SHANG
        && w.yin < SHANG_SEES_GUAN_MAX_YIN
    {
        out.push(PogeKind::ShangGuanJianGuan);
    }
    if name.contains('财') && !cong && w.bijie > BI_ROBS_CAI_MIN_BI && w.guan < BI_ROBS_CAI_MAX_GUAN
    {
        out.push(PogeKind::BiJieDuoCai);
    }
    if name.contains('印')
        && !cong
        && w.cai > CAI_BREAKS_YIN_MIN_CAI
        && w.bijie < CAI_BREAKS_YIN_MAX_BI
    {
        out.push(PogeKind::CaiXingHuaiYin);
    }
    if name.contains("食神")
        && profile.god_weight(TenGod::PianYin) > XIAO_STEALS_MIN_PIAN_YIN
        && w.cai < XIAO_STEALS_MAX_CAI
    {
        out.push(PogeKind::XiaoShenDuoShi);
    }
    out
}

fn overlaps(a: PogeKind, b: PogeKind) -> bool {
    a.impact_areas().iter().any(|x| b.impact_areas().contains(x))
}

/// Detect and grade every pattern-breaking factor of a chart.
pub fn analyze_poge(
    pillars: &FourPillars,
    profile: &TenGodProfile,
    structure: &StructurePattern,
    strength: &DayMasterStrength,
    cfg: &PogeConfig,
) -> Vec<PogeFactor> {
    let mut kinds = common_factors(pillars, profile, strength);
    kinds.extend(pattern_factors(profile, structure));

    kinds
        .iter()
        .map(|&kind| {
            let others = kinds
                .iter()
                .filter(|&&k| k != kind && overlaps(kind, k))
                .count();
            let combo = others >= COMBO_MIN_OVERLAPS;
            let mut score = kind.base_score()
                * kind.span().weight(cfg)
                * (1.0 + cfg.impact_factor * kind.impact_areas().len() as f64);
            if combo {
                score *= cfg.combo_multiplier;
            }
            PogeFactor {
                kind,
                category: kind.category(),
                span: kind.span(),
                impact_areas: kind.impact_areas(),
                description: kind.description(),
                combo,
                score,
                severity: Severity::from_score(score, cfg),
            }
        })
        .collect()
}
