//! Four-pillars (八字) chart derivation.
//!
//! This crate provides:
//! - Stems, branches, elements and their relation tables
//! - Pillar resolution from a birth instant, hidden stems and na-yin
//! - Ten-god weights, element distribution, seasonal states and the
//!   twelve life stages
//! - Shensha markers through one rule registry
//! - Day-master strength, structure with 破格 factors and stability
//! - Yongshen, climate adjustment (调候), palaces and the luck-cycle timeline
//! - Flowing years and scenario favorability windows
//!
//! Every operation is a pure function of its inputs and the static tables.

pub mod birth;
pub mod chart;
pub mod element;
pub mod error;
pub mod ganzhi;
pub mod hidden;
pub mod luck;
pub mod nayin;
pub mod palace;
pub mod pillars;
pub mod relations;
pub mod shensha;
pub mod stage12;
pub mod strength;
pub mod structure;
pub mod ten_god;
pub mod tiaohou;
pub mod wangxiang;
pub mod wuxing;
pub mod yongshen;

pub use birth::{BirthInfo, BirthInfoBuilder, CalendarKind, DayBoundary, Sex, TrueSolarTime};
pub use chart::{
    Chart, ChartQuery, HiddenDetail, PillarDetail, QueryResult, compute_chart, query,
};
pub use element::{ALL_ELEMENTS, ALL_RELATIONS, Element, ElementRelation, Polarity};
pub use error::ChartError;
pub use ganzhi::{
    ALL_BRANCHES, ALL_STEMS, Branch, GanZhi, Stem, hour_ganzhi, month_ganzhi, year_ganzhi,
};
pub use hidden::{HiddenStem, Qi, hidden_stems, main_qi};
pub use luck::{
    Direction, FavorabilityWindow, FavourLevel, FlowPeriod, LuckCycle, LuckCycleView, LuckStart,
    LuckTimeline, RawFavour, Scenario, ScenarioKind, WindowLevel, WindowReason,
    favorability_window,
};
pub use nayin::{nayin, nayin_element};
pub use palace::{Palace, PalaceRelation, Palaces, palaces};
pub use pillars::{
    ALL_POSITIONS, FourPillars, Position, ResolvedMoment, resolve_moment, resolve_pillars,
};
pub use relations::{BranchRelation, relations_between};
pub use shensha::{
    FloatingShensha, ReferenceYear, ShenshaCode, ShenshaHits, detect_floating, detect_static,
};
pub use strength::{DayMasterStrength, StrengthBand, StrengthDetail, day_master_strength};
pub use structure::{
    PogeCategory, PogeFactor, PogeKind, Severity, StabilityClassification, StructurePattern,
    analyze_poge, classify_stability, determine_structure,
};
pub use stage12::{ALL_LIFE_STAGES, LifeStage, life_stage};
pub use ten_god::{ALL_TEN_GODS, Bucket, TenGod, TenGodProfile, TenGodWeights, ten_god};
pub use tiaohou::{Climate, ClimateLevel, ClimateProfile, Season, Tiaohou, tiaohou};
pub use wangxiang::{SeasonState, seasonal_states};
pub use wuxing::ElementDistribution;
pub use yongshen::{Arrow, YongshenProfile, determine_yongshen};
