//! Luck cycles (大运), their display views, flowing periods and
//! scenario favorability windows.

pub mod adapter;
pub mod dayun;
pub mod flow;
pub mod types;
pub mod window;

pub use adapter::{LuckCycleView, build_views, favour_level, keywords, tone_tag};
pub use dayun::{direction, favour_score, luck_cycles, luck_start, natal_relations, raw_favour};
pub use flow::{FlowPeriod, flow_month, flow_months, flow_year};
pub use types::{
    Direction, FavourLevel, LuckCycle, LuckStart, LuckTimeline, NatalRelation, RawFavour,
};
pub use window::{
    ALL_SCENARIOS, FavorabilityWindow, Scenario, ScenarioKind, WindowLevel, WindowReason,
    favorability_window, favorability_windows,
};
