//! Convenience wrapper for the four-pillars chart engine.
//!
//! Provides a global engine with a memoized chart cache and one-call
//! functions that take a [`BirthInfo`] directly, so callers never thread an
//! engine handle or a config through their code.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use bazi_rs::*;
//!
//! init(EngineConfig::default()).expect("engine init");
//!
//! let birth = BirthInfo::builder()
//!     .sex(Sex::Female)
//!     .solar_date(2025, 6, 20)
//!     .time(8, 0)
//!     .build()
//!     .unwrap();
//! let c = chart(&birth).unwrap();
//! println!("{} {} {} {}", c.pillars.year, c.pillars.month, c.pillars.day, c.pillars.hour);
//!
//! for w in windows(&birth, ScenarioKind::Marriage, 2025, 2030).unwrap() {
//!     println!("{} {:?} {}", w.year, w.level, w.reason.summary);
//! }
//! ```

pub mod convenience;
pub mod engine;
pub mod error;
pub mod global;

pub use convenience::{chart, luck, lunar, pillars, query, solar, solar_terms, windows, year_view};
pub use engine::{BirthKey, ChartEngine, DEFAULT_CACHE_CAPACITY};
pub use error::BaziError;
pub use global::{engine, init, init_default, is_initialized};

// Re-export the chart types so callers only need `use bazi_rs::*`.
pub use bazi_base::{
    BirthInfo, Branch, CalendarKind, Chart, ChartError, ChartQuery, DayBoundary,
    FavorabilityWindow, FourPillars, GanZhi, LuckCycle, LuckCycleView, LuckTimeline,
    QueryResult, ReferenceYear, ScenarioKind, Sex, Stem, TrueSolarTime, WindowLevel,
};
pub use bazi_config::{ConfigError, EngineConfig};
pub use bazi_time::{LunarDate, SolarTerm, TermInstant, UtcOffset};
