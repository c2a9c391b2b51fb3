//! Luck-cycle records.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::ganzhi::GanZhi;
use crate::pillars::Position;
use crate::relations::BranchRelation;
use crate::ten_god::TenGod;

/// Stepping direction through the sixty pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Forward => "顺",
            Self::Reverse => "逆",
        }
    }

    /// +1 or −1.
    pub const fn step(self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
        })
    }
}

/// Coarse favour of a period against the yongshen lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawFavour {
    Yong,
    Neutral,
    Ji,
}

impl RawFavour {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Yong => "用神",
            Self::Neutral => "中性",
            Self::Ji => "忌神",
        }
    }

    /// +1, 0 or −1.
    pub const fn sign(self) -> f64 {
        match self {
            Self::Yong => 1.0,
            Self::Neutral => 0.0,
            Self::Ji => -1.0,
        }
    }
}

impl Serialize for RawFavour {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// Display level of a luck cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FavourLevel {
    Good,
    Wave,
    Flat,
}

impl FavourLevel {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Wave => "wave",
            Self::Flat => "flat",
        }
    }
}

/// Branch relations between a period's branch and one natal pillar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatalRelation {
    pub position: Position,
    pub relations: Vec<BranchRelation>,
}

/// When the first cycle begins (起运).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuckStart {
    pub direction: Direction,
    /// Days from birth to the governing jie.
    pub days: f64,
    pub years: u32,
    pub months: u32,
    pub extra_days: u32,
    /// Birth falls on the jie itself: the first cycle is the month pillar.
    pub on_jie: bool,
    /// Local clock instant the first cycle begins.
    pub instant: NaiveDateTime,
}

/// One ten-year luck cycle (大运).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuckCycle {
    pub index: u8,
    pub ganzhi: GanZhi,
    /// Ten god of the cycle stem.
    pub ten_god: TenGod,
    /// Inclusive.
    pub start_age: u32,
    /// Exclusive.
    pub end_age: u32,
    pub start_year: i32,
    pub end_year: i32,
    pub raw_favour: RawFavour,
    /// In [−2, 2].
    pub favour_score: f64,
    pub natal_relations: Vec<NatalRelation>,
}

/// Luck start and its cycles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuckTimeline {
    pub start: LuckStart,
    pub cycles: Vec<LuckCycle>,
}

impl LuckTimeline {
    /// Cycle covering `age`.
    pub fn cycle_at_age(&self, age: u32) -> Option<&LuckCycle> {
        self.cycles
            .iter()
            .find(|c| c.start_age <= age && age < c.end_age)
    }
}
