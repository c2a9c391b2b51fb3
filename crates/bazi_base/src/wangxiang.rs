//! Seasonal states (旺相休囚死) of the five elements under a month branch.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::element::{ALL_ELEMENTS, Element};
use crate::ganzhi::Branch;

/// Seasonal state of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeasonState {
    /// 旺: the season's own element.
    Wang,
    /// 相: generated by the season.
    Xiang,
    /// 休: generates the season.
    Xiu,
    /// 囚: overcome by the season.
    Qiu,
    /// 死: overcomes the season.
    Si,
}

impl SeasonState {
    /// State of `element` in a season governed by `season`.
    pub const fn of(season: Element, element: Element) -> Self {
        match (element.index() + 5 - season.index()) % 5 {
            0 => Self::Wang,
            1 => Self::Xiang,
            2 => Self::Qiu,
            3 => Self::Si,
            _ => Self::Xiu,
        }
    }

    /// Strength score in (0, 1].
    pub const fn score(self) -> f64 {
        match self {
            Self::Wang => 1.0,
            Self::Xiang => 0.8,
            Self::Xiu => 0.5,
            Self::Qiu => 0.3,
            Self::Si => 0.1,
        }
    }

    /// Chinese name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wang => "旺",
            Self::Xiang => "相",
            Self::Xiu => "休",
            Self::Qiu => "囚",
            Self::Si => "死",
        }
    }
}

impl Serialize for SeasonState {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// Season score of `element` under `month_branch`.
pub const fn season_score(month_branch: Branch, element: Element) -> f64 {
    SeasonState::of(month_branch.element(), element).score()
}

/// States of all five elements under `month_branch`.
pub fn seasonal_states(month_branch: Branch) -> BTreeMap<Element, SeasonState> {
    let season = month_branch.element();
    ALL_ELEMENTS
        .iter()
        .map(|e| (*e, SeasonState::of(season, *e)))
        .collect()
}
