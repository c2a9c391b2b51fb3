//! Flowing years and months (流年 / 流月).

use serde::Serialize;

use crate::ganzhi::{Branch, GanZhi, month_ganzhi, year_ganzhi};
use crate::luck::dayun::{favour_score, natal_relations, raw_favour};
use crate::luck::types::{NatalRelation, RawFavour};
use crate::pillars::FourPillars;
use crate::ten_god::{TenGod, ten_god};
use crate::yongshen::YongshenProfile;

/// A flowing period judged against the natal chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowPeriod {
    /// Gregorian year of the 立春-based ganzhi year.
    pub year: i32,
    /// Month branch for a flowing month, `None` for a year.
    pub month: Option<Branch>,
    pub ganzhi: GanZhi,
    pub ten_god: TenGod,
    pub raw_favour: RawFavour,
    pub favour_score: f64,
    pub natal_relations: Vec<NatalRelation>,
}

fn judge(
    year: i32,
    month: Option<Branch>,
    ganzhi: GanZhi,
    pillars: &FourPillars,
    yongshen: &YongshenProfile,
) -> FlowPeriod {
    let natal = natal_relations(ganzhi, pillars);
    FlowPeriod {
        year,
        month,
        ganzhi,
        ten_god: ten_god(pillars.day_master(), ganzhi.stem),
        raw_favour: raw_favour(ganzhi.stem.element(), yongshen),
        favour_score: favour_score(ganzhi, yongshen, &natal),
        natal_relations: natal,
    }
}

/// The flowing year `year`.
pub fn flow_year(pillars: &FourPillars, yongshen: &YongshenProfile, year: i32) -> FlowPeriod {
    judge(year, None, year_ganzhi(year), pillars, yongshen)
}

/// The flowing month with branch `branch` inside ganzhi year `year`.
pub fn flow_month(
    pillars: &FourPillars,
    yongshen: &YongshenProfile,
    year: i32,
    branch: Branch,
) -> FlowPeriod {
    let gz = month_ganzhi(year_ganzhi(year).stem, branch);
    judge(year, Some(branch), gz, pillars, yongshen)
}

/// The twelve flowing months of `year`, 寅 first.
pub fn flow_months(pillars: &FourPillars, yongshen: &YongshenProfile, year: i32) -> Vec<FlowPeriod> {
    (0..12)
        .map(|i| flow_month(pillars, yongshen, year, Branch::Yin.offset(i)))
        .collect()
}
