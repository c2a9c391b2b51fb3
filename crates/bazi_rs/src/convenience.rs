use std::sync::Arc;

use bazi_base::{
    BirthInfo, Chart, ChartError, ChartQuery, FavorabilityWindow, FourPillars, LuckTimeline,
    QueryResult, ScenarioKind, resolve_pillars,
};
use bazi_time::{LunarDate, TermInstant, UtcOffset};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::BaziError;
use crate::global::engine;

/// Static chart for `birth` from the global engine's cache.
pub fn chart(birth: &BirthInfo) -> Result<Arc<Chart>, BaziError> {
    engine()?.chart(birth)
}

/// Evaluate `q` against the chart of `birth`.
pub fn query(birth: &BirthInfo, q: &ChartQuery) -> Result<QueryResult, BaziError> {
    engine()?.query(birth, q)
}

/// Floating markers, luck views and the flowing year of `year`.
///
/// Shorthand for `query(birth, &ChartQuery::for_year(year))`.
pub fn year_view(birth: &BirthInfo, year: i32) -> Result<QueryResult, BaziError> {
    query(birth, &ChartQuery::for_year(year))
}

/// Favorability windows of one scenario over the inclusive range
/// `from..=to`.
pub fn windows(
    birth: &BirthInfo,
    scenario: ScenarioKind,
    from: i32,
    to: i32,
) -> Result<Vec<FavorabilityWindow>, BaziError> {
    let q = ChartQuery::for_year(from).scenario(scenario).years(from, to);
    let mut res = query(birth, &q)?;
    Ok(res.windows.remove(&scenario).unwrap_or_default())
}

/// Luck timeline of `birth`.
pub fn luck(birth: &BirthInfo) -> Result<LuckTimeline, BaziError> {
    Ok(chart(birth)?.luck.clone())
}

/// The four pillars alone; needs no engine.
pub fn pillars(birth: &BirthInfo) -> Result<FourPillars, BaziError> {
    Ok(resolve_pillars(birth)?.0)
}

/// Lunisolar date of a Gregorian date.
pub fn lunar(date: NaiveDate) -> Result<LunarDate, BaziError> {
    bazi_time::solar_to_lunar(date).map_err(|e| BaziError::Chart(ChartError::from(e)))
}

/// Gregorian date of a lunisolar date.
pub fn solar(date: &LunarDate) -> Result<NaiveDate, BaziError> {
    bazi_time::lunar_to_solar(date).map_err(|e| BaziError::Chart(ChartError::from(e)))
}

/// The 24 solar terms of `year` with their civil instants in `offset`.
pub fn solar_terms(
    year: i32,
    offset: UtcOffset,
) -> Result<Vec<(TermInstant, NaiveDateTime)>, BaziError> {
    let terms =
        bazi_time::terms_of_year(year).map_err(|e| BaziError::Chart(ChartError::from(e)))?;
    terms
        .into_iter()
        .map(|t| {
            let utc = bazi_time::jd_to_datetime(t.jd_ut).ok_or_else(|| {
                BaziError::Chart(ChartError::InvalidBirthDate(format!(
                    "solar term instant JD {} is not representable",
                    t.jd_ut
                )))
            })?;
            Ok((t, offset.utc_to_local(utc)))
        })
        .collect()
}
