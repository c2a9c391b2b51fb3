//! Four-pillar resolution: civil birth input → year, month, day and hour
//! stem-branch pairs.
//!
//! The year turns at 立春 and the month at each jie, both judged on the UT
//! instant. The day and hour pillars follow the hour clock, which is the
//! civil clock or, when requested, true solar time.

use bazi_time::solar_time::correction;
use bazi_time::{
    LunarDate, SolarTimeCorrection, TermInstant, datetime_to_jd, lichun, lunar_to_solar, next_jie,
    prev_jie, solar_to_lunar, true_solar_time,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Serialize, Serializer};

use crate::birth::{BirthInfo, CalendarKind, DayBoundary};
use crate::error::ChartError;
use crate::ganzhi::{Branch, GanZhi, Stem, hour_ganzhi, month_ganzhi, year_ganzhi};

/// Offset of the day pillar counter: 1900-01-01 was 甲戌 (index 10).
const DAY_CYCLE_OFFSET: i64 = 10;

/// Pillar position within the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    Year,
    Month,
    Day,
    Hour,
}

/// All four positions, year first.
pub const ALL_POSITIONS: [Position; 4] = [
    Position::Year,
    Position::Month,
    Position::Day,
    Position::Hour,
];

impl Position {
    /// Stable lowercase code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
        }
    }

    /// Chinese name (年柱 ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Year => "年柱",
            Self::Month => "月柱",
            Self::Day => "日柱",
            Self::Hour => "时柱",
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.code())
    }
}

/// The four pillars with named, non-optional fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FourPillars {
    pub year: GanZhi,
    pub month: GanZhi,
    pub day: GanZhi,
    pub hour: GanZhi,
}

impl FourPillars {
    /// Pillar at `pos`.
    pub const fn get(&self, pos: Position) -> GanZhi {
        match pos {
            Position::Year => self.year,
            Position::Month => self.month,
            Position::Day => self.day,
            Position::Hour => self.hour,
        }
    }

    /// `(position, pillar)` pairs, year first.
    pub fn iter(&self) -> impl Iterator<Item = (Position, GanZhi)> + '_ {
        ALL_POSITIONS.iter().map(move |p| (*p, self.get(*p)))
    }

    /// The day stem (日主).
    pub const fn day_master(&self) -> Stem {
        self.day.stem
    }

    /// Visible stems, year first.
    pub const fn stems(&self) -> [Stem; 4] {
        [self.year.stem, self.month.stem, self.day.stem, self.hour.stem]
    }

    /// Branches, year first.
    pub const fn branches(&self) -> [Branch; 4] {
        [
            self.year.branch,
            self.month.branch,
            self.day.branch,
            self.hour.branch,
        ]
    }
}

/// The instant and calendar context behind a set of pillars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedMoment {
    /// Gregorian civil clock reading at the birth place.
    pub local: NaiveDateTime,
    /// UT instant.
    pub utc: NaiveDateTime,
    /// Julian Date (UT).
    pub jd_ut: f64,
    /// Lunar date of the civil birth day.
    pub lunar: LunarDate,
    /// Clock that drives the day and hour pillars.
    pub hour_clock: NaiveDateTime,
    /// True-solar-time correction when requested.
    pub solar_correction: Option<SolarTimeCorrection>,
    /// Civil date used for the day pillar.
    pub day_pillar_date: NaiveDate,
    /// The hour clock was at or past 23:00 and the next day's pillar was used.
    pub late_zi_rollover: bool,
    /// Jie that opened the birth month.
    pub prev_jie: TermInstant,
    /// Jie that closes the birth month.
    pub next_jie: TermInstant,
}

/// Gregorian civil date for the birth input, validated.
fn civil_date(birth: &BirthInfo) -> Result<(NaiveDate, LunarDate), ChartError> {
    match birth.calendar {
        CalendarKind::Solar => {
            let date = NaiveDate::from_ymd_opt(birth.year, u32::from(birth.month), u32::from(birth.day))
                .ok_or_else(|| {
                    ChartError::InvalidBirthDate(format!(
                        "{}-{:02}-{:02}",
                        birth.year, birth.month, birth.day
                    ))
                })?;
            let lunar = solar_to_lunar(date)?;
            Ok((date, lunar))
        }
        CalendarKind::Lunar { is_leap_month } => {
            let lunar = LunarDate::new(birth.year, birth.month, birth.day, is_leap_month)?;
            Ok((lunar_to_solar(&lunar)?, lunar))
        }
    }
}

/// Day-pillar index of a civil date.
pub fn day_ganzhi(date: NaiveDate) -> GanZhi {
    let base = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
    let days = (date - base).num_days();
    GanZhi::from_index((days + DAY_CYCLE_OFFSET).rem_euclid(60) as u8)
}

/// Resolve the birth instant and its calendar context.
pub fn resolve_moment(birth: &BirthInfo) -> Result<ResolvedMoment, ChartError> {
    let (date, lunar) = civil_date(birth)?;
    let time = NaiveTime::from_hms_opt(u32::from(birth.hour), u32::from(birth.minute), 0)
        .ok_or_else(|| {
            ChartError::InvalidBirthDate(format!("{:02}:{:02}", birth.hour, birth.minute))
        })?;
    let local = date.and_time(time);
    let utc = birth.offset.local_to_utc(local);
    let jd_ut = datetime_to_jd(utc);

    let (hour_clock, solar_correction) = match birth.true_solar_time {
        Some(tst) => {
            tst.validate()?;
            let (lon, meridian) = (tst.longitude_deg, tst.std_meridian_deg);
            (
                true_solar_time(local, birth.offset, lon, meridian)?,
                Some(correction(local, birth.offset, lon, meridian)),
            )
        }
        None => (local, None),
    };

    let late_zi_rollover =
        birth.day_boundary == DayBoundary::LateZiNextDay && hour_clock.hour() >= 23;
    let day_pillar_date = if late_zi_rollover {
        hour_clock.date() + TimeDelta::days(1)
    } else {
        hour_clock.date()
    };

    let moment = ResolvedMoment {
        local,
        utc,
        jd_ut,
        lunar,
        hour_clock,
        solar_correction,
        day_pillar_date,
        late_zi_rollover,
        prev_jie: prev_jie(jd_ut)?,
        next_jie: next_jie(jd_ut)?,
    };
    tracing::debug!(
        local = %moment.local,
        hour_clock = %moment.hour_clock,
        late_zi = moment.late_zi_rollover,
        jie = moment.prev_jie.term.name(),
        "birth moment resolved"
    );
    Ok(moment)
}

/// Four pillars for a resolved moment.
pub fn pillars_for(moment: &ResolvedMoment) -> Result<FourPillars, ChartError> {
    let ut_year = moment.utc.year();
    let spring = lichun(ut_year)?;
    let year = if moment.jd_ut < spring.jd_ut {
        year_ganzhi(ut_year - 1)
    } else {
        year_ganzhi(ut_year)
    };
    let month_branch = Branch::from_index(moment.prev_jie.term.month_branch_index());
    let month = month_ganzhi(year.stem, month_branch);
    let day = day_ganzhi(moment.day_pillar_date);
    let hour = hour_ganzhi(day.stem, moment.hour_clock.hour());
    Ok(FourPillars {
        year,
        month,
        day,
        hour,
    })
}

/// Resolve a birth input into its four pillars and the moment behind them.
pub fn resolve_pillars(birth: &BirthInfo) -> Result<(FourPillars, ResolvedMoment), ChartError> {
    let moment = resolve_moment(birth)?;
    let pillars = pillars_for(&moment)?;
    tracing::debug!(
        year = %pillars.year,
        month = %pillars.month,
        day = %pillars.day,
        hour = %pillars.hour,
        "pillars resolved"
    );
    Ok((pillars, moment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birth::{Sex, TrueSolarTime};

    fn solar(y: i32, m: u8, d: u8, h: u8, mi: u8) -> BirthInfo {
        BirthInfo::builder()
            .sex(Sex::Male)
            .solar_date(y, m, d)
            .time(h, mi)
            .build()
            .unwrap()
    }

    fn names(p: &FourPillars) -> [String; 4] {
        [
            p.year.to_string(),
            p.month.to_string(),
            p.day.to_string(),
            p.hour.to_string(),
        ]
    }

    #[test]
    fn day_cycle_anchor() {
        assert_eq!(day_ganzhi(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()).to_string(), "甲戌");
        assert_eq!(day_ganzhi(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()).to_string(), "戊午");
        assert_eq!(day_ganzhi(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).to_string(), "庚午");
    }

    #[test]
    fn summer_2025() {
        let (p, _) = resolve_pillars(&solar(2025, 6, 20, 8, 0)).unwrap();
        assert_eq!(names(&p), ["乙巳", "壬午", "庚申", "庚辰"]);
    }

    #[test]
    fn millennium_noon() {
        let (p, _) = resolve_pillars(&solar(2000, 1, 1, 12, 0)).unwrap();
        assert_eq!(names(&p), ["己卯", "丙子", "戊午", "戊午"]);
    }

    #[test]
    fn year_turns_at_lichun_not_new_year() {
        // 2025 立春 falls at 22:10 Beijing time on Feb 3.
        let (before, _) = resolve_pillars(&solar(2025, 2, 3, 21, 0)).unwrap();
        let (after, _) = resolve_pillars(&solar(2025, 2, 3, 23, 30)).unwrap();
        assert_eq!(before.year.to_string(), "甲辰");
        assert_eq!(before.month.branch, Branch::Chou);
        assert_eq!(after.year.to_string(), "乙巳");
        assert_eq!(after.month.to_string(), "戊寅");
    }

    #[test]
    fn late_zi_uses_next_day() {
        let (late, m) = resolve_pillars(&solar(2025, 1, 1, 23, 30)).unwrap();
        assert!(m.late_zi_rollover);
        assert_eq!(late.day.to_string(), "辛未");
        assert_eq!(late.hour.to_string(), "戊子");

        let mut midnight = solar(2025, 1, 1, 23, 30);
        midnight.day_boundary = DayBoundary::Midnight;
        let (p, m) = resolve_pillars(&midnight).unwrap();
        assert!(!m.late_zi_rollover);
        assert_eq!(p.day.to_string(), "庚午");
        assert_eq!(p.hour.to_string(), "丙子");
    }

    #[test]
    fn true_solar_time_shifts_hour() {
        // 08:00 in Urumqi is about 05:50 true solar time: 卯 hour instead of 辰.
        let birth = BirthInfo::builder()
            .sex(Sex::Female)
            .solar_date(2025, 6, 20)
            .time(8, 0)
            .true_solar_time(true)
            .longitude(87.6)
            .build()
            .unwrap();
        let (p, m) = resolve_pillars(&birth).unwrap();
        assert!(m.solar_correction.is_some());
        assert_eq!(p.hour.branch, Branch::Mao);
        assert_eq!(p.year.to_string(), "乙巳");
    }

    #[test]
    fn unchecked_longitude_is_rejected() {
        let mut birth = solar(2025, 6, 20, 8, 0);
        birth.true_solar_time = Some(TrueSolarTime {
            longitude_deg: 1e12,
            std_meridian_deg: 120.0,
        });
        assert!(matches!(
            resolve_pillars(&birth),
            Err(ChartError::InvalidBirthDate(_))
        ));
    }

    #[test]
    fn lunar_input_matches_solar() {
        // 2025-06-20 is lunar 2025 五月 廿五.
        let birth = BirthInfo::builder()
            .sex(Sex::Female)
            .lunar_date(2025, 5, 25, false)
            .time(8, 0)
            .build()
            .unwrap();
        let (p, m) = resolve_pillars(&birth).unwrap();
        assert_eq!(m.local.date(), NaiveDate::from_ymd_opt(2025, 6, 20).unwrap());
        assert_eq!(p.day.to_string(), "庚申");
    }

    #[test]
    fn impossible_dates_rejected() {
        assert!(matches!(
            resolve_pillars(&solar(2023, 2, 30, 8, 0)),
            Err(ChartError::InvalidBirthDate(_))
        ));
        assert!(matches!(
            resolve_pillars(&solar(2023, 2, 3, 25, 0)),
            Err(ChartError::InvalidBirthDate(_))
        ));
        assert!(matches!(
            resolve_pillars(&solar(1850, 5, 1, 8, 0)),
            Err(ChartError::UnsupportedDateRange { .. })
        ));
    }
}
