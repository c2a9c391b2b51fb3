//! Chinese lunisolar calendar (农历) for lunar years 1900–2100.
//!
//! Each year is packed into one word of [`LUNAR_INFO`]:
//!
//! | bits    | meaning                                        |
//! |---------|------------------------------------------------|
//! | 0–3     | leap month number, 0 if none                   |
//! | 4–15    | month 12 .. month 1 long (30 days) when set    |
//! | 16      | leap month long (30 days) when set             |
//!
//! Day offsets are counted from 1900-01-31, the first day of lunar 1900.

use std::fmt::{Display, Formatter};

use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// First lunar year covered.
pub const MIN_LUNAR_YEAR: i32 = 1900;

/// Last lunar year covered.
pub const MAX_LUNAR_YEAR: i32 = 2100;

/// Packed month lengths and leap data for lunar years 1900..=2100.
pub const LUNAR_INFO: [u32; 201] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2,
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977,
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970,
    0x06566, 0x0d4a0, 0x0ea50, 0x16a95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950,
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557,
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0,
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0,
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6,
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570,
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0,
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5,
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930,
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530,
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45,
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0,
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0,
    0x092e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4,
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0,
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160,
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252,
    0x0d520,
];

const MONTH_NAMES: [&str; 12] = [
    "正月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "冬月", "腊月",
];

const DAY_TENS: [&str; 4] = ["初", "十", "廿", "三"];
const DAY_UNITS: [&str; 10] = ["一", "二", "三", "四", "五", "六", "七", "八", "九", "十"];

fn epoch() -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(1900, 1, 31)
        .ok_or_else(|| CalendarError::InvalidDate("lunar epoch".into()))
}

fn info(year: i32) -> Result<u32, CalendarError> {
    if !(MIN_LUNAR_YEAR..=MAX_LUNAR_YEAR).contains(&year) {
        return Err(CalendarError::OutOfRange { year });
    }
    Ok(LUNAR_INFO[(year - MIN_LUNAR_YEAR) as usize])
}

/// Leap month number of a lunar year, if it has one.
pub fn leap_month(year: i32) -> Result<Option<u8>, CalendarError> {
    let m = (info(year)? & 0xf) as u8;
    Ok((m != 0).then_some(m))
}

/// Days in the leap month of a lunar year (0 when there is none).
pub fn leap_month_days(year: i32) -> Result<u32, CalendarError> {
    let word = info(year)?;
    Ok(match word & 0xf {
        0 => 0,
        _ if word & 0x1_0000 != 0 => 30,
        _ => 29,
    })
}

/// Days in regular month `month` (1..=12) of a lunar year.
pub fn lunar_month_days(year: i32, month: u8) -> Result<u32, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidDate(format!("lunar month {month}")));
    }
    let word = info(year)?;
    Ok(if word & (0x1_0000 >> month) != 0 { 30 } else { 29 })
}

/// Total days in a lunar year, leap month included.
pub fn lunar_year_days(year: i32) -> Result<u32, CalendarError> {
    let word = info(year)?;
    let long_months = (word >> 4 & 0xfff).count_ones();
    Ok(348 + long_months + leap_month_days(year)?)
}

/// A date in the lunisolar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub is_leap: bool,
}

impl LunarDate {
    /// Validated lunar date.
    pub fn new(year: i32, month: u8, day: u8, is_leap: bool) -> Result<Self, CalendarError> {
        let len = if is_leap {
            if leap_month(year)? != Some(month) {
                return Err(CalendarError::InvalidDate(format!(
                    "lunar {year} has no leap month {month}"
                )));
            }
            leap_month_days(year)?
        } else {
            lunar_month_days(year, month)?
        };
        if day == 0 || u32::from(day) > len {
            return Err(CalendarError::InvalidDate(format!(
                "lunar {year}-{month} has {len} days, got {day}"
            )));
        }
        Ok(Self {
            year,
            month,
            day,
            is_leap,
        })
    }

    /// Chinese month name, `闰` prefixed for a leap month.
    pub fn month_name(&self) -> String {
        let base = MONTH_NAMES[(self.month.clamp(1, 12) - 1) as usize];
        if self.is_leap {
            format!("闰{base}")
        } else {
            base.to_string()
        }
    }

    /// Chinese day name (初一 .. 三十).
    pub fn day_name(&self) -> String {
        match self.day {
            10 => "初十".to_string(),
            20 => "二十".to_string(),
            30 => "三十".to_string(),
            d => {
                let tens = DAY_TENS[(d / 10).min(3) as usize];
                let units = DAY_UNITS[((d % 10).max(1) - 1) as usize];
                format!("{tens}{units}")
            }
        }
    }
}

impl Display for LunarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}年{}{}", self.year, self.month_name(), self.day_name())
    }
}

/// Convert a Gregorian date to the lunar calendar.
pub fn solar_to_lunar(date: NaiveDate) -> Result<LunarDate, CalendarError> {
    let mut offset = (date - epoch()?).num_days();
    if offset < 0 {
        return Err(CalendarError::OutOfRange { year: date.year() });
    }

    let mut year = MIN_LUNAR_YEAR;
    loop {
        if year > MAX_LUNAR_YEAR {
            return Err(CalendarError::OutOfRange { year });
        }
        let len = i64::from(lunar_year_days(year)?);
        if offset < len {
            break;
        }
        offset -= len;
        year += 1;
    }

    let leap = leap_month(year)?;
    for month in 1..=12u8 {
        let len = i64::from(lunar_month_days(year, month)?);
        if offset < len {
            return Ok(LunarDate {
                year,
                month,
                day: (offset + 1) as u8,
                is_leap: false,
            });
        }
        offset -= len;
        if leap == Some(month) {
            let len = i64::from(leap_month_days(year)?);
            if offset < len {
                return Ok(LunarDate {
                    year,
                    month,
                    day: (offset + 1) as u8,
                    is_leap: true,
                });
            }
            offset -= len;
        }
    }
    Err(CalendarError::InvalidDate(format!("{date} past end of lunar {year}")))
}

/// Convert a lunar date to the Gregorian calendar.
///
/// The date is validated first, so a leap flag on a month that is not the
/// year's leap month is rejected.
pub fn lunar_to_solar(date: &LunarDate) -> Result<NaiveDate, CalendarError> {
    let date = LunarDate::new(date.year, date.month, date.day, date.is_leap)?;
    let mut offset: i64 = 0;
    for y in MIN_LUNAR_YEAR..date.year {
        offset += i64::from(lunar_year_days(y)?);
    }
    let leap = leap_month(date.year)?;
    for m in 1..date.month {
        offset += i64::from(lunar_month_days(date.year, m)?);
        if leap == Some(m) {
            offset += i64::from(leap_month_days(date.year)?);
        }
    }
    if date.is_leap {
        offset += i64::from(lunar_month_days(date.year, date.month)?);
    }
    offset += i64::from(date.day) - 1;
    epoch()?
        .checked_add_signed(TimeDelta::days(offset))
        .ok_or_else(|| CalendarError::InvalidDate(format!("offset {offset} days")))
}
