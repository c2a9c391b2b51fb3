//! Fixed UTC offsets and flexible offset parsing.
//!
//! Accepted spellings: `+08:00`, `+8`, `+0800`, `-05:30`, `UTC+8`,
//! `GMT+0800`, `8`, `+5.5`. An empty string is rejected so that callers
//! decide on the default explicitly.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// Default offset (China standard time, +08:00) in minutes.
pub const DEFAULT_OFFSET_MINUTES: i32 = 480;

/// Largest accepted offset magnitude in minutes (±14:00).
pub const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// A fixed offset from UTC in whole minutes, east positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtcOffset {
    minutes: i32,
}

impl Default for UtcOffset {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_OFFSET_MINUTES,
        }
    }
}

impl UtcOffset {
    /// Offset from minutes east of UTC.
    pub fn from_minutes(minutes: i32) -> Result<Self, CalendarError> {
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(CalendarError::InvalidOffset(format!(
                "{minutes} minutes exceeds ±{MAX_OFFSET_MINUTES}"
            )));
        }
        Ok(Self { minutes })
    }

    /// Minutes east of UTC.
    pub const fn minutes(self) -> i32 {
        self.minutes
    }

    /// Shift a local wall-clock instant to UT.
    pub fn local_to_utc(self, local: NaiveDateTime) -> NaiveDateTime {
        local - TimeDelta::minutes(i64::from(self.minutes))
    }

    /// Shift a UT instant to local wall-clock time.
    pub fn utc_to_local(self, utc: NaiveDateTime) -> NaiveDateTime {
        utc + TimeDelta::minutes(i64::from(self.minutes))
    }
}

impl Display for UtcOffset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let abs = self.minutes.abs();
        write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
    }
}

impl FromStr for UtcOffset {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidOffset(s.to_string());
        let mut body = s.trim();
        let mut named = false;
        for prefix in ["UTC", "GMT", "utc", "gmt"] {
            if let Some(rest) = body.strip_prefix(prefix) {
                body = rest.trim_start();
                named = true;
                break;
            }
        }
        if body.is_empty() {
            return if named { Ok(Self { minutes: 0 }) } else { Err(invalid()) };
        }

        let (sign, digits) = match body.as_bytes()[0] {
            b'+' => (1, &body[1..]),
            b'-' => (-1, &body[1..]),
            _ => (1, body),
        };
        if digits.is_empty() {
            return Err(invalid());
        }

        let minutes = if let Some((h, m)) = digits.split_once(':') {
            let h: i32 = h.parse().map_err(|_| invalid())?;
            let m: i32 = m.parse().map_err(|_| invalid())?;
            if m >= 60 {
                return Err(invalid());
            }
            h * 60 + m
        } else if digits.contains('.') {
            let hours: f64 = digits.parse().map_err(|_| invalid())?;
            (hours * 60.0).round() as i32
        } else if digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()) {
            let h: i32 = digits[..2].parse().map_err(|_| invalid())?;
            let m: i32 = digits[2..].parse().map_err(|_| invalid())?;
            if m >= 60 {
                return Err(invalid());
            }
            h * 60 + m
        } else {
            let h: i32 = digits.parse().map_err(|_| invalid())?;
            h * 60
        };

        Self::from_minutes(sign * minutes)
    }
}
