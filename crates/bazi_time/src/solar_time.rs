//! True solar time (真太阳时).
//!
//! `TST = local clock + 4 min/° × (longitude − standard meridian) + EoT`.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::julian::datetime_to_jd;
use crate::sun::equation_of_time_minutes;
use crate::zone::UtcOffset;

/// Standard meridian of China standard time, degrees east.
pub const DEFAULT_STD_MERIDIAN: f64 = 120.0;

/// Minutes of clock time per degree of longitude.
pub const MINUTES_PER_DEGREE: f64 = 4.0;

/// Breakdown of a true-solar-time correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarTimeCorrection {
    /// Longitude correction in minutes.
    pub longitude_minutes: f64,
    /// Equation of time in minutes.
    pub equation_of_time_minutes: f64,
}

impl SolarTimeCorrection {
    /// Total shift from clock time to true solar time, minutes.
    pub fn total_minutes(&self) -> f64 {
        self.longitude_minutes + self.equation_of_time_minutes
    }
}

/// Correction from the clock time `local` at `longitude_deg` to true solar time.
pub fn correction(
    local: NaiveDateTime,
    offset: UtcOffset,
    longitude_deg: f64,
    std_meridian_deg: f64,
) -> SolarTimeCorrection {
    let jd_ut = datetime_to_jd(offset.local_to_utc(local));
    SolarTimeCorrection {
        longitude_minutes: MINUTES_PER_DEGREE * (longitude_deg - std_meridian_deg),
        equation_of_time_minutes: equation_of_time_minutes(jd_ut),
    }
}

/// True solar wall-clock time for a local clock reading.
///
/// Fails when the shift is not finite or leaves the representable range.
pub fn true_solar_time(
    local: NaiveDateTime,
    offset: UtcOffset,
    longitude_deg: f64,
    std_meridian_deg: f64,
) -> Result<NaiveDateTime, CalendarError> {
    let c = correction(local, offset, longitude_deg, std_meridian_deg);
    let minutes = c.total_minutes();
    let out_of_range =
        || CalendarError::InvalidDate(format!("true solar time shift of {minutes} min"));
    if !minutes.is_finite() {
        return Err(out_of_range());
    }
    let shift_ms = (minutes * 60_000.0).round() as i64;
    TimeDelta::try_milliseconds(shift_ms)
        .and_then(|d| local.checked_add_signed(d))
        .ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn longitude_term_is_four_minutes_per_degree() {
        let c = correction(local(2024, 6, 13, 12, 0), UtcOffset::default(), 116.4, 120.0);
        assert!((c.longitude_minutes + 14.4).abs() < 1e-9);
        // EoT is close to zero in mid June
        assert!(c.equation_of_time_minutes.abs() < 1.0);
    }

    #[test]
    fn urumqi_runs_more_than_two_hours_behind() {
        let tst = true_solar_time(local(2024, 1, 1, 12, 0), UtcOffset::default(), 87.6, 120.0).unwrap();
        let diff = (local(2024, 1, 1, 12, 0) - tst).num_minutes();
        assert!((130..=135).contains(&diff), "diff {diff}");
    }

    #[test]
    fn on_meridian_only_eot_applies() {
        let clock = local(2024, 11, 3, 12, 0);
        let tst = true_solar_time(clock, UtcOffset::default(), DEFAULT_STD_MERIDIAN, DEFAULT_STD_MERIDIAN)
            .unwrap();
        let diff = (tst - clock).num_seconds() as f64 / 60.0;
        assert!((diff - 16.4).abs() < 0.4, "diff {diff}");
    }

    #[test]
    fn absurd_longitude_is_an_error() {
        let clock = local(2024, 6, 13, 12, 0);
        let err = true_solar_time(clock, UtcOffset::default(), 1e12, 120.0).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidDate(_)));
        assert!(true_solar_time(clock, UtcOffset::default(), f64::NAN, 120.0).is_err());
        assert!(true_solar_time(clock, UtcOffset::default(), f64::INFINITY, 120.0).is_err());
    }
}
