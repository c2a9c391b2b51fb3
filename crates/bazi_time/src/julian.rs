//! Julian Date helpers for UT instants.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Julian Date of the Unix epoch 1970-01-01T00:00:00.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Date of J2000.0 (2000-01-01T12:00:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days per Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Julian Date of a UT civil instant.
pub fn datetime_to_jd(dt: NaiveDateTime) -> f64 {
    let millis = dt.and_utc().timestamp_millis() as f64;
    UNIX_EPOCH_JD + millis / (SECONDS_PER_DAY * 1000.0)
}

/// Julian Date of 00:00 on a civil date.
pub fn date_to_jd(date: NaiveDate) -> f64 {
    datetime_to_jd(date.and_time(chrono::NaiveTime::MIN))
}

/// UT civil instant of a Julian Date, rounded to the millisecond.
///
/// Returns `None` outside chrono's representable range.
pub fn jd_to_datetime(jd: f64) -> Option<NaiveDateTime> {
    let millis = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?.and_time(chrono::NaiveTime::MIN);
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis as i64)?)
}

/// Julian centuries since J2000.0.
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn j2000_noon() {
        let jd = datetime_to_jd(dt(2000, 1, 1, 12, 0));
        assert!((jd - J2000_JD).abs() < 1e-9);
    }

    #[test]
    fn date_midnight_is_half_day() {
        let jd = date_to_jd(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());
        assert!((jd - 2_415_020.5).abs() < 1e-9);
    }

    #[test]
    fn jd_back_to_datetime() {
        let original = dt(2025, 6, 20, 0, 0);
        let back = jd_to_datetime(datetime_to_jd(original)).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn centuries_at_j2000_is_zero() {
        assert_eq!(centuries_since_j2000(J2000_JD), 0.0);
    }
}
