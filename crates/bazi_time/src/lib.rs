//! Calendar and solar time for the stem-branch chart engine.
//!
//! This crate provides:
//! - Julian Date ↔ civil instant conversions
//! - Fixed UTC offsets with flexible parsing
//! - Apparent solar longitude and the equation of time
//! - The 24 solar terms and their instants
//! - True solar time
//! - Gregorian ↔ lunisolar conversion for 1900–2100

pub mod error;
pub mod julian;
pub mod lunar;
pub mod solar_term;
pub mod solar_time;
pub mod sun;
pub mod zone;

pub use error::CalendarError;
pub use julian::{date_to_jd, datetime_to_jd, jd_to_datetime, J2000_JD, SECONDS_PER_DAY};
pub use lunar::{
    LunarDate, MAX_LUNAR_YEAR, MIN_LUNAR_YEAR, leap_month, leap_month_days, lunar_month_days,
    lunar_to_solar, lunar_year_days, solar_to_lunar,
};
pub use solar_term::{
    lichun, next_jie, next_term, prev_jie, prev_term, term_in_year, terms_of_year, SolarTerm,
    TermInstant, ALL_SOLAR_TERMS,
};
pub use solar_time::{true_solar_time, SolarTimeCorrection, DEFAULT_STD_MERIDIAN};
pub use sun::{apparent_longitude_deg, equation_of_time_minutes};
pub use zone::UtcOffset;
