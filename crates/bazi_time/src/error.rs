//! Error types for calendar and time conversions.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from civil-date validation, offset parsing, lunar conversion or
/// solar-term search.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CalendarError {
    /// The civil or lunar date does not exist (Feb 30, lunar day 30 in a
    /// 29-day month, a leap flag on a month without a leap).
    InvalidDate(String),
    /// The year lies outside the lunar table coverage (1900..=2100).
    OutOfRange { year: i32 },
    /// The UTC offset string could not be understood.
    InvalidOffset(String),
    /// The solar-term root finder did not bracket a solution.
    NoConvergence(&'static str),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(msg) => write!(f, "invalid date: {msg}"),
            Self::OutOfRange { year } => {
                write!(f, "year {year} outside supported range 1900..=2100")
            }
            Self::InvalidOffset(msg) => write!(f, "invalid UTC offset: {msg}"),
            Self::NoConvergence(msg) => write!(f, "no convergence: {msg}"),
        }
    }
}

impl Error for CalendarError {}
