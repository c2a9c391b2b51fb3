//! Error types for chart computation.

use std::error::Error;
use std::fmt::{Display, Formatter};

use bazi_config::ConfigError;
use bazi_time::CalendarError;

/// Errors from chart computation and queries.
///
/// A failure aborts the whole computation; no partial chart is returned.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ChartError {
    /// Calendar-impossible date or time (Feb 30, 25:00, lunar day 30 in a
    /// 29-day month, a leap flag on a month that has none).
    InvalidBirthDate(String),
    /// Year outside the lunar table coverage (1900..=2100).
    UnsupportedDateRange { year: i32 },
    /// A required [`BirthInfo`](crate::BirthInfo) field was not supplied.
    MissingRequiredField(&'static str),
    /// The reference year for floating markers could not be resolved.
    UnknownReferenceYear(String),
    /// The engine configuration failed validation.
    Config(ConfigError),
    /// The solar-term search did not converge.
    NoConvergence(&'static str),
}

impl Display for ChartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBirthDate(msg) => write!(f, "invalid birth date: {msg}"),
            Self::UnsupportedDateRange { year } => {
                write!(f, "year {year} outside supported range 1900..=2100")
            }
            Self::MissingRequiredField(name) => write!(f, "missing required field: {name}"),
            Self::UnknownReferenceYear(s) => write!(f, "unknown reference year: {s}"),
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::NoConvergence(msg) => write!(f, "no convergence: {msg}"),
        }
    }
}

impl Error for ChartError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CalendarError> for ChartError {
    fn from(e: CalendarError) -> Self {
        match e {
            CalendarError::OutOfRange { year } => Self::UnsupportedDateRange { year },
            CalendarError::NoConvergence(msg) => Self::NoConvergence(msg),
            CalendarError::InvalidDate(msg) | CalendarError::InvalidOffset(msg) => {
                Self::InvalidBirthDate(msg)
            }
            other => Self::InvalidBirthDate(other.to_string()),
        }
    }
}

impl From<ConfigError> for ChartError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_out_of_range_maps_to_unsupported() {
        let e: ChartError = CalendarError::OutOfRange { year: 2150 }.into();
        assert_eq!(e, ChartError::UnsupportedDateRange { year: 2150 });
    }

    #[test]
    fn calendar_invalid_date_maps_to_invalid_birth_date() {
        let e: ChartError = CalendarError::InvalidDate("lunar 2024-5 has 29 days".into()).into();
        assert!(matches!(e, ChartError::InvalidBirthDate(_)));
    }

    #[test]
    fn display_missing_field() {
        let e = ChartError::MissingRequiredField("sex");
        assert_eq!(e.to_string(), "missing required field: sex");
    }
}
