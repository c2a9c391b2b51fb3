//! Error type for the convenience wrapper.

use std::error::Error;
use std::fmt::{Display, Formatter};

use bazi_base::ChartError;
use bazi_config::ConfigError;

/// Errors from the global engine and its convenience functions.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum BaziError {
    /// [`init`](crate::init) has not been called.
    NotInitialized,
    /// [`init`](crate::init) was called twice.
    AlreadyInitialized,
    /// Chart computation or a query failed.
    Chart(ChartError),
    /// The engine configuration was rejected.
    Config(ConfigError),
}

impl Display for BaziError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "engine not initialized; call init() first"),
            Self::AlreadyInitialized => write!(f, "engine already initialized"),
            Self::Chart(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "{e}"),
        }
    }
}

impl Error for BaziError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Chart(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ChartError> for BaziError {
    fn from(e: ChartError) -> Self {
        Self::Chart(e)
    }
}

impl From<ConfigError> for BaziError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_initialized() {
        assert!(BaziError::NotInitialized.to_string().contains("init()"));
    }

    #[test]
    fn chart_error_keeps_source() {
        let e = BaziError::from(ChartError::UnsupportedDateRange { year: 2150 });
        assert!(e.source().is_some());
        assert!(e.to_string().contains("2150"));
    }
}
