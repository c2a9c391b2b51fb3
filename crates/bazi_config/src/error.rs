//! Error types for configuration loading.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from reading, parsing or validating an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be read.
    Io(String),
    /// The TOML text is malformed or has unknown keys.
    Parse(String),
    /// A threshold table is out of order or a coefficient out of range.
    Invalid(&'static str),
    /// The config could not be rendered back to TOML.
    Serialize(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "config I/O error: {msg}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
            Self::Serialize(msg) => write!(f, "config serialize error: {msg}"),
        }
    }
}

impl Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Serialize(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid() {
        let e = ConfigError::Invalid("strength bands must decrease");
        assert_eq!(e.to_string(), "invalid config: strength bands must decrease");
    }

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
        assert!(matches!(ConfigError::from(io), ConfigError::Io(_)));
    }
}
