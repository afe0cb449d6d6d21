use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record.
///
/// Levels are totally ordered, `Debug < Info < Error < Fatal`. A record is
/// written only when its level is at or above the engine threshold.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Error,
    Fatal,
}

impl Level {
    /// All levels, lowest first.
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Error, Level::Fatal];

    /// Lowercase name used in serialized records.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a raw threshold value. Anything outside the known range
    /// falls back to `Info`.
    pub(crate) fn from_u8(raw: u8) -> Level {
        match raw {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Error,
            3 => Level::Fatal,
            _ => Level::Info,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known [`Level`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO | tracing::Level::WARN => Level::Info,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("DEBUG".parse::<Level>(), Ok(Level::Debug));
        assert_eq!(" fatal ".parse::<Level>(), Ok(Level::Fatal));
        assert!("warn".parse::<Level>().is_err());
    }

    #[test]
    fn unknown_raw_value_falls_back_to_info() {
        for level in Level::ALL {
            assert_eq!(Level::from_u8(level.as_u8()), level);
        }
        assert_eq!(Level::from_u8(42), Level::Info);
    }

    #[test]
    fn tracing_levels_map_onto_four_levels() {
        assert_eq!(Level::from(&tracing::Level::TRACE), Level::Debug);
        assert_eq!(Level::from(&tracing::Level::WARN), Level::Info);
        assert_eq!(Level::from(&tracing::Level::ERROR), Level::Error);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Level::Error).unwrap(), "\"error\"");
        let parsed: Level = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(parsed, Level::Debug);
    }
}
