use crate::fields::Fields;
use crate::level::Level;
use chrono::{DateTime, Local};

/// A single log event, built at emission time and dropped once written.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
    pub fields: Fields,
}

impl LogRecord {
    /// Stamp a new record with the current wall clock.
    pub fn new(level: Level, message: impl Into<String>, fields: Fields) -> Self {
        LogRecord {
            timestamp: Local::now(),
            level,
            message: message.into(),
            fields,
        }
    }
}
