use crate::record::LogRecord;
use chrono::format::{Item, StrftimeItems};
use chrono::SecondsFormat;
use serde_json::{Map, Value};
use std::fmt::Write as _;

/// Built-in keys every record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Time,
    Msg,
    Level,
}

/// Output names for the built-in keys.
///
/// Defaults are `time`, `msg` and `level`; the adapter renames the first two
/// to `timestamp` and `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    time: String,
    msg: String,
    level: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        FieldMap {
            time: "time".to_string(),
            msg: "msg".to_string(),
            level: "level".to_string(),
        }
    }
}

impl FieldMap {
    /// Rename one built-in key.
    pub fn rename(mut self, key: FieldKey, name: impl Into<String>) -> Self {
        let name = name.into();
        match key {
            FieldKey::Time => self.time = name,
            FieldKey::Msg => self.msg = name,
            FieldKey::Level => self.level = name,
        }
        self
    }

    /// Output name for a built-in key.
    pub fn resolve(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Time => &self.time,
            FieldKey::Msg => &self.msg,
            FieldKey::Level => &self.level,
        }
    }
}

/// Error raised while rendering a record. Never returned to logger callers;
/// the engine reports it on stderr and drops the record.
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("failed to serialize log record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid timestamp format {0:?}")]
    Timestamp(String),
}

/// Check that `pattern` is a strftime pattern `chrono` can render.
pub fn check_timestamp_format(pattern: &str) -> Result<(), FormatError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(FormatError::Timestamp(pattern.to_string()));
    }
    Ok(())
}

/// Renders [`LogRecord`]s as JSON objects, one per line.
///
/// Keys come out in lexicographic order: `serde_json::Map` is backed by a
/// `BTreeMap`, so user fields interleave with the built-in keys.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Names used for the built-in keys.
    pub field_map: FieldMap,
    /// `chrono` strftime pattern. `None` means RFC 3339 with second precision.
    pub timestamp_format: Option<String>,
    /// Omit the time key entirely.
    pub disable_timestamp: bool,
    /// Nest all user fields under this key instead of the top level.
    pub data_key: Option<String>,
    /// Indent the output. Records then span several lines.
    pub pretty_print: bool,
}

impl JsonFormatter {
    /// Render one record, including the trailing newline.
    pub fn format(&self, record: &LogRecord) -> Result<Vec<u8>, FormatError> {
        let mut data: Map<String, Value> = record
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        if let Some(data_key) = &self.data_key {
            let nested = Value::Object(data);
            data = Map::new();
            data.insert(data_key.clone(), nested);
        }

        self.prefix_field_clashes(&mut data);

        if !self.disable_timestamp {
            let ts = self.format_timestamp(record)?;
            data.insert(self.field_map.resolve(FieldKey::Time).to_string(), Value::String(ts));
        }
        data.insert(
            self.field_map.resolve(FieldKey::Msg).to_string(),
            Value::String(record.message.clone()),
        );
        data.insert(
            self.field_map.resolve(FieldKey::Level).to_string(),
            Value::String(record.level.as_str().to_string()),
        );

        let object = Value::Object(data);
        let mut out = if self.pretty_print {
            serde_json::to_vec_pretty(&object)?
        } else {
            serde_json::to_vec(&object)?
        };
        out.push(b'\n');
        Ok(out)
    }

    /// Move user fields that would shadow a built-in key to `fields.<key>`.
    fn prefix_field_clashes(&self, data: &mut Map<String, Value>) {
        for key in [FieldKey::Time, FieldKey::Msg, FieldKey::Level] {
            let name = self.field_map.resolve(key);
            if let Some(value) = data.remove(name) {
                data.insert(format!("fields.{}", name), value);
            }
        }
    }

    fn format_timestamp(&self, record: &LogRecord) -> Result<String, FormatError> {
        match &self.timestamp_format {
            None => Ok(record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Some(pattern) => {
                // DelayedFormat reports bad specifiers through fmt::Error.
                let mut out = String::new();
                write!(out, "{}", record.timestamp.format(pattern))
                    .map_err(|_| FormatError::Timestamp(pattern.clone()))?;
                Ok(out)
            }
        }
    }
}
