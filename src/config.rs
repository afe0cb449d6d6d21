use crate::adapter;
use crate::engine::Engine;
use crate::env::{
    env_var, parse_bool, LOG_LEVEL_ENV, LOG_OUTPUT_ENV, LOG_PRETTY_ENV, LOG_TIMESTAMP_FORMAT_ENV,
};
use crate::formatter::{check_timestamp_format, JsonFormatter};
use crate::level::Level;
use serde::Deserialize;
use std::io;
use std::str::FromStr;
use std::sync::Arc;

/// Standard stream the engine writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Stdout,
    Stderr,
}

impl FromStr for Output {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Output::Stdout),
            "stderr" => Ok(Output::Stderr),
            other => Err(format!("unknown log output {other:?}")),
        }
    }
}

/// Engine configuration.
///
/// Can be deserialized from an application's config file (all keys
/// optional) or read from the environment with [`EngineConfig::from_env`].
///
/// **Fields**
/// - `level`: initial minimum severity.
/// - `output`: stream records are written to.
/// - `pretty_print`: indent records over several lines.
/// - `disable_timestamp`: omit the `timestamp` key.
/// - `timestamp_format`: `chrono` strftime pattern; RFC 3339 when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub level: Level,
    pub output: Output,
    pub pretty_print: bool,
    pub disable_timestamp: bool,
    pub timestamp_format: Option<String>,
}

impl EngineConfig {
    /// Build a config from the process environment. See [`crate::env`].
    pub fn from_env() -> Self {
        Self::from_lookup(env_var)
    }

    /// Build a config from an arbitrary key lookup. Values that fail to
    /// parse are ignored, keeping the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EngineConfig::default();

        if let Some(raw) = lookup(LOG_LEVEL_ENV) {
            match raw.parse::<Level>() {
                Ok(level) => config.level = level,
                Err(e) => tracing::warn!(error = %e, "ignoring {}", LOG_LEVEL_ENV),
            }
        }
        if let Some(raw) = lookup(LOG_OUTPUT_ENV) {
            match raw.parse::<Output>() {
                Ok(output) => config.output = output,
                Err(e) => tracing::warn!(error = %e, "ignoring {}", LOG_OUTPUT_ENV),
            }
        }
        if let Some(raw) = lookup(LOG_PRETTY_ENV) {
            match parse_bool(&raw) {
                Some(pretty) => config.pretty_print = pretty,
                None => tracing::warn!(value = %raw, "ignoring {}", LOG_PRETTY_ENV),
            }
        }
        if let Some(raw) = lookup(LOG_TIMESTAMP_FORMAT_ENV) {
            match check_timestamp_format(&raw) {
                Ok(()) => config.timestamp_format = Some(raw),
                Err(e) => tracing::warn!(error = %e, "ignoring {}", LOG_TIMESTAMP_FORMAT_ENV),
            }
        }

        config
    }

    /// Adapter formatter with this config's options applied.
    pub fn formatter(&self) -> JsonFormatter {
        JsonFormatter {
            timestamp_format: self.timestamp_format.clone(),
            disable_timestamp: self.disable_timestamp,
            pretty_print: self.pretty_print,
            ..adapter::standard_formatter()
        }
    }

    pub fn build(&self) -> Arc<Engine> {
        let builder = adapter::engine_builder()
            .level(self.level)
            .formatter(self.formatter());
        let builder = match self.output {
            Output::Stdout => builder.output(io::stdout()),
            Output::Stderr => builder.output(io::stderr()),
        };
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::FieldKey;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_lookup_gives_defaults() {
        assert_eq!(EngineConfig::from_lookup(|_| None), EngineConfig::default());
    }

    #[test]
    fn lookup_values_are_applied() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("LOG_LEVEL", "DEBUG"),
            ("LOG_OUTPUT", "stderr"),
            ("LOG_PRETTY", "true"),
            ("LOG_TIMESTAMP_FORMAT", "%s"),
        ]));
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.output, Output::Stderr);
        assert!(config.pretty_print);
        assert_eq!(config.timestamp_format.as_deref(), Some("%s"));
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("LOG_LEVEL", "verbose"),
            ("LOG_OUTPUT", "syslog"),
            ("LOG_PRETTY", "sometimes"),
            ("LOG_TIMESTAMP_FORMAT", "%Q"),
        ]));
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.output, Output::Stdout);
        assert!(!config.pretty_print);
        assert_eq!(config.timestamp_format, None);
    }

    #[test]
    fn invalid_timestamp_format_still_writes_records() {
        use crate::engine::Entry;
        use crate::test_util::TestWriter;

        let config = EngineConfig::from_lookup(lookup(&[("LOG_TIMESTAMP_FORMAT", "%Q")]));
        let writer = TestWriter::new();
        let engine = adapter::engine_builder()
            .formatter(config.formatter())
            .output(writer.clone())
            .build();
        let entry = Entry::new(engine);
        entry.log(Level::Error, "first");
        entry.log(Level::Info, "second");
        assert_eq!(writer.lines().len(), 2);
    }

    #[test]
    fn deserializes_partial_json() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"level":"error","disable_timestamp":true}"#).unwrap();
        assert_eq!(config.level, Level::Error);
        assert!(config.disable_timestamp);
        assert_eq!(config.output, Output::Stdout);
    }

    #[test]
    fn formatter_keeps_adapter_key_names() {
        let formatter = EngineConfig::default().formatter();
        assert_eq!(formatter.field_map.resolve(FieldKey::Time), "timestamp");
        assert_eq!(formatter.field_map.resolve(FieldKey::Msg), "message");
    }

    #[test]
    fn build_uses_configured_level() {
        let config = EngineConfig {
            level: Level::Fatal,
            ..Default::default()
        };
        assert_eq!(config.build().level(), Level::Fatal);
    }
}
