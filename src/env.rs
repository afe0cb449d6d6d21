//! Environment variable names read by [`EngineConfig::from_env`].
//!
//! These are purely helpers; the engine itself never touches the
//! environment.
//!
//! [`EngineConfig::from_env`]: crate::config::EngineConfig::from_env

/// Minimum level: `debug`, `info`, `error` or `fatal`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Destination stream: `stdout` or `stderr`.
pub const LOG_OUTPUT_ENV: &str = "LOG_OUTPUT";

/// Indent records when set to a true value (`1`, `true`, `yes`, `on`).
pub const LOG_PRETTY_ENV: &str = "LOG_PRETTY";

/// `chrono` strftime pattern for the `timestamp` key.
pub const LOG_TIMESTAMP_FORMAT_ENV: &str = "LOG_TIMESTAMP_FORMAT";

/// Read an environment variable, treating unset, empty and non-UTF-8 values
/// as absent.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a boolean switch. Unknown spellings yield `None`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_spellings() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn missing_variable_is_none() {
        assert_eq!(env_var("JSON_LOG_ADAPTER_SURELY_UNSET"), None);
    }
}
