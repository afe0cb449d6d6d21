//! Structured JSON logging behind a small [`Logger`] contract.
//!
//! Every record is one JSON object per line with keys sorted
//! alphabetically:
//!
//! ```text
//! {"level":"info","logger1":"ok","message":"logger1","timestamp":"2024-03-01T10:20:30+01:00"}
//! ```
//!
//! ```
//! use json_log_adapter::{fields, init::init_default_logger, EngineConfig, Level, Logger};
//!
//! let (_engine, registry) = init_default_logger(&EngineConfig::default()).unwrap();
//! let log = registry.new_logger().unwrap();
//! log.set_level(Level::Debug);
//! let log = log.add_fields(fields! { "request_id" => "abc" });
//! json_log_adapter::infof!(log, "served in {}ms", 12);
//! ```

pub mod level;
pub mod fields;
pub mod record;
pub mod formatter;
pub mod engine;
pub mod annotation;
pub mod logger;
pub mod adapter;
pub mod registry;
pub mod env;
pub mod config;
pub mod layer;
pub mod init;

#[cfg(test)]
mod test_util;

pub use adapter::DefaultLogger;
pub use annotation::ErrorAnnotation;
pub use config::EngineConfig;
pub use engine::Engine;
pub use fields::Fields;
pub use level::Level;
pub use logger::{Logger, LoggerExt};
pub use registry::{LoggerFactory, Registry, RegistryError};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::Value;
}
