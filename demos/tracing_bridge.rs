use json_log_adapter::init::{init_default_logger, init_tracing};
use json_log_adapter::{EngineConfig, Level, Logger};
use std::sync::Arc;

/// `tracing` events and logger handles end up in the same JSON stream.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig {
        level: Level::Debug,
        ..Default::default()
    };
    let (engine, registry) = init_default_logger(&config)?;
    init_tracing(Arc::clone(&engine))?;

    tracing::info!(db = "custom", "emitted through tracing");
    registry.new_logger()?.info("emitted through the logger contract");

    engine.set_level(Level::Error);
    tracing::info!("suppressed by the shared threshold");
    tracing::error!(code = 503, "upstream unavailable");

    Ok(())
}
