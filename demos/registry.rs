use json_log_adapter::init::init_default_logger;
use json_log_adapter::{fields, infof, EngineConfig, Level, Logger, LoggerExt};

/// Obtain a logger through the registry, attach request context and log a
/// failure. Configuration comes from `LOG_LEVEL`, `LOG_OUTPUT`, etc.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (_engine, registry) = init_default_logger(&EngineConfig::from_env())?;

    let log = registry.new_logger()?;
    log.set_level(Level::Debug);
    log.info("starting service");

    let request = log.add_fields(fields! { "request_id" => "req-456", "user_id" => 42 });
    infof!(request, "handled in {:.1}ms", 12.345);

    let err = std::fs::read_to_string("/definitely/missing").unwrap_err();
    request.with_error(Some(&err)).error("authentication failed");

    Ok(())
}
