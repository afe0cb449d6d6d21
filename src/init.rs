use crate::adapter::{self, DEFAULT_LOGGER_NAME};
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::layer::EngineLayer;
use crate::registry::{Registry, RegistryError};
use std::sync::Arc;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;

/// Error type returned by the initialization helpers.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to install global tracing subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Build an engine from `config` and a registry with the default logger
/// registered and selected.
///
/// **Returns**
/// - the shared [`Engine`], for level and output changes at runtime;
/// - a [`Registry`] whose [`Registry::new_logger`] hands out
///   [`DefaultLogger`](crate::DefaultLogger) handles bound to that engine.
pub fn init_default_logger(config: &EngineConfig) -> Result<(Arc<Engine>, Registry), InitError> {
    let engine = config.build();
    let mut registry = Registry::new();
    adapter::register(&mut registry, Arc::clone(&engine));
    registry.use_logger(DEFAULT_LOGGER_NAME)?;
    Ok((engine, registry))
}

/// Install a global `tracing` subscriber that writes every event through
/// `engine`.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(engine: Arc<Engine>) -> Result<(), InitError> {
    let subscriber = tracing_subscriber::registry().with(EngineLayer::new(engine));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
