use crate::logger::Logger;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces a fresh logger handle, with an empty field set, per call.
pub type LoggerFactory = Arc<dyn Fn() -> Box<dyn Logger> + Send + Sync>;

/// Error type returned by [`Registry`] lookups.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no logger implementation registered under {0:?}")]
    UnknownLogger(String),

    #[error("no logger implementation selected")]
    NoLoggerSelected,
}

/// Named logger implementations.
///
/// Implementations are added with explicit [`Registry::register`] calls at
/// start-up; application code then picks one with [`Registry::use_logger`]
/// and obtains handles through [`Registry::new_logger`] without naming the
/// implementation type.
#[derive(Clone, Default)]
pub struct Registry {
    factories: HashMap<String, LoggerFactory>,
    selected: Option<String>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Registry")
            .field("factories", &names)
            .field("selected", &self.selected)
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the factory stored under `name`.
    pub fn register(&mut self, name: impl Into<String>, factory: LoggerFactory) {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            tracing::debug!(logger = %name, "replaced logger implementation");
        } else {
            tracing::debug!(logger = %name, "registered logger implementation");
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Make `name` the implementation returned by [`Registry::new_logger`].
    pub fn use_logger(&mut self, name: &str) -> Result<(), RegistryError> {
        if !self.contains(name) {
            return Err(RegistryError::UnknownLogger(name.to_string()));
        }
        self.selected = Some(name.to_string());
        Ok(())
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// New handle from the selected implementation.
    pub fn new_logger(&self) -> Result<Box<dyn Logger>, RegistryError> {
        let name = self.selected.as_deref().ok_or(RegistryError::NoLoggerSelected)?;
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RegistryError::UnknownLogger(name.to_string()))?;
        Ok(factory())
    }
}
