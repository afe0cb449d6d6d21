//! [`Logger`] implementation backed by the JSON [`Engine`].

use crate::annotation::ErrorAnnotation;
use crate::engine::{Engine, EngineBuilder, Entry};
use crate::fields::Fields;
use crate::formatter::{FieldKey, FieldMap, JsonFormatter};
use crate::level::Level;
use crate::logger::Logger;
use crate::registry::{LoggerFactory, Registry};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

/// Name the adapter registers itself under.
pub const DEFAULT_LOGGER_NAME: &str = "default-logger";

/// Formatter producing `{"level":..,"message":..,"timestamp":..}` records.
pub fn standard_formatter() -> JsonFormatter {
    JsonFormatter {
        field_map: FieldMap::default()
            .rename(FieldKey::Time, "timestamp")
            .rename(FieldKey::Msg, "message"),
        ..Default::default()
    }
}

/// Engine builder preloaded with [`standard_formatter`].
pub fn engine_builder() -> EngineBuilder {
    Engine::builder().formatter(standard_formatter())
}

/// Register the adapter under [`DEFAULT_LOGGER_NAME`], bound to `engine`.
pub fn register(registry: &mut Registry, engine: Arc<Engine>) {
    registry.register(DEFAULT_LOGGER_NAME, DefaultLogger::factory(engine));
}

/// Handle over one shared, mutable field context.
///
/// # Aliasing
///
/// `Clone` does **not** copy the fields: the clone points at the same
/// context, exactly like a handle returned by
/// [`add_fields_to_current`](Logger::add_fields_to_current). Use
/// [`DefaultLogger::fork`] (or [`Logger::add_fields`]) for an independent
/// copy. Handles from separate [`DefaultLogger::new`] calls never share
/// fields.
#[derive(Clone)]
pub struct DefaultLogger {
    context: Arc<RwLock<Entry>>,
}

impl fmt::Debug for DefaultLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultLogger")
            .field("fields", self.read().fields())
            .finish()
    }
}

impl DefaultLogger {
    /// Fresh logger with an empty field set.
    pub fn new(engine: Arc<Engine>) -> Self {
        Self::from_entry(Entry::new(engine))
    }

    /// Factory producing a fresh [`DefaultLogger`] per call.
    pub fn factory(engine: Arc<Engine>) -> LoggerFactory {
        Arc::new(move || Box::new(DefaultLogger::new(Arc::clone(&engine))) as Box<dyn Logger>)
    }

    fn from_entry(entry: Entry) -> Self {
        DefaultLogger {
            context: Arc::new(RwLock::new(entry)),
        }
    }

    /// Snapshot of the fields currently attached to this context.
    pub fn fields(&self) -> Fields {
        self.read().fields().clone()
    }

    pub fn engine(&self) -> Arc<Engine> {
        Arc::clone(self.read().engine())
    }

    /// Independent logger carrying the current fields plus `fields`.
    pub fn fork(&self, fields: Fields) -> DefaultLogger {
        let entry = self.read().with_fields(fields);
        Self::from_entry(entry)
    }

    /// Merge `fields` into the shared context and return an alias of it.
    pub fn extend_current(&self, fields: Fields) -> DefaultLogger {
        {
            let mut entry = self.context.write().unwrap_or_else(PoisonError::into_inner);
            *entry = entry.with_fields(fields);
        }
        self.clone()
    }

    /// `true` when both handles read and write the same field context.
    pub fn shares_context_with(&self, other: &DefaultLogger) -> bool {
        Arc::ptr_eq(&self.context, &other.context)
    }

    fn read(&self) -> RwLockReadGuard<'_, Entry> {
        self.context.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Logger for DefaultLogger {
    fn add_fields(&self, fields: Fields) -> Box<dyn Logger> {
        Box::new(self.fork(fields))
    }

    fn add_fields_to_current(&self, fields: Fields) -> Box<dyn Logger> {
        Box::new(self.extend_current(fields))
    }

    fn set_level(&self, level: Level) {
        self.read().engine().set_level(level);
    }

    fn debug(&self, message: &str) {
        self.read().log(Level::Debug, message);
    }

    fn debugf(&self, args: fmt::Arguments<'_>) {
        self.read().logf(Level::Debug, args);
    }

    fn info(&self, message: &str) {
        self.read().log(Level::Info, message);
    }

    fn infof(&self, args: fmt::Arguments<'_>) {
        self.read().logf(Level::Info, args);
    }

    fn error(&self, message: &str) {
        self.read().log(Level::Error, message);
    }

    fn errorf(&self, args: fmt::Arguments<'_>) {
        self.read().logf(Level::Error, args);
    }

    fn fatal(&self, message: &str) -> ! {
        let entry = self.read().clone();
        entry.fatal(message)
    }

    fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        let entry = self.read().clone();
        entry.fatalf(args)
    }

    fn annotate(&self, annotation: Option<ErrorAnnotation>) -> Box<dyn Logger> {
        match annotation {
            None => Box::new(self.clone()),
            Some(annotation) => self.add_fields(annotation.into_fields()),
        }
    }
}
