use crate::engine::Engine;
use crate::fields::Fields;
use crate::level::Level;
use crate::record::LogRecord;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that writes `tracing` events through an
/// [`Engine`], so code instrumented with `tracing` macros shares the JSON
/// output of the [`Logger`](crate::Logger) handles.
///
/// `TRACE`/`DEBUG` map to `debug`, `INFO`/`WARN` to `info` and `ERROR` to
/// `error`. The engine threshold applies as usual.
pub struct EngineLayer {
    engine: Arc<Engine>,
}

impl EngineLayer {
    pub fn new(engine: Arc<Engine>) -> Self {
        EngineLayer { engine }
    }
}

impl<S> Layer<S> for EngineLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = Level::from(event.metadata().level());
        if !self.engine.is_enabled(level) {
            return;
        }

        let mut fields = Fields::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor::new(&mut fields, &mut message);
        event.record(&mut visitor);

        let record = LogRecord::new(level, message.unwrap_or_default(), fields);
        self.engine.emit(&record);
    }
}

/// Collects event fields into [`Fields`], pulling out `message`.
pub(crate) struct FieldVisitor<'a> {
    fields: &'a mut Fields,
    message: &'a mut Option<String>,
}

impl<'a> FieldVisitor<'a> {
    pub(crate) fn new(fields: &'a mut Fields, message: &'a mut Option<String>) -> Self {
        FieldVisitor { fields, message }
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        // The event message arrives here as `fmt::Arguments`.
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(field.name().to_string(), Value::String(format!("{:?}", value)));
        }
    }
}
