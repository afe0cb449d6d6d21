use crate::fields::Fields;
use crate::formatter::JsonFormatter;
use crate::level::Level;
use crate::record::LogRecord;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Function called after a fatal record has been written.
pub type ExitFn = fn(i32) -> !;

/// Exit code used by fatal emission.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Backend that owns the severity threshold, the formatter and the output
/// writer.
///
/// One engine is normally shared (`Arc<Engine>`) by every logger an
/// application creates. The output writer is guarded by a mutex so records
/// from different threads never interleave.
pub struct Engine {
    threshold: AtomicU8,
    formatter: JsonFormatter,
    out: Mutex<Box<dyn Write + Send>>,
    exit: ExitFn,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("level", &self.level())
            .field("formatter", &self.formatter)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Current minimum severity.
    pub fn level(&self) -> Level {
        Level::from_u8(self.threshold.load(Ordering::Relaxed))
    }

    /// Change the minimum severity for every logger bound to this engine.
    pub fn set_level(&self, level: Level) {
        self.threshold.store(level.as_u8(), Ordering::Relaxed);
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    pub fn formatter(&self) -> &JsonFormatter {
        &self.formatter
    }

    /// Replace the output writer. Records already written are unaffected.
    pub fn set_output<W>(&self, out: W)
    where
        W: Write + Send + 'static,
    {
        *self.lock_out() = Box::new(out);
    }

    /// Render and write one record if its level passes the threshold.
    ///
    /// Failures are reported on stderr; they never reach the caller.
    pub fn emit(&self, record: &LogRecord) {
        if !self.is_enabled(record.level) {
            return;
        }

        let line = match self.formatter.format(record) {
            Ok(line) => line,
            Err(e) => {
                eprintln!("failed to format log record: {}", e);
                return;
            }
        };

        let mut out = self.lock_out();
        if let Err(e) = out.write_all(&line).and_then(|_| out.flush()) {
            eprintln!("failed to write log record: {}", e);
        }
    }

    /// Flush the writer and hand control to the exit hook.
    pub fn exit(&self, code: i32) -> ! {
        if let Err(e) = self.lock_out().flush() {
            eprintln!("failed to flush log output: {}", e);
        }
        (self.exit)(code)
    }

    fn lock_out(&self) -> std::sync::MutexGuard<'_, Box<dyn Write + Send>> {
        self.out.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builder for [`Engine`].
///
/// Defaults: `Info` threshold, default [`JsonFormatter`], stdout, and
/// `std::process::exit` as exit hook.
pub struct EngineBuilder {
    level: Level,
    formatter: JsonFormatter,
    out: Option<Box<dyn Write + Send>>,
    exit: ExitFn,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        EngineBuilder {
            level: Level::Info,
            formatter: JsonFormatter::default(),
            out: None,
            exit: std::process::exit,
        }
    }
}

impl EngineBuilder {
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn formatter(mut self, formatter: JsonFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn output<W>(mut self, out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.out = Some(Box::new(out));
        self
    }

    /// Override what happens after a fatal record. The hook must not return.
    pub fn exit_fn(mut self, exit: ExitFn) -> Self {
        self.exit = exit;
        self
    }

    pub fn build(self) -> Arc<Engine> {
        Arc::new(Engine {
            threshold: AtomicU8::new(self.level.as_u8()),
            formatter: self.formatter,
            out: Mutex::new(self.out.unwrap_or_else(|| Box::new(io::stdout()))),
            exit: self.exit,
        })
    }
}

/// An immutable field set bound to an engine.
///
/// `with_fields` returns a new entry and leaves the receiver untouched.
#[derive(Debug, Clone)]
pub struct Entry {
    engine: Arc<Engine>,
    fields: Fields,
}

impl Entry {
    /// Fresh entry with no fields.
    pub fn new(engine: Arc<Engine>) -> Self {
        Entry {
            engine,
            fields: Fields::new(),
        }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Copy of this entry with `fields` merged in. Existing keys are
    /// overwritten by the new values.
    pub fn with_fields(&self, fields: Fields) -> Entry {
        let mut entry = self.clone();
        entry.fields.extend(fields);
        entry
    }

    pub fn log(&self, level: Level, message: &str) {
        if self.engine.is_enabled(level) {
            self.engine
                .emit(&LogRecord::new(level, message, self.fields.clone()));
        }
    }

    /// Like [`Entry::log`], but the message is only rendered when the level
    /// is enabled.
    pub fn logf(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.engine.is_enabled(level) {
            self.engine
                .emit(&LogRecord::new(level, args.to_string(), self.fields.clone()));
        }
    }

    /// Write a fatal record, then exit through the engine's hook.
    pub fn fatal(&self, message: &str) -> ! {
        self.log(Level::Fatal, message);
        self.engine.exit(FATAL_EXIT_CODE)
    }

    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.logf(Level::Fatal, args);
        self.engine.exit(FATAL_EXIT_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::TestWriter;
    use serde_json::Value;

    fn engine(level: Level) -> (Arc<Engine>, TestWriter) {
        let writer = TestWriter::new();
        let engine = Engine::builder()
            .level(level)
            .output(writer.clone())
            .build();
        (engine, writer)
    }

    #[test]
    fn threshold_filters_lower_levels() {
        let (engine, writer) = engine(Level::Error);
        let entry = Entry::new(engine);
        entry.log(Level::Debug, "dropped");
        entry.log(Level::Info, "dropped");
        entry.log(Level::Error, "kept");
        let lines = writer.lines();
        assert_eq!(lines.len(), 1);
        let value: Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["msg"], "kept");
    }

    #[test]
    fn set_level_is_visible_to_all_entries() {
        let (engine, writer) = engine(Level::Info);
        let a = Entry::new(Arc::clone(&engine));
        let b = Entry::new(Arc::clone(&engine));
        engine.set_level(Level::Debug);
        a.log(Level::Debug, "a");
        b.log(Level::Debug, "b");
        assert_eq!(writer.lines().len(), 2);
    }

    #[test]
    fn with_fields_does_not_touch_receiver() {
        let (engine, _) = engine(Level::Info);
        let base = Entry::new(engine);
        let derived = base.with_fields(crate::fields! { "k" => "v" });
        assert!(base.fields().is_empty());
        assert_eq!(derived.fields()["k"], "v");
    }

    #[test]
    fn with_fields_overwrites_same_key() {
        let (engine, _) = engine(Level::Info);
        let entry = Entry::new(engine)
            .with_fields(crate::fields! { "k" => "old", "other" => 1 })
            .with_fields(crate::fields! { "k" => "new" });
        assert_eq!(entry.fields()["k"], "new");
        assert_eq!(entry.fields()["other"], 1);
    }

    #[test]
    fn set_output_redirects_records() {
        let (engine, first) = engine(Level::Info);
        let entry = Entry::new(Arc::clone(&engine));
        entry.log(Level::Info, "one");
        let second = TestWriter::new();
        engine.set_output(second.clone());
        entry.log(Level::Info, "two");
        assert_eq!(first.lines().len(), 1);
        assert_eq!(second.lines().len(), 1);
    }

    #[test]
    fn logf_renders_arguments() {
        let (engine, writer) = engine(Level::Debug);
        Entry::new(engine).logf(Level::Debug, format_args!("val={:2.2}", 12.345));
        let value: Value = serde_json::from_str(&writer.lines()[0]).unwrap();
        assert_eq!(value["msg"], "val=12.35");
    }

    fn panicking_exit(code: i32) -> ! {
        panic!("exit({code})")
    }

    #[test]
    fn fatal_writes_then_calls_exit_hook() {
        let writer = TestWriter::new();
        let engine = Engine::builder()
            .level(Level::Fatal)
            .output(writer.clone())
            .exit_fn(panicking_exit)
            .build();
        let entry = Entry::new(engine);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            entry.fatal("going down");
        }));
        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("exit(1)"));
        let value: Value = serde_json::from_str(&writer.lines()[0]).unwrap();
        assert_eq!(value["level"], "fatal");
        assert_eq!(value["msg"], "going down");
    }
}
