//! The logging contract application code programs against.

use crate::annotation::ErrorAnnotation;
use crate::fields::Fields;
use crate::level::Level;
use std::error::Error;
use std::fmt;

/// A leveled, structured logger.
///
/// Handles are cheap to create and safe to share between threads. Field
/// attachment comes in two flavours:
///
/// - [`Logger::add_fields`] returns an independent handle; neither side sees
///   fields added to the other afterwards.
/// - [`Logger::add_fields_to_current`] mutates the receiver's context and
///   returns a handle **aliasing** it. Every handle aliasing that context
///   sees every field attached through any of them.
pub trait Logger: Send + Sync {
    /// New handle with `fields` added on top of the current ones.
    fn add_fields(&self, fields: Fields) -> Box<dyn Logger>;

    /// Add `fields` to the receiver's own context and return a handle that
    /// shares it.
    fn add_fields_to_current(&self, fields: Fields) -> Box<dyn Logger>;

    /// Set the minimum severity on the backing engine. Affects every logger
    /// bound to the same engine.
    fn set_level(&self, level: Level);

    fn debug(&self, message: &str);
    fn debugf(&self, args: fmt::Arguments<'_>);

    fn info(&self, message: &str);
    fn infof(&self, args: fmt::Arguments<'_>);

    fn error(&self, message: &str);
    fn errorf(&self, args: fmt::Arguments<'_>);

    /// Write a fatal record and terminate the process. Never returns.
    fn fatal(&self, message: &str) -> !;

    /// Formatted [`Logger::fatal`]. Never returns.
    fn fatalf(&self, args: fmt::Arguments<'_>) -> !;

    /// Attach an already described error. `None` returns a handle that
    /// behaves exactly like the receiver.
    fn annotate(&self, annotation: Option<ErrorAnnotation>) -> Box<dyn Logger>;
}

/// Generic helpers available on every [`Logger`], including trait objects.
pub trait LoggerExt: Logger {
    /// Attach `error.message` and `error.kind` describing `err`.
    ///
    /// `None` adds nothing and returns a handle sharing the receiver's
    /// context. `Some` goes through [`Logger::add_fields`], so the receiver
    /// is never modified.
    ///
    /// The kind is taken from the static type `E`. A trait object such as
    /// `&dyn Error` or `Box<dyn Error>` has no concrete name and reports
    /// `dyn Error`; pass the concrete error type (or downcast first) when
    /// `error.kind` matters.
    fn with_error<E>(&self, err: Option<&E>) -> Box<dyn Logger>
    where
        E: Error + ?Sized,
    {
        self.annotate(err.map(ErrorAnnotation::new))
    }
}

impl<L: Logger + ?Sized> LoggerExt for L {}

/// Debug record with a formatted message: `debugf!(log, "val={:2.2}", x)`.
#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        {
            use $crate::Logger as _;
            $logger.debugf(::std::format_args!($($arg)+))
        }
    };
}

/// Info record with a formatted message.
#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        {
            use $crate::Logger as _;
            $logger.infof(::std::format_args!($($arg)+))
        }
    };
}

/// Error record with a formatted message.
#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        {
            use $crate::Logger as _;
            $logger.errorf(::std::format_args!($($arg)+))
        }
    };
}

/// Fatal record with a formatted message, then process exit.
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)+) => {
        {
            use $crate::Logger as _;
            $logger.fatalf(::std::format_args!($($arg)+))
        }
    };
}
