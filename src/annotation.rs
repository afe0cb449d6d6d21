use crate::fields::Fields;
use serde_json::Value;
use std::error::Error;

/// Field holding the error's `Display` output.
pub const ERROR_MESSAGE_KEY: &str = "error.message";

/// Field holding the error's bare type name.
pub const ERROR_KIND_KEY: &str = "error.kind";

/// Structured description of an error value, ready to be attached to a
/// logger as `error.message` and `error.kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorAnnotation {
    pub message: String,
    pub kind: String,
}

impl ErrorAnnotation {
    /// Describe `err`.
    ///
    /// The kind is the static type name of `E` with module paths removed and
    /// references, raw pointers and `Box`/`Arc` wrappers peeled off, so
    /// `MyError`, `&MyError` and `Box<MyError>` all report `MyError`. A trait
    /// object has no concrete name to recover and reports e.g. `dyn Error`.
    pub fn new<E>(err: &E) -> Self
    where
        E: Error + ?Sized,
    {
        ErrorAnnotation {
            message: err.to_string(),
            kind: kind_name(std::any::type_name::<E>()),
        }
    }

    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(ERROR_MESSAGE_KEY.to_string(), Value::String(self.message));
        fields.insert(ERROR_KIND_KEY.to_string(), Value::String(self.kind));
        fields
    }
}

const WRAPPERS: [&str; 2] = ["Box<", "Arc<"];

/// Bare type name for a full `type_name` string.
pub(crate) fn kind_name(full: &str) -> String {
    let stripped = strip_paths(full);
    let mut name = stripped.trim();
    loop {
        if let Some(rest) = name.strip_prefix('&') {
            name = rest.strip_prefix("mut ").unwrap_or(rest).trim_start();
        } else if let Some(rest) = name
            .strip_prefix("*const ")
            .or_else(|| name.strip_prefix("*mut "))
        {
            name = rest.trim_start();
        } else if let Some(inner) = WRAPPERS
            .iter()
            .find_map(|w| name.strip_prefix(w).and_then(|r| r.strip_suffix('>')))
        {
            name = inner.trim();
        } else {
            break;
        }
    }
    name.to_string()
}

/// Drop every `path::` qualifier, keeping generic arguments intact.
fn strip_paths(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            segment.push(c);
        } else if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            segment.clear();
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);
    out
}
