use std::collections::BTreeMap;

/// Structured fields attached to a logger context.
///
/// Keys are kept sorted, which is also the order they are serialized in.
pub type Fields = BTreeMap<String, serde_json::Value>;

/// Build a [`Fields`] map from `key => value` pairs.
///
/// Values go through `serde_json::Value::from`, so strings, integers,
/// floats and booleans can be mixed freely.
///
/// ```
/// use json_log_adapter::fields;
///
/// let f = fields! { "user_id" => 42, "reason" => "invalid password" };
/// assert_eq!(f["user_id"], 42);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(::std::string::String::from($key), $crate::__private::Value::from($value));
        )+
        fields
    }};
}
