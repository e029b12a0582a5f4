//! Opening-hours schedule stored as an opaque JSON document.
//!
//! The directory never interprets a schedule; it only round-trips it. Clients
//! submit schedules either as JSON values or as JSON text inside form fields,
//! and unparseable text degrades to an empty object instead of failing the
//! request.

use serde_json::{Map, Value};
use tracing::debug;

/// Opaque schedule document.
///
/// # Examples
/// ```
/// use cuceifoods::domain::Schedule;
/// use serde_json::json;
///
/// let parsed = Schedule::from_text(r#"{"mon": "8-14"}"#);
/// assert_eq!(parsed.as_value(), &json!({"mon": "8-14"}));
///
/// let broken = Schedule::from_text("{not json");
/// assert_eq!(broken.as_value(), &json!({}));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule(Value);

impl Schedule {
    /// Parse schedule text, substituting `{}` when it is not valid JSON.
    #[must_use]
    pub fn from_text(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self(value),
            Err(error) => {
                debug!(%error, "unparseable schedule replaced with empty document");
                Self::default()
            }
        }
    }

    /// Accept a JSON value. Strings are treated as embedded JSON text; any
    /// other value is stored verbatim.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::from_text(&text),
            other => Self(other),
        }
    }

    /// Borrow the stored document.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the stored document.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("", json!({}))]
    #[case("{oops", json!({}))]
    #[case("[1, 2]", json!([1, 2]))]
    #[case(r#"{"lun": ["08:00", "15:00"]}"#, json!({"lun": ["08:00", "15:00"]}))]
    fn text_is_parsed_leniently(#[case] raw: &str, #[case] expected: Value) {
        assert_eq!(Schedule::from_text(raw).into_value(), expected);
    }

    #[rstest]
    #[case(json!("{\"a\": 1}"), json!({"a": 1}))]
    #[case(json!("garbage"), json!({}))]
    #[case(json!({"a": 1}), json!({"a": 1}))]
    #[case(json!(42), json!(42))]
    fn values_are_stored_verbatim_unless_strings(#[case] input: Value, #[case] expected: Value) {
        assert_eq!(Schedule::from_value(input).into_value(), expected);
    }
}
