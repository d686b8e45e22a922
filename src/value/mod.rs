//! # Display-Value Resolver
//!
//! Turns raw host field values into the strings shown on the canvas and in
//! print output.
//!
//! Host field values arrive in many untagged JSON shapes. Each one is first
//! classified into a closed [`FieldValue`], then formatted by an exhaustive
//! match, so an unrecognized shape degrades to a placeholder instead of a raw
//! JSON dump.
//!
//! ## Classification order for objects
//!
//! | Key present | Variant |
//! |-------------|---------|
//! | `text`, `name`, `url`, `title`, `label` (first truthy) | `Text` |
//! | `recordIds` (array) | `LinkedRecords` |
//! | `options` (array) | `Options` |
//! | `token` or `type == "file"` | `Attachment` |
//! | `id` + `en_name` | `UserRef` |
//! | anything else | `Opaque` |

mod display;

pub use display::{
    DEFAULT_FONT_SIZE, DEFAULT_LINE_HEIGHT, DisplayValue, EMPTY_TEXT_LABEL, RecordView,
    UNBOUND_TABLE_LABEL, auto_fit_height, component_display,
};

use std::fmt;

use chrono::{Local, TimeZone};
use serde_json::{Map, Value};

/// Shown for empty and falsy values.
pub const EMPTY_PLACEHOLDER: &str = "-";

/// Shown for objects that match no known shape.
pub const OPAQUE_PLACEHOLDER: &str = "[complex data]";

/// Shown for attachments without a name.
pub const ATTACHMENT_PLACEHOLDER: &str = "Attachment";

/// Host field type codes that carry millisecond timestamps.
pub const DATE_FIELD_TYPES: [i64; 3] = [5, 1001, 1002];

/// Object keys tried in order for a direct text representation.
const TEXT_KEYS: [&str; 5] = ["text", "name", "url", "title", "label"];

/// A classified host field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// `null`, `false`, `0`, `""` or an empty list
    Empty,
    /// A number, string or `true`
    Scalar(String),
    /// Millisecond timestamp from a date-typed field
    DateMillis(i64),
    /// An object with a direct text representation
    Text(String),
    /// Link to other records; holds the linked count
    LinkedRecords(usize),
    /// Select-field option labels
    Options(Vec<String>),
    /// File attachment, with its name when one is given
    Attachment(Option<String>),
    /// A user identity shown by display name
    UserRef(String),
    /// A list of values, formatted element by element
    List(Vec<FieldValue>),
    /// An object with no recognized shape
    Opaque,
}

impl FieldValue {
    /// Classify a raw value. `field_type` is the host field type code, if known.
    pub fn classify(value: &Value, field_type: Option<i64>) -> Self {
        if is_falsy(value) {
            return FieldValue::Empty;
        }

        if let (Some(code), Value::Number(n)) = (field_type, value) {
            if DATE_FIELD_TYPES.contains(&code) {
                if let Some(ms) = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)) {
                    return FieldValue::DateMillis(ms);
                }
            }
        }

        match value {
            Value::Array(items) => FieldValue::List(
                items
                    .iter()
                    .map(|item| FieldValue::classify(item, None))
                    .collect(),
            ),
            Value::Object(map) => classify_object(map),
            other => FieldValue::Scalar(scalar_string(other)),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Empty => f.write_str(EMPTY_PLACEHOLDER),
            FieldValue::Scalar(s) | FieldValue::Text(s) | FieldValue::UserRef(s) => f.write_str(s),
            FieldValue::DateMillis(ms) => match Local.timestamp_millis_opt(*ms).single() {
                Some(dt) => write!(f, "{}", dt.format("%Y/%m/%d %H:%M:%S")),
                None => write!(f, "{ms}"),
            },
            FieldValue::LinkedRecords(n) => write!(f, "Linked records ({n})"),
            FieldValue::Options(labels) => f.write_str(&labels.join(", ")),
            FieldValue::Attachment(name) => {
                f.write_str(name.as_deref().unwrap_or(ATTACHMENT_PLACEHOLDER))
            }
            FieldValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            FieldValue::Opaque => f.write_str(OPAQUE_PLACEHOLDER),
        }
    }
}

/// Format a raw host value for display.
///
/// ```
/// use folio::value::format_field_value;
/// use serde_json::json;
///
/// assert_eq!(format_field_value(&json!(null), None), "-");
/// assert_eq!(format_field_value(&json!({"text": "Paid"}), None), "Paid");
/// assert_eq!(format_field_value(&json!([{"text": "a"}, {"text": "b"}]), None), "a, b");
/// ```
pub fn format_field_value(value: &Value, field_type: Option<i64>) -> String {
    FieldValue::classify(value, field_type).to_string()
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

/// String form of a non-container value. Integral floats print without a
/// fractional part.
fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// The key's value as display text, if it is present and truthy.
fn truthy_text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .filter(|v| !is_falsy(v))
        .filter(|v| !v.is_object() && !v.is_array())
        .map(scalar_string)
}

fn classify_object(map: &Map<String, Value>) -> FieldValue {
    if let Some(text) = TEXT_KEYS.iter().find_map(|key| truthy_text(map, key)) {
        return FieldValue::Text(text);
    }

    if let Some(Value::Array(ids)) = map.get("recordIds") {
        return FieldValue::LinkedRecords(ids.len());
    }

    if let Some(Value::Array(options)) = map.get("options") {
        let labels = options
            .iter()
            .map(|opt| match opt {
                Value::Object(o) => truthy_text(o, "text")
                    .or_else(|| truthy_text(o, "name"))
                    .unwrap_or_else(|| OPAQUE_PLACEHOLDER.to_string()),
                other => scalar_string(other),
            })
            .collect();
        return FieldValue::Options(labels);
    }

    let is_file = map.get("type").and_then(Value::as_str) == Some("file");
    if map.get("token").is_some_and(|t| !is_falsy(t)) || is_file {
        return FieldValue::Attachment(truthy_text(map, "name"));
    }

    if map.get("id").is_some_and(|id| !is_falsy(id)) {
        if let Some(name) = truthy_text(map, "en_name") {
            return FieldValue::UserRef(name);
        }
    }

    FieldValue::Opaque
}
