//! Turning failed responses into one readable message.

use serde_json::Value;

/// Keys checked first in an error body, in order.
pub const DEFAULT_ERROR_KEYS: &[&str] = &["detail", "non_field_errors"];

/// Pick a message out of a REST error body.
///
/// Tries `preferred` keys in order, then the first field, in the order the
/// server sent them, that carries a message. Field errors are prefixed with
/// the field name unless the field was asked for explicitly.
pub fn describe_error(body: &Value, preferred: &[&str]) -> Option<String> {
  match body {
    Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
    Value::Array(items) => items.iter().find_map(first_message),
    Value::Object(map) => {
      for key in preferred {
        if let Some(msg) = map.get(*key).and_then(first_message) {
          return Some(msg);
        }
      }
      map
        .iter()
        .find_map(|(field, v)| first_message(v).map(|msg| format!("{}: {}", field, msg)))
    }
    _ => None,
  }
}

fn first_message(value: &Value) -> Option<String> {
  match value {
    Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
    Value::Array(items) => items.iter().find_map(first_message),
    _ => None,
  }
}
