//! Small helpers for reading loosely typed JSON documents.

use serde_json::Value;

/// Follow a dotted path (`"location.coordinates"`) through nested objects.
pub fn path<'a>(value: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(value, |current, key| current.as_object()?.get(key))
}

/// Render a field as display text.
///
/// Strings are trimmed, numbers are formatted, and objects are unwrapped through
/// their `display`, `text`, `value` or `name` keys. Empty results become `None`.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => ["display", "text", "value", "name"]
            .iter()
            .find_map(|key| map.get(*key).and_then(text)),
        _ => None,
    }
}

/// First path among `candidates` that renders as text.
pub fn first_text(value: &Value, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find_map(|candidate| path(value, candidate).and_then(text))
}

/// Read a number that may have been stored as a string.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First key among `keys` on `object` holding a number.
pub fn first_number(object: &Value, keys: &[&str]) -> Option<f64> {
    let map = object.as_object()?;
    keys.iter()
        .find_map(|key| map.get(*key).and_then(number))
}

/// Strict boolean read; anything but JSON `true` is `false`.
pub fn flag(value: &Value, dotted: &str) -> bool {
    path(value, dotted).and_then(Value::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_path_walks_nested_objects() {
        let doc = json!({"location": {"coordinates": {"latitude": 39.0}}});
        assert_eq!(
            path(&doc, "location.coordinates.latitude").and_then(Value::as_f64),
            Some(39.0)
        );
        assert!(path(&doc, "location.missing").is_none());
        assert!(path(&doc, "location.coordinates.latitude.deeper").is_none());
    }

    #[test]
    fn test_text_unwraps_objects() {
        assert_eq!(text(&json!({"display": "Every Saturday"})).as_deref(), Some("Every Saturday"));
        assert_eq!(text(&json!({"name": "Library"})).as_deref(), Some("Library"));
        assert_eq!(text(&json!("  ")), None);
        assert_eq!(text(&json!(21401)).as_deref(), Some("21401"));
        assert_eq!(text(&json!({"other": 1})), None);
        assert_eq!(text(&json!(null)), None);
    }

    #[test]
    fn test_number_accepts_strings() {
        assert_eq!(number(&json!("39.5")), Some(39.5));
        assert_eq!(number(&json!(-76)), Some(-76.0));
        assert_eq!(number(&json!("north")), None);
    }

    #[test]
    fn test_flag_is_strict() {
        let doc = json!({"filters": {"isFree": "true", "other": true}});
        assert!(!flag(&doc, "filters.isFree"));
        assert!(flag(&doc, "filters.other"));
        assert!(!flag(&doc, "filters.missing"));
    }
}
