//! Field extraction over loosely-shaped API records.
//!
//! The origin has renamed payload fields across deployments, so every
//! canonical field is read through an ordered candidate-key list (see
//! [`crate::keys`]). The first present, non-null, non-empty value wins.

use serde_json::Value;

/// Returns the first candidate key's value as trimmed text, or `default`.
///
/// Missing keys, null values and empty strings are all treated as absent.
/// Numbers and booleans are rendered in their display form; a non-object
/// `item` yields `default`.
pub fn pick(item: &Value, keys: &[&str], default: &str) -> String {
    let Some(map) = item.as_object() else {
        return default.to_string();
    };
    for key in keys {
        match map.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => {
                if !s.is_empty() {
                    return s.trim().to_string();
                }
            }
            Some(other) => return other.to_string().trim().to_string(),
        }
    }
    default.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_matching_key_wins() {
        let item = json!({"a": "", "b": "second", "c": "third"});
        assert_eq!(pick(&item, &["a", "b", "c"], ""), "second");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let item = json!({"purpose": "  Dividend  "});
        assert_eq!(pick(&item, &["purpose"], ""), "Dividend");
    }

    #[test]
    fn skips_null_and_missing() {
        let item = json!({"a": null});
        assert_eq!(pick(&item, &["missing", "a", "b"], "dflt"), "dflt");
    }

    #[test]
    fn default_returned_exactly() {
        let item = json!({});
        assert_eq!(pick(&item, &["symbol"], "TCS"), "TCS");
    }

    #[test]
    fn coerces_numbers() {
        let item = json!({"faceVal": 10});
        assert_eq!(pick(&item, &["faceVal"], ""), "10");
    }

    #[test]
    fn non_object_item_yields_default() {
        assert_eq!(pick(&json!(["x"]), &["a"], "d"), "d");
        assert_eq!(pick(&Value::Null, &["a"], "d"), "d");
    }
}
