//! Helpers that turn collected command-line parameters into request bodies.
//!
//! Parameters are gathered into a flat JSON object keyed by snake_case names.
//! Before submission some keys are renamed to their canonical field names,
//! enum-like values are upper-cased and related keys are grouped under a
//! common parent.

use serde_json::{Map, Value};

pub type Parameters = Map<String, Value>;

/// Rename each `(from, to)` key that is present.
pub fn rename_keys(parameters: &mut Parameters, renames: &[(&str, &str)]) {
    for (from, to) in renames {
        if let Some(value) = parameters.remove(*from) {
            parameters.insert(to.to_string(), value);
        }
    }
}

/// Upper-case the string values of `keys`. Other values are left alone.
pub fn upcase_values(parameters: &mut Parameters, keys: &[&str]) {
    for key in keys {
        if let Some(Value::String(value)) = parameters.get_mut(*key) {
            *value = value.to_uppercase();
        }
    }
}

/// Move the present `keys` into a nested object under `destination`.
///
/// The destination is created even when none of the keys is present, so the
/// resulting document always has the same shape.
pub fn move_to_key(parameters: &mut Parameters, destination: &str, keys: &[&str]) {
    let mut nested = match parameters.remove(destination) {
        Some(Value::Object(existing)) => existing,
        _ => Map::new(),
    };

    for key in keys {
        if let Some(value) = parameters.remove(*key) {
            nested.insert(key.to_string(), value);
        }
    }

    parameters.insert(destination.to_string(), Value::Object(nested));
}

/// Drop `null` values so optional arguments never reach the server.
pub fn drop_nulls(parameters: &mut Parameters) {
    parameters.retain(|_, value| !value.is_null());
}

pub fn get_str<'a>(parameters: &'a Parameters, key: &str) -> Option<&'a str> {
    parameters.get(key).and_then(Value::as_str)
}

pub fn get_bool(parameters: &Parameters, key: &str, default: bool) -> bool {
    parameters.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub fn get_u64(parameters: &Parameters, key: &str) -> Option<u64> {
    parameters.get(key).and_then(Value::as_u64)
}

/// String list value; a single string counts as a one-element list.
pub fn get_str_list(parameters: &Parameters, key: &str) -> Vec<String> {
    match parameters.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(item)) => vec![item.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parameters(value: Value) -> Parameters {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_rename_keys() {
        let mut params = parameters(json!({"negative_cache": true, "name": "npm"}));
        rename_keys(
            &mut params,
            &[
                ("negative_cache", "negative_cache_enabled"),
                ("strict_content", "strict_content_type_validation"),
            ],
        );
        assert_eq!(
            Value::Object(params),
            json!({"negative_cache_enabled": true, "name": "npm"})
        );
    }

    #[test]
    fn test_upcase_values() {
        let mut params = parameters(json!({"write_policy": "allow_once", "depth": 2, "name": "yum"}));
        upcase_values(&mut params, &["write_policy", "depth", "layout_policy"]);
        assert_eq!(
            Value::Object(params),
            json!({"write_policy": "ALLOW_ONCE", "depth": 2, "name": "yum"})
        );
    }

    #[test]
    fn test_move_to_key() {
        let mut params = parameters(json!({"name": "p", "downloaded": 7, "regex": ".*"}));
        move_to_key(&mut params, "criteria", &["downloaded", "updated", "regex"]);
        assert_eq!(
            Value::Object(params),
            json!({"name": "p", "criteria": {"downloaded": 7, "regex": ".*"}})
        );

        let mut params = parameters(json!({"name": "p"}));
        move_to_key(&mut params, "criteria", &["downloaded"]);
        assert_eq!(Value::Object(params), json!({"name": "p", "criteria": {}}));
    }

    #[test]
    fn test_accessors() {
        let mut params = parameters(json!({
            "members": ["a", "b"],
            "policy": "one",
            "flag": true,
            "age": 1440,
            "missing": null
        }));
        drop_nulls(&mut params);
        assert!(!params.contains_key("missing"));
        assert_eq!(get_str_list(&params, "members"), vec!["a", "b"]);
        assert_eq!(get_str_list(&params, "policy"), vec!["one"]);
        assert!(get_bool(&params, "flag", false));
        assert!(get_bool(&params, "other", true));
        assert_eq!(get_u64(&params, "age"), Some(1440));
        assert_eq!(get_str(&params, "policy"), Some("one"));
    }
}
