//! Content-derived record identities.
//!
//! An identity is the SHA-1 of a value's canonical JSON form. Object keys are
//! serialized in sorted order and any top-level `objectID` is dropped first,
//! so an identity never depends on a previously assigned one.

use serde_json::{Map, Value};

/// Key under which identities are stored.
pub const OBJECT_ID_KEY: &str = "objectID";

/// Identity of an arbitrary JSON value.
pub fn fingerprint(value: &Value) -> String {
    match value {
        Value::Object(map) if map.contains_key(OBJECT_ID_KEY) => {
            let stripped: Map<String, Value> = map
                .iter()
                .filter(|(key, _)| key.as_str() != OBJECT_ID_KEY)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            digest(&Value::Object(stripped))
        }
        _ => digest(value),
    }
}

fn digest(value: &Value) -> String {
    let canonical = canonical_json(value);
    sha1_smol::Sha1::from(canonical.as_bytes())
        .digest()
        .to_string()
}

/// Compact JSON with object keys sorted, whatever map ordering serde_json
/// was built with.
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let body: Vec<String> = entries
                .into_iter()
                .map(|(key, value)| format!("{}:{}", Value::from(key.as_str()), canonical_json(value)))
                .collect();
            format!("{{{}}}", body.join(","))
        }
        Value::Array(items) => {
            let body: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", body.join(","))
        }
        scalar => scalar.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_different_content_different_id() {
        let a = fingerprint(&json!({ "content": "foo" }));
        let b = fingerprint(&json!({ "content": "bar" }));
        assert_ne!(a, b);
    }

    #[test]
    fn test_object_id_is_ignored() {
        let a = fingerprint(&json!({ "content": "foo", "objectID": "AAA" }));
        let b = fingerprint(&json!({ "content": "foo", "objectID": "BBB" }));
        let c = fingerprint(&json!({ "content": "foo" }));
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_nested_object_id_still_counts() {
        let a = fingerprint(&json!({ "meta": { "objectID": "AAA" } }));
        let b = fingerprint(&json!({ "meta": { "objectID": "BBB" } }));
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_order_is_irrelevant() {
        let a: Value = serde_json::from_str(r#"{"a":1,"b":[true,null,"x"]}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"b":[true,null,"x"],"a":1}"#).unwrap();
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_is_sha1_hex() {
        let id = fingerprint(&json!({ "content": "foo" }));
        assert_eq!(id.len(), 40);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        // Stable across runs and processes
        assert_eq!(id, fingerprint(&json!({ "content": "foo" })));
    }

    #[test]
    fn test_canonical_json_escapes_keys() {
        let value = json!({ "q\"uote": "a\nb", "n": [1, 2.5] });
        assert_eq!(canonical_json(&value), r#"{"n":[1,2.5],"q\"uote":"a\nb"}"#);
    }

    proptest! {
        #[test]
        fn prop_object_id_never_changes_fingerprint(
            content in ".{0,40}",
            id_a in "[A-Za-z0-9]{1,12}",
            id_b in "[A-Za-z0-9]{1,12}",
        ) {
            let a = fingerprint(&json!({ "content": content, "objectID": id_a }));
            let b = fingerprint(&json!({ "content": content, "objectID": id_b }));
            prop_assert_eq!(a, b);
        }
    }
}
