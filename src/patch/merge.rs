//! Override merge logic
//!
//! Merge semantics:
//! - Top-level keys in the override set: SET wholesale (override wins)
//! - All other top-level keys: preserved untouched
//! - Nested structures under unrelated keys are opaque values; there is
//!   no deep merge at any depth

use serde_json::{Map, Value};

use super::overrides::OverrideSet;

/// Apply an override set to a document.
///
/// A non-object `base` (corrupt or unexpected content) degrades to an empty
/// document before the overrides are set. Applying the same override set
/// twice yields the same document (idempotence).
pub fn apply_overrides(base: Value, overrides: &OverrideSet) -> Value {
    let mut doc = match base {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    for (key, value) in overrides.iter() {
        doc.insert(key.clone(), value.clone());
    }

    Value::Object(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn overrides(value: Value) -> OverrideSet {
        OverrideSet::from_value(value).unwrap()
    }

    #[test]
    fn test_override_wins() {
        let base = json!({"ipv6": true});
        let result = apply_overrides(base, &overrides(json!({"ipv6": false})));
        assert_eq!(result["ipv6"], false);
    }

    #[test]
    fn test_unrelated_keys_preserved() {
        let base = json!({"log-level": "debug", "experimental": true});
        let result = apply_overrides(base, &overrides(json!({"ipv6": false})));

        assert_eq!(result["log-level"], "debug");
        assert_eq!(result["experimental"], true);
        assert_eq!(result["ipv6"], false);
    }

    #[test]
    fn test_new_keys_added() {
        let base = json!({});
        let result = apply_overrides(
            base,
            &overrides(json!({"dns": ["8.8.8.8", "8.8.4.4"]})),
        );
        assert_eq!(result["dns"], json!(["8.8.8.8", "8.8.4.4"]));
    }

    #[test]
    fn test_nested_value_replaced_wholesale() {
        // No deep merge: an overridden key replaces the whole subtree.
        let base = json!({"features": {"buildkit": true, "cgroup": "v2"}});
        let result = apply_overrides(
            base,
            &overrides(json!({"features": {"buildkit": false}})),
        );

        assert_eq!(result["features"], json!({"buildkit": false}));
    }

    #[test]
    fn test_nested_value_under_unrelated_key_untouched() {
        let base = json!({"registry-mirrors": {"example": {"a": 1}}});
        let result = apply_overrides(base, &overrides(json!({"ipv6": false})));

        assert_eq!(result["registry-mirrors"], json!({"example": {"a": 1}}));
    }

    #[test]
    fn test_non_object_base_degrades_to_empty() {
        let result = apply_overrides(json!("garbage"), &overrides(json!({"ipv6": false})));
        assert_eq!(result, json!({"ipv6": false}));

        let result = apply_overrides(json!([1, 2, 3]), &overrides(json!({"ipv6": false})));
        assert_eq!(result, json!({"ipv6": false}));
    }

    #[test]
    fn test_null_override_allowed() {
        let base = json!({"fixed-cidr-v6": "2001:db8::/64"});
        let result = apply_overrides(base, &overrides(json!({"fixed-cidr-v6": null})));
        assert!(result["fixed-cidr-v6"].is_null());
    }

    #[test]
    fn test_idempotent() {
        let base = json!({"log-level": "debug", "ipv6": true});
        let ovr = overrides(json!({"ipv6": false, "dns": ["8.8.8.8"]}));

        let once = apply_overrides(base, &ovr);
        let twice = apply_overrides(once.clone(), &ovr);
        assert_eq!(once, twice);
    }
}
