// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! JSON merging functionality

use serde_json::Value as J;

/// Merge two JSON values with deep object merging and array replacement
///
/// Objects are merged recursively, scalars/arrays replace the left value.
pub fn merge_two_json(base: &mut J, layer: J) {
    match (base, layer) {
        (J::Object(a), J::Object(b)) => {
            for (k, v) in b {
                merge_two_json(a.entry(k).or_insert(J::Null), v);
            }
        }
        // Arrays are replaced wholesale
        (a @ J::Array(_), J::Array(b)) => *a = J::Array(b),
        (_, J::Null) => {}
        (a, b) => *a = b,
    }
}

/// Insert a value at a dotted path, creating intermediate objects
pub fn insert_dotted(root: &mut J, dotted: &str, v: J) {
    let mut parts = dotted.split('.').filter(|p| !p.is_empty()).peekable();
    let mut cur = root;

    while let Some(part) = parts.next() {
        if !cur.is_object() {
            *cur = J::Object(Default::default());
        }
        let J::Object(map) = cur else {
            return;
        };
        if parts.peek().is_none() {
            map.insert(part.to_string(), v);
            return;
        }
        cur = map.entry(part.to_string()).or_insert_with(|| J::Object(Default::default()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_deep_objects() {
        let mut base = json!({"picker": {"debounce-ms": 300}});
        merge_two_json(&mut base, json!({"picker": {"search-limit": 20}}));
        assert_eq!(base["picker"]["debounce-ms"], 300);
        assert_eq!(base["picker"]["search-limit"], 20);
    }

    #[test]
    fn test_merge_arrays_replace_and_null_keeps_left() {
        let mut base = json!({"arr": [1, 2], "service-base-url": "http://a/"});
        merge_two_json(&mut base, json!({"arr": [3], "service-base-url": null}));
        assert_eq!(base["arr"], json!([3]));
        assert_eq!(base["service-base-url"], "http://a/");
    }

    #[test]
    fn test_insert_dotted() {
        let mut root = json!({"picker": "scalar"});
        insert_dotted(&mut root, "picker.debounce-ms", json!(150));
        insert_dotted(&mut root, "request-timeout-ms", json!(5000));
        assert_eq!(root["picker"]["debounce-ms"], 150);
        assert_eq!(root["request-timeout-ms"], 5000);
    }
}
