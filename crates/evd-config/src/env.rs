// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Environment variable and CLI flag overlays

use anyhow::Result;
use serde_json::Value as J;
use std::collections::HashMap;

pub const ENV_PREFIX: &str = "EVD";

/// `EVD_*` variables that locate configuration instead of carrying it
const RESERVED_KEYS: &[&str] = &["home"];

/// Create JSON overlay from EVD_* environment variables
///
/// `EVD_SERVICE_BASE_URL` maps to `service-base-url` and a double underscore
/// nests, so `EVD_PICKER__DEBOUNCE_MS` maps to `picker.debounce-ms`.
pub fn env_overlay() -> Result<J> {
    env_overlay_from(None)
}

/// Same as [`env_overlay`], reading from `vars` instead of the process environment
pub fn env_overlay_from(vars: Option<HashMap<String, String>>) -> Result<J> {
    let built = config::Config::builder()
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(vars),
        )
        .build()?;

    let mut map = built.try_deserialize::<serde_json::Map<String, J>>()?;
    map.retain(|key, _| !RESERVED_KEYS.contains(&key.to_lowercase().as_str()));
    Ok(kebab_keys(J::Object(map)))
}

/// Create JSON overlay from CLI flag key=value pairs
pub fn flags_overlay(kv_pairs: &[(&str, &str)]) -> J {
    let mut root = serde_json::json!({});
    for (k, v) in kv_pairs {
        crate::merge::insert_dotted(&mut root, k, parse_flag_value(v));
    }
    root
}

/// Flags arrive as strings; numbers and booleans are recovered so they pass schema validation
fn parse_flag_value(raw: &str) -> J {
    if let Ok(n) = raw.parse::<u64>() {
        return J::from(n);
    }
    if let Ok(n) = raw.parse::<i64>() {
        return J::from(n);
    }
    match raw {
        "true" => J::Bool(true),
        "false" => J::Bool(false),
        _ => J::String(raw.to_string()),
    }
}

fn kebab_keys(value: J) -> J {
    match value {
        J::Object(map) => J::Object(
            map.into_iter().map(|(k, v)| (k.to_lowercase().replace('_', "-"), kebab_keys(v))).collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overlay_maps_names_to_kebab_keys() {
        let vars = HashMap::from([
            ("EVD_SERVICE_BASE_URL".to_string(), "http://localhost:8000/api/".to_string()),
            ("EVD_PICKER__DEBOUNCE_MS".to_string(), "120".to_string()),
            ("OTHER_VALUE".to_string(), "ignored".to_string()),
            ("EVD_HOME".to_string(), "/tmp/evd".to_string()),
        ]);
        let overlay = env_overlay_from(Some(vars)).unwrap();
        assert_eq!(overlay["service-base-url"], "http://localhost:8000/api/");
        assert_eq!(overlay["picker"]["debounce-ms"], 120);
        assert!(overlay.get("other-value").is_none());
        assert!(overlay.get("home").is_none());
    }

    #[test]
    fn test_env_overlay_empty_without_prefixed_vars() {
        let overlay = env_overlay_from(Some(HashMap::new())).unwrap();
        assert!(overlay.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_flags_overlay() {
        let overlay = flags_overlay(&[
            ("picker.search-limit", "25"),
            ("service-base-url", "http://localhost/api/"),
        ]);
        assert_eq!(overlay["picker"]["search-limit"], 25);
        assert_eq!(overlay["service-base-url"], "http://localhost/api/");
    }
}
