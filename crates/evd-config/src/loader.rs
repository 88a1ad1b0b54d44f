// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! TOML loading and JSON validation functionality

use anyhow::{Context, Result};
use serde_json::Value as J;
use std::path::Path;

use crate::Scope;

/// Parse TOML string to JSON value for schema validation
pub fn parse_toml_to_json(toml_str: &str) -> Result<J> {
    let toml: toml::Value = toml_str.parse::<toml::Value>()?;
    // toml::Value implements Serialize; round-trip through serde_json
    Ok(serde_json::to_value(toml)?)
}

/// Validate JSON against the configuration schema
pub fn validate_against_schema(v: &J) -> Result<()> {
    use jsonschema::{Draft, JSONSchema};
    use std::sync::OnceLock;

    static VALIDATOR: OnceLock<Result<JSONSchema, String>> = OnceLock::new();
    let validator = VALIDATOR.get_or_init(|| {
        let schema = serde_json::to_value(schemars::schema_for!(crate::types::SchemaRoot))
            .map_err(|e| e.to_string())?;
        JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| e.to_string())
    });
    let validator = match validator {
        Ok(validator) => validator,
        Err(e) => anyhow::bail!("Config schema compilation failed: {}", e),
    };

    if let Err(errors) = validator.validate(v) {
        let error_msg = errors.map(|e| e.to_string()).collect::<Vec<_>>().join("\n  - ");
        anyhow::bail!("Config schema validation failed:\n  - {}", error_msg);
    }

    Ok(())
}

/// A loaded configuration layer
#[derive(Debug, Clone)]
pub struct Layer {
    pub scope: Scope,
    pub json: J,
}

/// Load and validate a configuration layer from file
pub fn read_layer_from_file(path: &Path, scope: Scope) -> Result<Layer> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading config file {:?}", path))?;

    let json = parse_toml_to_json(&content)?;
    validate_against_schema(&json).with_context(|| format!("validating {:?}", path))?;

    Ok(Layer { scope, json })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_parsing() {
        let json = parse_toml_to_json(
            r#"
            service-base-url = "https://events.example.org/api/"
            [picker]
            debounce-ms = 250
        "#,
        )
        .unwrap();
        assert_eq!(json["service-base-url"], "https://events.example.org/api/");
        assert_eq!(json["picker"]["debounce-ms"], 250);
    }

    #[test]
    fn test_schema_validation() {
        let json = parse_toml_to_json(
            r#"
            request-timeout-ms = 5000
            [picker]
            search-limit = 20
            bulk-limit = 100
        "#,
        )
        .unwrap();
        assert!(validate_against_schema(&json).is_ok());
    }

    #[test]
    fn test_invalid_schema_validation() {
        let unknown_key = parse_toml_to_json("ui = \"tui\"").unwrap();
        assert!(validate_against_schema(&unknown_key).is_err());

        let out_of_range = parse_toml_to_json("[picker]\nbulk-limit = 500").unwrap();
        assert!(validate_against_schema(&out_of_range).is_err());

        let wrong_type = parse_toml_to_json("[picker]\ndebounce-ms = \"soon\"").unwrap();
        assert!(validate_against_schema(&wrong_type).is_err());
    }
}
