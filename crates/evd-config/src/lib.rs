// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Layered configuration for events directory tools
//!
//! Configuration is read from TOML files, `EVD_*` environment variables and
//! command-line flags. Every layer is converted to `serde_json::Value`,
//! validated against the schema generated from [`types::SchemaRoot`] and
//! deep-merged in precedence order. Consumers extract typed sections from
//! the merged JSON.

pub mod env;
pub mod extract;
pub mod loader;
pub mod merge;
pub mod paths;
pub mod types;

pub use types::{ClientSection, PickerSection, SchemaRoot};

use anyhow::Result;
use serde_json::Value as J;
use std::collections::BTreeMap;
use tracing::debug;

/// Origin of a configuration layer, lowest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scope {
    System,
    User,
    Env,
    CliConfig,
    Flags,
}

/// Final resolved configuration
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Merged JSON configuration
    pub json: J,
    /// Layer that supplied each dotted key
    pub winner: BTreeMap<String, Scope>,
}

impl Resolved {
    pub fn client(&self) -> Result<ClientSection> {
        extract::get(&self.json)
    }

    pub fn picker(&self) -> Result<PickerSection> {
        extract::get_at_or_default(&self.json, "picker")
    }
}

/// Load and merge all configuration layers
///
/// Precedence order: system < user < env < cli-config < flags. Missing files
/// are skipped; an explicitly requested `--config` file must exist.
pub fn load_all(paths: &paths::Paths, flag_sets: &[(&str, &str)]) -> Result<Resolved> {
    let env_layer = env::env_overlay()?;
    load_with_env(paths, env_layer, flag_sets)
}

/// [`load_all`] with a pre-computed environment layer
pub fn load_with_env(paths: &paths::Paths, env_layer: J, flag_sets: &[(&str, &str)]) -> Result<Resolved> {
    use Scope::*;

    let mut layers: Vec<(Scope, J)> = Vec::new();
    for (path, scope) in [(&paths.system, System), (&paths.user, User)] {
        if path.exists() {
            layers.push((scope, loader::read_layer_from_file(path, scope)?.json));
        }
    }

    loader::validate_against_schema(&env_layer)?;
    layers.push((Env, env_layer));

    if let Some(cli_config) = &paths.cli_config {
        layers.push((CliConfig, loader::read_layer_from_file(cli_config, CliConfig)?.json));
    }

    let flags_layer = env::flags_overlay(flag_sets);
    loader::validate_against_schema(&flags_layer)?;
    layers.push((Flags, flags_layer));

    let mut json = serde_json::json!({});
    let mut winner = BTreeMap::new();
    for (scope, layer) in layers {
        record_winners(&layer, scope, &mut winner, "");
        merge::merge_two_json(&mut json, layer);
    }
    debug!(?winner, "Configuration resolved");

    Ok(Resolved { json, winner })
}

fn record_winners(layer: &J, scope: Scope, winner: &mut BTreeMap<String, Scope>, prefix: &str) {
    match layer {
        J::Object(obj) => {
            for (k, v) in obj {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{}.{}", prefix, k)
                };
                record_winners(v, scope, winner, &key);
            }
        }
        J::Null => {}
        _ => {
            winner.insert(prefix.to_string(), scope);
        }
    }
}
