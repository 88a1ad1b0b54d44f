// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Configuration file path discovery

use std::path::{Path, PathBuf};

const APP_DIR: &str = "events-directory";
const CONFIG_FILE: &str = "config.toml";

/// Configuration file paths for different scopes
#[derive(Debug, Clone)]
pub struct Paths {
    pub system: PathBuf,
    pub user: PathBuf,
    pub cli_config: Option<PathBuf>,
}

/// Discover configuration file paths for the current environment
///
/// `cli_config` is the file passed with `--config`, if any.
pub fn discover_paths(cli_config: Option<&Path>) -> Paths {
    Paths {
        system: get_system_config_path(),
        user: get_user_config_path(),
        cli_config: cli_config.map(Path::to_path_buf),
    }
}

/// Get system configuration path based on platform
fn get_system_config_path() -> PathBuf {
    if cfg!(target_os = "macos") {
        PathBuf::from("/Library/Application Support").join(APP_DIR).join(CONFIG_FILE)
    } else if cfg!(target_os = "windows") {
        PathBuf::from(std::env::var("ProgramData").unwrap_or_else(|_| "C:\\ProgramData".into()))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    } else {
        PathBuf::from("/etc").join(APP_DIR).join(CONFIG_FILE)
    }
}

/// Get user configuration path, honouring EVD_HOME
fn get_user_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("EVD_HOME") {
        return PathBuf::from(home).join(CONFIG_FILE);
    }

    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_discovery() {
        let paths = discover_paths(Some(Path::new("/tmp/picker.toml")));
        assert!(paths.system.to_string_lossy().contains(APP_DIR));
        assert!(paths.user.ends_with(CONFIG_FILE));
        assert_eq!(paths.cli_config, Some(PathBuf::from("/tmp/picker.toml")));
        assert!(discover_paths(None).cli_config.is_none());
    }
}
