// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized logging for events directory binaries
//!
//! Every binary initializes `tracing` through this crate so that log levels,
//! output format, and file placement behave the same everywhere. Terminal UIs
//! always log to a file because stdout belongs to the rendered screen.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// Re-export Level for convenience
pub use tracing::Level;

const APP_DIR: &str = "events-directory";

/// Output format for log messages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable plaintext format
    #[default]
    Plaintext,
    /// Structured JSON format
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Plaintext => write!(f, "plaintext"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// CLI log level enum for clap integration
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CliLogLevel {
    /// Only error conditions
    Error,
    /// Errors and warnings
    Warn,
    /// Errors, warnings, and informational messages
    #[default]
    Info,
    /// All above plus debug information
    Debug,
    /// All above plus detailed tracing
    Trace,
}

impl From<CliLogLevel> for Level {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

impl std::str::FromStr for CliLogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(CliLogLevel::Error),
            "warn" | "warning" => Ok(CliLogLevel::Warn),
            "info" => Ok(CliLogLevel::Info),
            "debug" => Ok(CliLogLevel::Debug),
            "trace" => Ok(CliLogLevel::Trace),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Standardized CLI logging arguments, flattened into each binary's clap struct
///
/// TUI binaries always log to file. Other binaries log to the console unless
/// `--log-file` or `--log-dir` is given.
#[derive(Clone, Debug, Default, clap::Args, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliLoggingArgs {
    /// Log verbosity level
    #[arg(long, value_enum, help = "Log verbosity level (default: info)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<CliLogLevel>,

    /// Log output format
    #[arg(long, value_enum, help = "Log output format (default: plaintext)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<LogFormat>,

    /// Directory for log files
    #[arg(long, help = "Directory for log files (default: platform specific)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Log filename
    #[arg(long, help = "Log filename")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

impl CliLoggingArgs {
    /// Initialize logging based on the parsed CLI arguments
    ///
    /// * `component` - binary name, used for the default log filename and the env filter
    /// * `is_tui` - TUI binaries always log to file
    pub fn init(self, component: &str, is_tui: bool) -> anyhow::Result<()> {
        self.init_with_default_level(component, is_tui, CliLogLevel::Info)
    }

    pub fn init_with_default_level(
        self,
        component: &str,
        is_tui: bool,
        default_level: CliLogLevel,
    ) -> anyhow::Result<()> {
        let level = self.log_level.unwrap_or(default_level).into();
        let format = self.log_format.unwrap_or_default();

        if self.logs_to_file(is_tui) {
            let log_path = self.resolve_log_path(component);
            init_to_file(component, level, format, &log_path)
        } else {
            init(component, level, format)
        }
    }

    pub fn logs_to_file(&self, is_tui: bool) -> bool {
        is_tui || self.log_file.is_some() || self.log_dir.is_some()
    }

    /// Resolve the log file path
    ///
    /// An absolute `--log-file` wins. A relative one is placed under `--log-dir`
    /// when given. Without `--log-file`, the file is `<component>.log` under
    /// `--log-dir` or the platform log directory.
    pub fn resolve_log_path(&self, component: &str) -> PathBuf {
        match (&self.log_file, &self.log_dir) {
            (Some(file), _) if Path::new(file).is_absolute() => PathBuf::from(file),
            (Some(file), Some(dir)) => Path::new(dir).join(file),
            (Some(file), None) => PathBuf::from(file),
            (None, Some(dir)) => Path::new(dir).join(format!("{}.log", component)),
            (None, None) => get_standard_log_path_for_component(component),
        }
    }
}

/// Get the standard log file path for a specific component
pub fn get_standard_log_path_for_component(component: &str) -> PathBuf {
    let base_path = get_standard_log_path();
    let parent = base_path.parent().unwrap_or(Path::new("/tmp"));
    parent.join(format!("{}.log", component))
}

/// Get the standard log file path for the current OS
///
/// - Windows: %APPDATA%\events-directory\events-directory.log
/// - macOS: ~/Library/Logs/events-directory/events-directory.log
/// - Linux: ~/.local/share/events-directory/events-directory.log
pub fn get_standard_log_path() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        path.push("Library");
        path.push("Logs");
        path.push(APP_DIR);
        path.push(format!("{}.log", APP_DIR));
        path
    }

    #[cfg(not(target_os = "macos"))]
    {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("/tmp"));
        path.push(APP_DIR);
        path.push(format!("{}.log", APP_DIR));
        path
    }
}

/// Initialize console logging with the specified component name, default level, and format
pub fn init(component: &str, default_level: Level, format: LogFormat) -> anyhow::Result<()> {
    init_with_writer(component, default_level, format, io::stderr)
}

/// Initialize logging to a file, creating parent directories as needed
pub fn init_to_file(
    component: &str,
    default_level: Level,
    format: LogFormat,
    log_path: &Path,
) -> anyhow::Result<()> {
    use std::fs;

    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = fs::OpenOptions::new().create(true).append(true).open(log_path)?;

    init_with_writer(component, default_level, format, std::sync::Mutex::new(log_file))
}

/// Initialize logging with a custom writer
///
/// `RUST_LOG` overrides the default filter when set.
pub fn init_with_writer<W>(
    component: &str,
    default_level: Level,
    format: LogFormat,
    writer: W,
) -> anyhow::Result<()>
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(component, default_level)));

    match format {
        LogFormat::Json => {
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).json();
            #[cfg(debug_assertions)]
            let layer = layer.with_file(true).with_line_number(true);

            tracing_subscriber::registry().with(filter).with(layer).try_init()?;
        }
        LogFormat::Plaintext => {
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);
            #[cfg(debug_assertions)]
            let layer = layer.with_file(true).with_line_number(true);

            tracing_subscriber::registry().with(filter).with(layer).try_init()?;
        }
    }

    Ok(())
}

/// Env filter directive: the default level globally and for the component's crate target
fn default_filter(component: &str, default_level: Level) -> String {
    format!(
        "{},{}={}",
        default_level,
        component.replace('-', "_"),
        default_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_log_level_conversion() {
        assert_eq!(Level::from(CliLogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(CliLogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(CliLogLevel::Info), Level::INFO);
        assert_eq!(Level::from(CliLogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(CliLogLevel::Trace), Level::TRACE);
        assert_eq!("WARNING".parse::<CliLogLevel>(), Ok(CliLogLevel::Warn));
        assert!("loud".parse::<CliLogLevel>().is_err());
    }

    #[test]
    fn test_tui_always_logs_to_file() {
        let args = CliLoggingArgs::default();
        assert!(!args.logs_to_file(false));
        assert!(args.logs_to_file(true));

        let with_dir = CliLoggingArgs {
            log_dir: Some("/tmp/evd".to_string()),
            ..Default::default()
        };
        assert!(with_dir.logs_to_file(false));
    }

    #[test]
    fn test_log_path_resolution() {
        let dir_only = CliLoggingArgs {
            log_dir: Some("/var/log/evd".to_string()),
            ..Default::default()
        };
        assert_eq!(
            dir_only.resolve_log_path("evd-pick"),
            PathBuf::from("/var/log/evd/evd-pick.log")
        );

        let relative_file = CliLoggingArgs {
            log_dir: Some("/var/log/evd".to_string()),
            log_file: Some("picker.log".to_string()),
            ..Default::default()
        };
        assert_eq!(
            relative_file.resolve_log_path("evd-pick"),
            PathBuf::from("/var/log/evd/picker.log")
        );

        let absolute_file = CliLoggingArgs {
            log_dir: Some("/var/log/evd".to_string()),
            log_file: Some("/tmp/picker.log".to_string()),
            ..Default::default()
        };
        assert_eq!(
            absolute_file.resolve_log_path("evd-pick"),
            PathBuf::from("/tmp/picker.log")
        );
    }

    #[test]
    fn test_standard_log_path_for_component() {
        let path = get_standard_log_path_for_component("evd-pick");
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("evd-pick.log"));
        assert!(path_str.contains(APP_DIR));
    }

    #[test]
    fn test_default_filter_uses_crate_target() {
        assert_eq!(default_filter("evd-pick", Level::DEBUG), "DEBUG,evd_pick=DEBUG");
    }

    #[test]
    fn test_init_to_file_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("evd.log");
        // A global subscriber may already be installed by another test; only the file matters here
        let _ = init_to_file("evd-test", Level::INFO, LogFormat::Plaintext, &path);
        assert!(path.exists());
    }
}
