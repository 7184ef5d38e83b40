//! Configuration file loading with precedence handling.

use super::keybindings::KeyBindings;
use crate::list::DEFAULT_MAX_IDLE_TEMPLATES;
use crate::render::TextMetrics;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "NOTIVIEW_CONFIG";
/// Environment variable overriding the theme.
pub const THEME_ENV: &str = "NOTIVIEW_THEME";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown fields.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A `[keybindings]` entry names an unknown action or an unparsable key.
    #[error("Invalid key binding {action} = {key:?}")]
    InvalidKey {
        /// Action name from the config.
        action: String,
        /// Key string from the config.
        key: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; missing fields fall back to defaults.
/// Corresponds to `~/.config/notiview/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Theme name (`dark`, `light`, `high-contrast`).
    #[serde(default)]
    pub theme: Option<String>,

    /// Pixel width of one terminal cell used for row measurement.
    #[serde(default)]
    pub cell_width_px: Option<u32>,

    /// Unbound row templates kept for reuse.
    #[serde(default)]
    pub max_idle_templates: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Key overrides: action name → key string.
    ///
    /// ```toml
    /// [keybindings]
    /// clear = "x"
    /// clear_all = "Ctrl+Delete"
    /// ```
    #[serde(default)]
    pub keybindings: Option<BTreeMap<String, String>>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Theme name.
    pub theme: String,
    /// Cell width in pixels.
    pub cell_width_px: u32,
    /// Idle template cap.
    pub max_idle_templates: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Key overrides on top of the default bindings.
    pub keybindings: BTreeMap<String, String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            cell_width_px: TextMetrics::DEFAULT_CELL_WIDTH_PX,
            max_idle_templates: DEFAULT_MAX_IDLE_TEMPLATES,
            log_file_path: default_log_path(),
            keybindings: BTreeMap::new(),
        }
    }
}

impl ResolvedConfig {
    /// Default bindings with the configured overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKey`] for the first bad override.
    pub fn key_bindings(&self) -> Result<KeyBindings, ConfigError> {
        let mut bindings = KeyBindings::default();
        bindings.apply_overrides(&self.keybindings)?;
        Ok(bindings)
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/notiview/notiview.log` on Linux, the platform
/// equivalent elsewhere, or `notiview.log` in the current directory when no
/// state directory is known.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("notiview").join("notiview.log"),
        None => PathBuf::from("notiview.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path, `~/.config/notiview/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("notiview").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `NOTIVIEW_CONFIG` environment variable
/// 3. Default path
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        theme: config.theme.unwrap_or(defaults.theme),
        cell_width_px: config.cell_width_px.unwrap_or(defaults.cell_width_px),
        max_idle_templates: config
            .max_idle_templates
            .unwrap_or(defaults.max_idle_templates),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        keybindings: config.keybindings.unwrap_or(defaults.keybindings),
    }
}

/// Apply `NOTIVIEW_THEME`.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(theme) = std::env::var(THEME_ENV) {
        config.theme = theme;
    }
    config
}

/// Apply CLI argument overrides; these win over every other source.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    theme_override: Option<String>,
) -> ResolvedConfig {
    if let Some(theme) = theme_override {
        config.theme = theme;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
