//! TOML settings for the featconf tool.
//!
//! Looked up as `featconf.toml` in the working directory unless a path is
//! given with `--settings` (or `FEATCONF_SETTINGS`).  Every field has a
//! default, so an absent default file or a partial file both work:
//!
//! ```toml
//! [editor]
//! begin_marker = "CONFIGURE_EYECATCH_BEGIN"
//! end_marker = "CONFIGURE_EYECATCH_END"
//! define_prefix = "ENABLE_"
//! case_policy = "sensitive"
//! default_config_path = "Grbl_Esp32/src/Config.h"
//! atomic_write = true
//!
//! [features]
//! names = ["BLUETOOTH", "WIFI", "HTTP"]
//!
//! [logging]
//! log_level = "warn"
//! ```
//!
//! A file that is named explicitly must exist; only the implicit default
//! file may be missing.

use std::path::{Path, PathBuf};

use featconf_core::domain::profile::{
    DEFAULT_BEGIN_MARKER, DEFAULT_DEFINE_PREFIX, DEFAULT_END_MARKER, GRBL_ESP32_FEATURES,
};
use featconf_core::{CasePolicy, EditorProfile};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Settings file looked up in the working directory when none is named.
pub const DEFAULT_SETTINGS_FILE: &str = "featconf.toml";

/// Header edited when `--configfile` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "Grbl_Esp32/src/Config.h";

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error reading settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub editor: EditorSettings,
    #[serde(default)]
    pub features: FeatureSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Marker pair, define prefix and target path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorSettings {
    #[serde(default = "default_begin_marker")]
    pub begin_marker: String,
    #[serde(default = "default_end_marker")]
    pub end_marker: String,
    #[serde(default = "default_define_prefix")]
    pub define_prefix: String,
    /// `"sensitive"` or `"insensitive"`.
    #[serde(default)]
    pub case_policy: CasePolicy,
    /// Relative paths resolve against the working directory.
    #[serde(default = "default_config_path")]
    pub default_config_path: PathBuf,
    /// Replace the header through a sibling temp file and rename.
    #[serde(default = "default_true")]
    pub atomic_write: bool,
}

/// Recognised feature names, without the define prefix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureSettings {
    #[serde(default = "default_feature_names")]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_begin_marker() -> String {
    DEFAULT_BEGIN_MARKER.to_string()
}
fn default_end_marker() -> String {
    DEFAULT_END_MARKER.to_string()
}
fn default_define_prefix() -> String {
    DEFAULT_DEFINE_PREFIX.to_string()
}
fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}
fn default_true() -> bool {
    true
}
fn default_feature_names() -> Vec<String> {
    GRBL_ESP32_FEATURES.iter().map(|s| s.to_string()).collect()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            begin_marker: default_begin_marker(),
            end_marker: default_end_marker(),
            define_prefix: default_define_prefix(),
            case_policy: CasePolicy::default(),
            default_config_path: default_config_path(),
            atomic_write: default_true(),
        }
    }
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            names: default_feature_names(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Builds the editor profile described by these settings.
    ///
    /// The profile is not validated here; the use case does that when it is
    /// constructed.
    pub fn profile(&self) -> EditorProfile {
        EditorProfile {
            begin_marker: self.editor.begin_marker.clone(),
            end_marker: self.editor.end_marker.clone(),
            define_prefix: self.editor.define_prefix.clone(),
            case_policy: self.editor.case_policy,
            features: self.features.names.clone(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses settings from TOML text.  `path` is only used in error messages.
///
/// # Errors
///
/// Returns [`SettingsError::Parse`] if the TOML is malformed or a field has
/// the wrong type.
pub fn parse_settings(content: &str, path: &Path) -> Result<Settings, SettingsError> {
    toml::from_str(content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads settings from `explicit`, or from [`DEFAULT_SETTINGS_FILE`] in the
/// working directory when `explicit` is `None`.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] if an explicitly named file cannot be read
/// (including when it does not exist) or the default file exists but cannot
/// be read, and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            debug!(path = %path.display(), "loading settings");
            parse_settings(&content, &path)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && explicit.is_none() => {
            Ok(Settings::default())
        }
        Err(source) => Err(SettingsError::Io { path, source }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
