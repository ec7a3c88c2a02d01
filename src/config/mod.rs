//! Configuration for the viewer
//!
//! Configuration is loaded in order of precedence:
//! 1. Command-line flags (applied by the binary)
//! 2. Environment variables
//! 3. Config file (~/.config/mdblocks/config.toml)
//! 4. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod copy;
mod logging;
mod serialization;


pub use copy::{ClipboardBackend, CopyConfig, FileCopy};
pub use logging::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Theme override
pub const ENV_THEME: &str = "MDBLOCKS_THEME";
/// Set to 1/true to render as if advanced layout were unavailable
pub const ENV_BASIC_LAYOUT: &str = "MDBLOCKS_BASIC_LAYOUT";
/// Set to 1/true to disable the system clipboard
pub const ENV_NO_CLIPBOARD: &str = "MDBLOCKS_NO_CLIPBOARD";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Theme name or path to a .toml theme file
    pub theme: String,

    /// Whether grid and flow layouts (tables, image rows) are available
    pub advanced_layout: bool,

    /// Copy control behavior
    pub copy: CopyConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: crate::theme::DEFAULT_THEME.to_string(),
            advanced_layout: true,
            copy: CopyConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub theme: Option<String>,
    pub advanced_layout: Option<bool>,

    /// Optional [copy] section
    pub copy: Option<FileCopy>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/mdblocks/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("mdblocks").join("config.toml"))
    }

    /// Load configuration: env vars > file > defaults
    pub fn load() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::load_file_config(&path)?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(file, |key| std::env::var(key).ok()))
    }

    /// Read a config file; a missing file yields the defaults
    ///
    /// A file that exists but cannot be read or parsed is an error. A broken
    /// config should fail loudly instead of silently falling back to defaults
    /// while the user debugs the wrong thing.
    pub(crate) fn load_file_config(path: &Path) -> Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read config file {}", path.display())),
        }
    }

    /// Merge file settings with environment overrides
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // Theme: env > file > default
        let theme = env(ENV_THEME)
            .filter(|v| !v.trim().is_empty())
            .or(file.theme)
            .unwrap_or(defaults.theme);

        // Advanced layout: env can only turn it off
        let advanced_layout = if env(ENV_BASIC_LAYOUT).is_some_and(|v| is_truthy(&v)) {
            false
        } else {
            file.advanced_layout.unwrap_or(defaults.advanced_layout)
        };

        let mut copy = CopyConfig::from_file(file.copy);
        if env(ENV_NO_CLIPBOARD).is_some_and(|v| is_truthy(&v)) {
            copy.clipboard = ClipboardBackend::None;
        }

        let logging = LoggingConfig::from_file(file.logging);

        Self {
            theme,
            advanced_layout,
            copy,
            logging,
        }
    }

    /// Overwrite the config file with the default template
    pub fn reset() -> Result<PathBuf> {
        let path = Self::config_path().context("Cannot determine home directory")?;
        Self::default().write_to(&path)?;
        Ok(path)
    }

    /// Write this config as TOML, creating parent directories
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, self.to_toml())
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
