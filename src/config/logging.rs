//! `[logging]` section: filter level and the optional rolling JSON file

use serde::Deserialize;
use std::path::PathBuf;

/// How often the log file rolls over to a new name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// One file, appended forever
    Never,
}

impl LogRotation {
    /// Case-insensitive; anything unrecognized rolls daily
    pub fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("hourly") {
            LogRotation::Hourly
        } else if s.eq_ignore_ascii_case("never") {
            LogRotation::Never
        } else {
            LogRotation::Daily
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogRotation::Hourly => "hourly",
            LogRotation::Daily => "daily",
            LogRotation::Never => "never",
        }
    }
}

/// Effective logging settings handed to `logging::init`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Level for the `mdblocks` target when `RUST_LOG` is unset
    pub level: String,
    /// Also write JSON lines to `file_dir`
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// File name stem; the appender adds the date suffix
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::default(),
            file_prefix: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// `[logging]` as written in config.toml; every key optional
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Overlay the keys present in the file onto the defaults
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let mut config = Self::default();
        let Some(file) = file else {
            return config;
        };

        if let Some(level) = file.level {
            config.level = level;
        }
        if let Some(enabled) = file.file_enabled {
            config.file_enabled = enabled;
        }
        if let Some(dir) = file.file_dir {
            config.file_dir = PathBuf::from(dir);
        }
        if let Some(rotation) = file.file_rotation {
            config.file_rotation = LogRotation::from_str(&rotation);
        }
        if let Some(prefix) = file.file_prefix {
            config.file_prefix = prefix;
        }
        config
    }
}
