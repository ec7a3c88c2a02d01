//! Copy control configuration: revert timing and clipboard backend

use crate::clipboard::{Clipboard, NoopClipboard, SystemClipboard};
use crate::render::{CopyFeedback, RevertPolicy, REVERT_DELAY};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Where copied text goes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClipboardBackend {
    /// Platform clipboard (default)
    #[default]
    System,
    /// Discard copies
    None,
}

impl ClipboardBackend {
    /// Parse backend string from config
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" | "off" => Self::None,
            _ => Self::System,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::None => "none",
        }
    }

    /// Instantiate the backend
    pub fn build(&self) -> Arc<dyn Clipboard> {
        match self {
            Self::System => Arc::new(SystemClipboard),
            Self::None => Arc::new(NoopClipboard),
        }
    }
}

/// Copy control configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CopyConfig {
    /// How long the copied state is shown
    pub revert_delay: Duration,
    /// Behavior when a control is activated again before it reverts
    pub revert_policy: RevertPolicy,
    pub clipboard: ClipboardBackend,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            revert_delay: REVERT_DELAY,
            revert_policy: RevertPolicy::Accumulate,
            clipboard: ClipboardBackend::System,
        }
    }
}

/// `[copy]` as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileCopy {
    pub revert_delay_ms: Option<u64>,
    pub revert_policy: Option<String>,
    pub clipboard: Option<String>,
}

impl CopyConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileCopy>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            revert_delay: file
                .revert_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.revert_delay),
            revert_policy: file
                .revert_policy
                .map(|s| RevertPolicy::from_str(&s))
                .unwrap_or(defaults.revert_policy),
            clipboard: file
                .clipboard
                .map(|s| ClipboardBackend::from_str(&s))
                .unwrap_or(defaults.clipboard),
        }
    }

    /// Timing handed to each copy control
    pub fn feedback(&self) -> CopyFeedback {
        CopyFeedback {
            revert_delay: self.revert_delay,
            policy: self.revert_policy,
        }
    }
}
