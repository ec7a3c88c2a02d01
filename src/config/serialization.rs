//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize config to TOML format
    ///
    /// Also used as the template written by `mdblocks config --reset`.
    pub fn to_toml(&self) -> String {
        format!(
            r#"# mdblocks configuration

# Theme: Default, Plain, Dracula, Nord, a name from ~/.config/mdblocks/themes,
# or a path to a .toml theme file
theme = "{theme}"

# Tables and image rows need advanced layout; without it tables are omitted
# and multi-image paragraphs fall back to text
advanced_layout = {advanced_layout}

# Copy controls on code blocks
[copy]
revert_delay_ms = {revert_delay_ms}
revert_policy = "{revert_policy}"  # accumulate, supersede
clipboard = "{clipboard}"  # system, none

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to the viewer's log buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            theme = escape(&self.theme),
            advanced_layout = self.advanced_layout,
            revert_delay_ms = self.copy.revert_delay.as_millis(),
            revert_policy = self.copy.revert_policy.as_str(),
            clipboard = self.copy.clipboard.as_str(),
            log_level = escape(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = escape(&self.logging.file_dir.display().to_string()),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = escape(&self.logging.file_prefix),
        )
    }
}

/// Escape a value for a basic TOML string
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
