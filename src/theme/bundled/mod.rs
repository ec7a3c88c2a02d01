//! Bundled TOML themes (compiled into binary)
//!
//! The default theme is hardcoded in `StyleTheme::default()`; these only
//! describe how they differ from it. Copy one into
//! ~/.config/mdblocks/themes/ to customize it.

mod dracula;
mod nord;
mod plain;

pub use dracula::THEME as DRACULA;
pub use nord::THEME as NORD;
pub use plain::THEME as PLAIN;

// ─────────────────────────────────────────────────────────────────────────────
// Bundled theme collection
// ─────────────────────────────────────────────────────────────────────────────

/// Bundled theme: name and TOML content
pub struct BundledTheme {
    pub filename: &'static str,
    pub content: &'static str,
}

/// All bundled themes
pub const BUNDLED_THEMES: &[BundledTheme] = &[
    BundledTheme {
        filename: "Plain.toml",
        content: PLAIN,
    },
    BundledTheme {
        filename: "Dracula.toml",
        content: DRACULA,
    },
    BundledTheme {
        filename: "Nord.toml",
        content: NORD,
    },
];
