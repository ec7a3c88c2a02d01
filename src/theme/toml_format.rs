// TOML theme format parser
//
// Native theme format for mdblocks. Every table is optional: a theme only
// lists what it changes and everything else inherits the built-in default.
//
// Format version: 1

use super::BlockStyle;
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// Root structure for TOML theme files
#[derive(Debug, Clone, Deserialize)]
pub struct TomlTheme {
    pub meta: ThemeMeta,
    /// Optional thematic break glyph (first character is used)
    pub rule: Option<String>,
    #[serde(default)]
    pub inline: InlineColors,
    #[serde(default)]
    pub blocks: BlockStyles,
}

/// Theme metadata
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeMeta {
    pub name: String,
    #[allow(dead_code)] // For future schema evolution
    pub version: u32,
    #[serde(default)]
    pub author: Option<String>,
}

/// `[inline.*]` tables
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InlineColors {
    pub code: Option<TomlTextStyle>,
    pub link: Option<TomlTextStyle>,
    pub image: Option<TomlTextStyle>,
    pub html: Option<TomlTextStyle>,
    pub copy_control: Option<TomlTextStyle>,
}

/// `[blocks.*]` tables, one per theme slot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockStyles {
    pub heading1: Option<TomlBlockStyle>,
    pub heading2: Option<TomlBlockStyle>,
    pub heading3: Option<TomlBlockStyle>,
    pub heading4: Option<TomlBlockStyle>,
    pub heading5: Option<TomlBlockStyle>,
    pub heading6: Option<TomlBlockStyle>,
    pub blockquote: Option<TomlBlockStyle>,
    pub list: Option<TomlBlockStyle>,
    pub code_block: Option<TomlBlockStyle>,
    pub paragraph: Option<TomlBlockStyle>,
    pub table: Option<TomlBlockStyle>,
    pub thematic_break: Option<TomlBlockStyle>,
}

/// Colors and modifiers; unset fields leave the base style alone
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlTextStyle {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub dim: Option<bool>,
}

/// One block slot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlBlockStyle {
    #[serde(flatten)]
    pub text: TomlTextStyle,
    pub margin_top: Option<u16>,
    pub margin_bottom: Option<u16>,
    pub indent: Option<u16>,
    pub border: Option<String>,
    pub marker: Option<String>,
    pub fill: Option<bool>,
}

impl TomlTheme {
    /// Parse a TOML theme from string
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Parse a color string to ratatui Color
    /// Supports:
    /// - Hex format: #RRGGBB
    /// - ANSI format: ansi:0-15, ansi:fg, ansi:bg (for terminal-native colors)
    pub fn parse_color(value: &str) -> Color {
        if let Some(ansi) = value.strip_prefix("ansi:") {
            return match ansi {
                "0" => Color::Black,
                "1" => Color::Red,
                "2" => Color::Green,
                "3" => Color::Yellow,
                "4" => Color::Blue,
                "5" => Color::Magenta,
                "6" => Color::Cyan,
                "7" => Color::White,
                "8" => Color::DarkGray,
                "9" => Color::LightRed,
                "10" => Color::LightGreen,
                "11" => Color::LightYellow,
                "12" => Color::LightBlue,
                "13" => Color::LightMagenta,
                "14" => Color::LightCyan,
                "15" => Color::Gray,
                "fg" | "bg" => Color::Reset,
                _ => Color::White,
            };
        }

        let hex = value.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Color::White; // fallback
        }
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
        Color::Rgb(r, g, b)
    }
}

impl TomlTextStyle {
    /// Overlay the set fields onto `base`
    pub fn patch(&self, base: Style) -> Style {
        let mut style = base;
        if let Some(fg) = &self.fg {
            style = style.fg(TomlTheme::parse_color(fg));
        }
        if let Some(bg) = &self.bg {
            style = style.bg(TomlTheme::parse_color(bg));
        }
        let modifiers = [
            (self.bold, Modifier::BOLD),
            (self.italic, Modifier::ITALIC),
            (self.underline, Modifier::UNDERLINED),
            (self.dim, Modifier::DIM),
        ];
        for (flag, modifier) in modifiers {
            style = match flag {
                Some(true) => style.add_modifier(modifier),
                Some(false) => style.remove_modifier(modifier),
                None => style,
            };
        }
        style
    }
}

impl TomlBlockStyle {
    /// Overlay the set fields onto a theme slot
    pub fn apply_to(&self, slot: &mut BlockStyle) {
        slot.text = self.text.patch(slot.text);
        if let Some(margin) = self.margin_top {
            slot.margin_top = margin;
        }
        if let Some(margin) = self.margin_bottom {
            slot.margin_bottom = margin;
        }
        if let Some(indent) = self.indent {
            slot.indent = indent;
        }
        if let Some(border) = &self.border {
            slot.border = (!border.is_empty()).then(|| border.clone());
        }
        if let Some(marker) = &self.marker {
            slot.marker = (!marker.is_empty()).then(|| marker.clone());
        }
        if let Some(fill) = self.fill {
            slot.fill = fill;
        }
    }
}
