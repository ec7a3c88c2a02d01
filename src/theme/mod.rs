// Theme system for block rendering
//
// A StyleTheme maps every block kind to a BlockStyle. The renderer looks up
// the slot for the block it is rendering and wraps the produced node with it;
// the layout pass later applies margins, prefixes and text styles.
//
// Theme loading priority:
// 1. A path to a .toml file (e.g. `--theme ./mine.toml`)
// 2. External TOML themes from ~/.config/mdblocks/themes/<name>.toml
// 3. Bundled themes (compiled into the binary)
// 4. Fallback to the hardcoded default

mod bundled;
mod toml_format;

pub use bundled::{BundledTheme, BUNDLED_THEMES};
pub use toml_format::TomlTheme;

use crate::render::RenderedNode;
use anyhow::{Context, Result};
use ratatui::style::{Color, Modifier, Style};
use std::path::{Path, PathBuf};

/// Name of the hardcoded theme
pub const DEFAULT_THEME: &str = "Default";

// ─────────────────────────────────────────────────────────────────────────────
// Keys and styles
// ─────────────────────────────────────────────────────────────────────────────

/// Theme slot a rendered block is styled with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKey {
    /// Heading level 1-6
    Heading(u8),
    Blockquote,
    /// Shared by task, bulleted and numbered lists
    List,
    CodeBlock,
    /// Also used for raw blocks and image paragraphs
    Paragraph,
    Table,
    ThematicBreak,
}

impl BlockKey {
    /// Heading key with the level clamped into 1..=6
    pub fn heading(level: u8) -> Self {
        BlockKey::Heading(level.clamp(1, 6))
    }

    /// Key name as used in theme files (`[blocks.<name>]`)
    pub fn name(&self) -> &'static str {
        match self {
            BlockKey::Heading(1) => "heading1",
            BlockKey::Heading(2) => "heading2",
            BlockKey::Heading(3) => "heading3",
            BlockKey::Heading(4) => "heading4",
            BlockKey::Heading(5) => "heading5",
            BlockKey::Heading(_) => "heading6",
            BlockKey::Blockquote => "blockquote",
            BlockKey::List => "list",
            BlockKey::CodeBlock => "code_block",
            BlockKey::Paragraph => "paragraph",
            BlockKey::Table => "table",
            BlockKey::ThematicBreak => "thematic_break",
        }
    }
}

/// Visual treatment of one block kind
///
/// This is the style-application function in data form: [`BlockStyle::apply`]
/// attaches it to a node, and the layout pass interprets the fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStyle {
    /// Base text style, patched onto the enclosing style
    pub text: Style,
    /// Blank lines before the block (collapsed with the previous margin)
    pub margin_top: u16,
    /// Blank lines after the block
    pub margin_bottom: u16,
    /// Extra columns of indentation for every line
    pub indent: u16,
    /// Prefix repeated on every line, e.g. `│ ` for quotes
    pub border: Option<String>,
    /// Prefix on the first line only, e.g. `## ` for headings
    pub marker: Option<String>,
    /// Pad lines to the full width so backgrounds form a box
    pub fill: bool,
}

impl BlockStyle {
    /// Wrap `node` with this style under `key`
    pub fn apply(&self, key: BlockKey, node: RenderedNode) -> RenderedNode {
        RenderedNode::Styled {
            key,
            style: self.clone(),
            child: Box::new(node),
        }
    }
}

/// Styles for inline content inside any block
#[derive(Debug, Clone, PartialEq)]
pub struct InlineStyles {
    pub code: Style,
    pub link: Style,
    pub image: Style,
    pub html: Style,
    /// Copy control shown on code blocks
    pub copy_control: Style,
}

impl Default for InlineStyles {
    fn default() -> Self {
        Self {
            code: Style::default().fg(Color::Cyan),
            link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            image: Style::default().fg(Color::Magenta),
            html: Style::default().fg(Color::DarkGray),
            copy_control: Style::default().fg(Color::Gray).bg(Color::DarkGray),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Style theme
// ─────────────────────────────────────────────────────────────────────────────

/// Complete theme: one style slot per block kind
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTheme {
    pub name: String,
    /// One slot per heading level; `headings[level - 1]`
    pub headings: [BlockStyle; 6],
    pub blockquote: BlockStyle,
    pub list: BlockStyle,
    pub code_block: BlockStyle,
    pub paragraph: BlockStyle,
    pub table: BlockStyle,
    pub thematic_break: BlockStyle,
    pub inline: InlineStyles,
    /// Glyph repeated to draw thematic breaks
    pub rule_glyph: char,
}

impl Default for StyleTheme {
    fn default() -> Self {
        let heading = |color: Color, marker: &str, margin_top: u16| BlockStyle {
            text: Style::default().fg(color).add_modifier(Modifier::BOLD),
            margin_top,
            margin_bottom: 1,
            marker: Some(marker.to_string()),
            ..BlockStyle::default()
        };

        Self {
            name: DEFAULT_THEME.to_string(),
            headings: [
                heading(Color::Cyan, "# ", 1),
                heading(Color::Cyan, "## ", 1),
                heading(Color::Blue, "### ", 1),
                heading(Color::Blue, "#### ", 0),
                heading(Color::Gray, "##### ", 0),
                heading(Color::Gray, "###### ", 0),
            ],
            blockquote: BlockStyle {
                text: Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
                margin_bottom: 1,
                border: Some("│ ".to_string()),
                ..BlockStyle::default()
            },
            list: BlockStyle {
                margin_bottom: 1,
                ..BlockStyle::default()
            },
            code_block: BlockStyle {
                text: Style::default().fg(Color::Yellow),
                margin_bottom: 1,
                indent: 2,
                ..BlockStyle::default()
            },
            paragraph: BlockStyle {
                margin_bottom: 1,
                ..BlockStyle::default()
            },
            table: BlockStyle {
                margin_bottom: 1,
                ..BlockStyle::default()
            },
            thematic_break: BlockStyle {
                text: Style::default().fg(Color::DarkGray),
                margin_bottom: 1,
                ..BlockStyle::default()
            },
            inline: InlineStyles::default(),
            rule_glyph: '─',
        }
    }
}

impl StyleTheme {
    /// Look up the style slot for `key`
    pub fn style(&self, key: BlockKey) -> &BlockStyle {
        match key {
            BlockKey::Heading(level) => &self.headings[usize::from(level.clamp(1, 6)) - 1],
            BlockKey::Blockquote => &self.blockquote,
            BlockKey::List => &self.list,
            BlockKey::CodeBlock => &self.code_block,
            BlockKey::Paragraph => &self.paragraph,
            BlockKey::Table => &self.table,
            BlockKey::ThematicBreak => &self.thematic_break,
        }
    }

    /// Resolve a theme name or path
    ///
    /// Names never fail (unknown names fall back to the default theme), but
    /// an explicit `.toml` path that cannot be read or parsed is an error.
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        let path = Path::new(name_or_path);
        if path.extension().is_some_and(|ext| ext == "toml") {
            return Self::from_path(path);
        }
        Ok(Self::by_name(name_or_path))
    }

    /// Load theme by name, falling back to the default theme
    pub fn by_name(name: &str) -> Self {
        if let Some(theme) = Self::load_toml(name) {
            return theme;
        }

        if !name.eq_ignore_ascii_case(DEFAULT_THEME) {
            tracing::warn!("Unknown theme {:?}, using {}", name, DEFAULT_THEME);
        }
        Self::default()
    }

    /// Load a theme file from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file {}", path.display()))?;
        let toml = TomlTheme::from_str(&contents)
            .with_context(|| format!("Failed to parse theme file {}", path.display()))?;
        Ok(Self::from_toml(toml))
    }

    /// Names of all bundled themes, default first
    pub fn bundled_names() -> Vec<String> {
        let mut names = vec![DEFAULT_THEME.to_string()];
        names.extend(
            BUNDLED_THEMES
                .iter()
                .map(|theme| theme.filename.trim_end_matches(".toml").replace('_', " ")),
        );
        names
    }

    /// Get themes directory path: ~/.config/mdblocks/themes
    pub fn themes_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".config").join("mdblocks").join("themes"))
    }

    /// Load from an external TOML file or a bundled theme
    fn load_toml(name: &str) -> Option<Self> {
        let normalized = name.replace(' ', "_");

        if let Some(dir) = Self::themes_dir() {
            for candidate in [name, normalized.as_str()] {
                let path = dir.join(format!("{}.toml", candidate));
                if !path.exists() {
                    continue;
                }
                match Self::from_path(&path) {
                    Ok(theme) => return Some(theme),
                    Err(e) => tracing::warn!("Skipping theme file: {:#}", e),
                }
            }
        }

        let filename = format!("{}.toml", normalized);
        let bundled = BUNDLED_THEMES
            .iter()
            .find(|theme| theme.filename.eq_ignore_ascii_case(&filename))?;
        match TomlTheme::from_str(bundled.content) {
            Ok(toml) => Some(Self::from_toml(toml)),
            Err(e) => {
                tracing::warn!("Bundled theme {} is invalid: {}", bundled.filename, e);
                None
            }
        }
    }

    /// Create theme from TOML format; missing entries keep the defaults
    pub fn from_toml(toml: TomlTheme) -> Self {
        let mut theme = Self::default();
        theme.name = toml.meta.name.clone();

        let blocks = &toml.blocks;
        let headings = [
            &blocks.heading1,
            &blocks.heading2,
            &blocks.heading3,
            &blocks.heading4,
            &blocks.heading5,
            &blocks.heading6,
        ];
        for (slot, file) in theme.headings.iter_mut().zip(headings) {
            if let Some(file) = file {
                file.apply_to(slot);
            }
        }

        let slots = [
            (&blocks.blockquote, &mut theme.blockquote),
            (&blocks.list, &mut theme.list),
            (&blocks.code_block, &mut theme.code_block),
            (&blocks.paragraph, &mut theme.paragraph),
            (&blocks.table, &mut theme.table),
            (&blocks.thematic_break, &mut theme.thematic_break),
        ];
        for (file, slot) in slots {
            if let Some(file) = file {
                file.apply_to(slot);
            }
        }

        let inline = &toml.inline;
        let inline_slots = [
            (&inline.code, &mut theme.inline.code),
            (&inline.link, &mut theme.inline.link),
            (&inline.image, &mut theme.inline.image),
            (&inline.html, &mut theme.inline.html),
            (&inline.copy_control, &mut theme.inline.copy_control),
        ];
        for (file, slot) in inline_slots {
            if let Some(file) = file {
                *slot = file.patch(*slot);
            }
        }

        if let Some(glyph) = toml.rule.as_deref().and_then(|rule| rule.chars().next()) {
            theme.rule_glyph = glyph;
        }

        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_slots_by_level() {
        let theme = StyleTheme::default();
        assert_eq!(theme.style(BlockKey::Heading(1)), &theme.headings[0]);
        assert_eq!(theme.style(BlockKey::Heading(6)), &theme.headings[5]);
        assert_eq!(BlockKey::heading(9), BlockKey::Heading(6));
        assert_eq!(BlockKey::heading(0), BlockKey::Heading(1));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(BlockKey::Heading(2).name(), "heading2");
        assert_eq!(BlockKey::CodeBlock.name(), "code_block");
        assert_eq!(BlockKey::ThematicBreak.name(), "thematic_break");
    }

    #[test]
    fn test_apply_wraps_node() {
        let theme = StyleTheme::default();
        let node = theme
            .paragraph
            .apply(BlockKey::Paragraph, RenderedNode::Empty);
        assert!(matches!(
            node,
            RenderedNode::Styled { key: BlockKey::Paragraph, ref style, .. } if *style == theme.paragraph
        ));
    }

    #[test]
    fn test_all_bundled_themes_parse() {
        for bundled in BUNDLED_THEMES {
            let parsed = TomlTheme::from_str(bundled.content);
            assert!(
                parsed.is_ok(),
                "{} failed to parse: {:?}",
                bundled.filename,
                parsed.err()
            );
        }
    }

    #[test]
    fn test_bundled_names_start_with_default() {
        let names = StyleTheme::bundled_names();
        assert_eq!(names[0], DEFAULT_THEME);
        assert!(names.iter().any(|n| n == "Dracula"));
    }

    #[test]
    fn test_from_toml_overrides_only_given_slots() {
        let toml = TomlTheme::from_str(
            r##"
rule = "="

[meta]
name = "Custom"
version = 1

[blocks.heading2]
fg = "#ff0000"
marker = "> "

[blocks.code_block]
indent = 4
fill = true

[inline.code]
fg = "ansi:2"
"##,
        )
        .unwrap();

        let theme = StyleTheme::from_toml(toml);
        let defaults = StyleTheme::default();

        assert_eq!(theme.name, "Custom");
        assert_eq!(theme.headings[1].text.fg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(theme.headings[1].marker.as_deref(), Some("> "));
        // Bold from the default survives a color-only override
        assert!(theme.headings[1]
            .text
            .add_modifier
            .contains(Modifier::BOLD));
        assert_eq!(theme.headings[0], defaults.headings[0]);
        assert_eq!(theme.code_block.indent, 4);
        assert!(theme.code_block.fill);
        assert_eq!(theme.inline.code.fg, Some(Color::Green));
        assert_eq!(theme.rule_glyph, '=');
        assert_eq!(theme.paragraph, defaults.paragraph);
    }

    #[test]
    fn test_resolve_missing_path_is_error() {
        assert!(StyleTheme::resolve("/nonexistent/theme.toml").is_err());
    }
}
