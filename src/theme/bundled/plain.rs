//! Plain - no colors, structure from modifiers and prefixes only

pub const THEME: &str = r##"# Plain theme for mdblocks
# Monochrome: terminal default colors, bold/italic/underline only

[meta]
name = "Plain"
version = 1

[inline.code]
fg = "ansi:fg"

[inline.link]
fg = "ansi:fg"
underline = true

[inline.image]
fg = "ansi:fg"
italic = true

[inline.html]
fg = "ansi:fg"
dim = true

[inline.copy_control]
fg = "ansi:fg"
bg = "ansi:bg"
bold = true

[blocks.heading1]
fg = "ansi:fg"

[blocks.heading2]
fg = "ansi:fg"

[blocks.heading3]
fg = "ansi:fg"

[blocks.heading4]
fg = "ansi:fg"

[blocks.heading5]
fg = "ansi:fg"

[blocks.heading6]
fg = "ansi:fg"

[blocks.blockquote]
fg = "ansi:fg"
border = "| "

[blocks.code_block]
fg = "ansi:fg"

[blocks.thematic_break]
fg = "ansi:fg"
dim = true
"##;
