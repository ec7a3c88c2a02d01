//! Nord - Arctic, bluish color palette

pub const THEME: &str = r##"# Nord theme for mdblocks
# Arctic, bluish color palette

[meta]
name = "Nord"
version = 1
author = "arcticicestudio"

[inline.code]
fg = "#8fbcbb"

[inline.link]
fg = "#88c0d0"
underline = true

[inline.image]
fg = "#b48ead"

[inline.html]
fg = "#4c566a"

[inline.copy_control]
fg = "#eceff4"
bg = "#3b4252"

[blocks.heading1]
fg = "#88c0d0"

[blocks.heading2]
fg = "#81a1c1"

[blocks.heading3]
fg = "#5e81ac"

[blocks.heading4]
fg = "#d8dee9"

[blocks.heading5]
fg = "#d8dee9"

[blocks.heading6]
fg = "#4c566a"

[blocks.blockquote]
fg = "#d8dee9"
border = "▌ "

[blocks.code_block]
fg = "#a3be8c"
bg = "#2e3440"
fill = true

[blocks.table]
margin_bottom = 1

[blocks.thematic_break]
fg = "#4c566a"
"##;
