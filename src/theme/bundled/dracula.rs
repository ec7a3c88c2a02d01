//! Dracula - https://draculatheme.com

pub const THEME: &str = r##"# Dracula theme for mdblocks

rule = "━"

[meta]
name = "Dracula"
version = 1
author = "draculatheme.com"

[inline.code]
fg = "#50fa7b"

[inline.link]
fg = "#8be9fd"
underline = true

[inline.image]
fg = "#ff79c6"

[inline.html]
fg = "#6272a4"

[inline.copy_control]
fg = "#f8f8f2"
bg = "#44475a"

[blocks.heading1]
fg = "#bd93f9"
marker = "█ "

[blocks.heading2]
fg = "#bd93f9"

[blocks.heading3]
fg = "#ff79c6"

[blocks.heading4]
fg = "#ff79c6"

[blocks.heading5]
fg = "#f8f8f2"

[blocks.heading6]
fg = "#6272a4"

[blocks.blockquote]
fg = "#6272a4"
border = "┃ "

[blocks.code_block]
fg = "#f1fa8c"
bg = "#282a36"
fill = true

[blocks.thematic_break]
fg = "#6272a4"
"##;
