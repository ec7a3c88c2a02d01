//! Document tree consumed by the renderer
//!
//! A parsed markdown document is a sequence of [`Block`]s. Blocks are
//! immutable once built; the renderer only ever borrows them.
//!
//! [`parse`] builds the tree from markdown text using pulldown-cmark. The
//! renderer itself depends only on the types in this module.

mod markdown;

pub use markdown::parse;

// ─────────────────────────────────────────────────────────────────────────────
// Block-level nodes
// ─────────────────────────────────────────────────────────────────────────────

/// One node of the document's block structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `> quoted` content, itself a block sequence
    Blockquote(Vec<Block>),
    /// `- [x] done` style list
    TaskList { tight: bool, items: Vec<TaskListItem> },
    /// `- item` style list
    BulletedList { tight: bool, items: Vec<ListItem> },
    /// `1. item` style list, numbering from `start`
    NumberedList {
        tight: bool,
        start: u64,
        items: Vec<ListItem>,
    },
    /// Fenced or indented code; `info` is the fence's info string (language hint)
    CodeBlock { info: Option<String>, content: String },
    /// Embedded raw markup (HTML block), displayed verbatim
    RawBlock(String),
    Paragraph(Vec<Inline>),
    /// Heading with level 1-6
    Heading { level: u8, inlines: Vec<Inline> },
    /// Table; the first row is the header row
    Table {
        alignments: Vec<ColumnAlignment>,
        rows: Vec<TableRow>,
    },
    /// `---`
    ThematicBreak,
}

/// Item of a bulleted or numbered list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

/// Item of a task list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskListItem {
    pub checked: bool,
    pub blocks: Vec<Block>,
}

/// Horizontal alignment of a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// One table row; each cell is a run of inline content
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    pub cells: Vec<Vec<Inline>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline nodes
// ─────────────────────────────────────────────────────────────────────────────

/// Inline content of paragraphs, headings and table cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    /// `inline code`
    Code(String),
    /// Inline raw markup such as `<kbd>`
    Html(String),
    /// Single newline in the source
    SoftBreak,
    /// Explicit line break (two trailing spaces or backslash)
    LineBreak,
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link {
        destination: String,
        children: Vec<Inline>,
    },
    /// `![alt](source)`; `children` holds the alt text
    Image {
        source: String,
        children: Vec<Inline>,
    },
}

impl Inline {
    /// True for text that only contains whitespace
    pub fn is_blank(&self) -> bool {
        matches!(self, Inline::Text(text) if text.trim().is_empty())
    }
}

/// Flatten inline content to plain text
///
/// Soft breaks become spaces, line breaks become newlines, and images
/// contribute their alt text. Markup and link destinations are dropped.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    collect_text(inlines, &mut out);
    out
}

fn collect_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Html(_) => {}
            Inline::SoftBreak => out.push(' '),
            Inline::LineBreak => out.push('\n'),
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children)
            | Inline::Link { children, .. }
            | Inline::Image { children, .. } => collect_text(children, out),
        }
    }
}
