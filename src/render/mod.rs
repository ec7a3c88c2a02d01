//! Block rendering
//!
//! [`BlockRenderer`] turns each [`Block`] of a document into a
//! [`RenderedNode`]: an abstract display tree that says what to show and how
//! it is styled, but not where it lands on screen. [`layout`] lowers that
//! tree onto terminal lines for a given width.
//!
//! Every node produced for a block is wrapped with the theme slot for its
//! kind. Headings additionally carry a slug anchor, and code blocks carry a
//! [`ClipboardAction`] overlaid at their top-trailing corner.

mod clipboard_action;
mod images;
mod layout;
mod slug;

pub use clipboard_action::{
    ClipboardAction, ClipboardActionState, CopyFeedback, CopyIcon, Indicator, RevertPolicy,
    FEEDBACK_ANIMATION, REVERT_DELAY,
};
pub use images::{image_flow, image_view, FlowItem, ImageNode};
pub use layout::{control_label, layout, Anchor, ControlSlot, Layout};
pub use slug::slug;

use crate::clipboard::Clipboard;
use crate::document::{plain_text, Block, ColumnAlignment, Inline, TableRow};
use crate::theme::{BlockKey, BlockStyle, StyleTheme};
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Capabilities
// ─────────────────────────────────────────────────────────────────────────────

/// What the host environment can lay out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Grid and flow layouts (tables, image flows)
    pub advanced_layout: bool,
}

impl Capabilities {
    pub const BASIC: Self = Self {
        advanced_layout: false,
    };
    pub const ADVANCED: Self = Self {
        advanced_layout: true,
    };

    pub fn supports_advanced_layout(&self) -> bool {
        self.advanced_layout
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::ADVANCED
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display tree
// ─────────────────────────────────────────────────────────────────────────────

/// Corner a control is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAlignment {
    TopTrailing,
}

/// Abstract display tree produced by [`BlockRenderer`]
#[derive(Debug, Clone)]
pub enum RenderedNode {
    /// Nothing: takes no space
    Empty,
    /// Children stacked vertically
    Sequence(Vec<RenderedNode>),
    /// Wrapped inline text
    Text(Vec<Inline>),
    /// Verbatim markup
    Raw(String),
    /// Preformatted code; never wrapped
    Code {
        info: Option<String>,
        content: String,
    },
    List(ListNode),
    /// A standalone image
    Image(ImageNode),
    /// Images laid out in rows
    ImageFlow(Vec<FlowItem>),
    Table(TableNode),
    /// Horizontal rule drawn with `glyph`
    Rule { glyph: char },
    /// `child` styled with a theme slot
    Styled {
        key: BlockKey,
        style: BlockStyle,
        child: Box<RenderedNode>,
    },
    /// `child` addressable by a navigation id
    Anchored { id: String, child: Box<RenderedNode> },
    /// `base` with a control overlaid at `alignment`
    Overlay {
        base: Box<RenderedNode>,
        alignment: OverlayAlignment,
        control: ClipboardAction,
    },
}

/// Kind of a rendered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Task,
    Bulleted,
    Numbered { start: u64 },
}

/// Marker drawn before a list item's first line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    Number(u64),
    Checkbox(bool),
}

#[derive(Debug, Clone)]
pub struct ListNode {
    pub kind: ListKind,
    pub tight: bool,
    pub items: Vec<ListItemNode>,
}

#[derive(Debug, Clone)]
pub struct ListItemNode {
    pub marker: ListMarker,
    pub content: RenderedNode,
}

/// Grid data for a table; row 0 is the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNode {
    pub alignments: Vec<ColumnAlignment>,
    pub rows: Vec<TableRow>,
}

impl RenderedNode {
    pub fn is_empty(&self) -> bool {
        matches!(self, RenderedNode::Empty)
    }

    /// Theme slot of the outermost styled node, looking through anchors and overlays
    pub fn key(&self) -> Option<BlockKey> {
        match self {
            RenderedNode::Styled { key, .. } => Some(*key),
            RenderedNode::Anchored { child, .. } => child.key(),
            RenderedNode::Overlay { base, .. } => base.key(),
            _ => None,
        }
    }

    /// Anchor ids in document order
    pub fn anchors(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.walk(&mut |node| {
            if let RenderedNode::Anchored { id, .. } = node {
                ids.push(id.as_str());
            }
        });
        ids
    }

    /// Copy controls in document order
    pub fn clipboard_actions(&self) -> Vec<&ClipboardAction> {
        let mut actions = Vec::new();
        self.walk(&mut |node| {
            if let RenderedNode::Overlay { control, .. } = node {
                actions.push(control);
            }
        });
        actions
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a RenderedNode)) {
        visit(self);
        match self {
            RenderedNode::Sequence(children) => {
                for child in children {
                    child.walk(visit);
                }
            }
            RenderedNode::List(list) => {
                for item in &list.items {
                    item.content.walk(visit);
                }
            }
            RenderedNode::Styled { child, .. } | RenderedNode::Anchored { child, .. } => {
                child.walk(visit)
            }
            RenderedNode::Overlay { base, .. } => base.walk(visit),
            RenderedNode::Empty
            | RenderedNode::Text(_)
            | RenderedNode::Raw(_)
            | RenderedNode::Code { .. }
            | RenderedNode::Image(_)
            | RenderedNode::ImageFlow(_)
            | RenderedNode::Table(_)
            | RenderedNode::Rule { .. } => {}
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Maps blocks to display nodes
///
/// Capabilities are consulted on every call, so changing them affects the
/// next render without rebuilding anything.
pub struct BlockRenderer {
    capabilities: Capabilities,
    clipboard: Arc<dyn Clipboard>,
    feedback: CopyFeedback,
}

impl BlockRenderer {
    pub fn new(capabilities: Capabilities, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            capabilities,
            clipboard,
            feedback: CopyFeedback::default(),
        }
    }

    /// Use `feedback` for copy controls created from now on
    pub fn with_feedback(mut self, feedback: CopyFeedback) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
    }

    /// Render a whole document
    pub fn render_document(&self, blocks: &[Block], theme: &StyleTheme) -> RenderedNode {
        self.render_sequence(blocks, theme)
    }

    /// Render one block
    pub fn render(&self, block: &Block, theme: &StyleTheme) -> RenderedNode {
        match block {
            Block::Blockquote(children) => theme
                .blockquote
                .apply(BlockKey::Blockquote, self.render_sequence(children, theme)),

            Block::TaskList { tight, items } => {
                let items = items
                    .iter()
                    .map(|item| ListItemNode {
                        marker: ListMarker::Checkbox(item.checked),
                        content: self.render_sequence(&item.blocks, theme),
                    })
                    .collect();
                self.list(ListKind::Task, *tight, items, theme)
            }

            Block::BulletedList { tight, items } => {
                let items = items
                    .iter()
                    .map(|item| ListItemNode {
                        marker: ListMarker::Bullet,
                        content: self.render_sequence(&item.blocks, theme),
                    })
                    .collect();
                self.list(ListKind::Bulleted, *tight, items, theme)
            }

            Block::NumberedList {
                tight,
                start,
                items,
            } => {
                let items = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| ListItemNode {
                        // Numbering stops at u64::MAX instead of wrapping
                        marker: ListMarker::Number(start.saturating_add(index as u64)),
                        content: self.render_sequence(&item.blocks, theme),
                    })
                    .collect();
                self.list(ListKind::Numbered { start: *start }, *tight, items, theme)
            }

            Block::CodeBlock { info, content } => {
                let code = theme.code_block.apply(
                    BlockKey::CodeBlock,
                    RenderedNode::Code {
                        info: info.clone(),
                        content: content.clone(),
                    },
                );
                RenderedNode::Overlay {
                    base: Box::new(code),
                    alignment: OverlayAlignment::TopTrailing,
                    control: ClipboardAction::new(
                        content.clone(),
                        Arc::clone(&self.clipboard),
                        self.feedback,
                    ),
                }
            }

            Block::RawBlock(content) => theme
                .paragraph
                .apply(BlockKey::Paragraph, RenderedNode::Raw(content.clone())),

            Block::Paragraph(inlines) => self.paragraph(inlines, theme),

            Block::Heading { level, inlines } => {
                let key = BlockKey::heading(*level);
                let styled = theme
                    .style(key)
                    .apply(key, RenderedNode::Text(inlines.clone()));
                RenderedNode::Anchored {
                    id: slug(&plain_text(inlines)),
                    child: Box::new(styled),
                }
            }

            Block::Table { alignments, rows } => {
                if !self.capabilities.supports_advanced_layout() {
                    tracing::debug!(rows = rows.len(), "Table omitted without advanced layout");
                    return RenderedNode::Empty;
                }
                theme.table.apply(
                    BlockKey::Table,
                    RenderedNode::Table(TableNode {
                        alignments: alignments.clone(),
                        rows: rows.clone(),
                    }),
                )
            }

            Block::ThematicBreak => theme.thematic_break.apply(
                BlockKey::ThematicBreak,
                RenderedNode::Rule {
                    glyph: theme.rule_glyph,
                },
            ),
        }
    }

    /// Render children in order
    pub fn render_sequence(&self, blocks: &[Block], theme: &StyleTheme) -> RenderedNode {
        RenderedNode::Sequence(
            blocks
                .iter()
                .map(|block| self.render(block, theme))
                .collect(),
        )
    }

    fn list(
        &self,
        kind: ListKind,
        tight: bool,
        items: Vec<ListItemNode>,
        theme: &StyleTheme,
    ) -> RenderedNode {
        theme
            .list
            .apply(BlockKey::List, RenderedNode::List(ListNode { kind, tight, items }))
    }

    fn paragraph(&self, inlines: &[Inline], theme: &StyleTheme) -> RenderedNode {
        let content = if let Some(image) = image_view(inlines) {
            RenderedNode::Image(image)
        } else if let Some(flow) = self
            .capabilities
            .supports_advanced_layout()
            .then(|| image_flow(inlines))
            .flatten()
        {
            RenderedNode::ImageFlow(flow)
        } else {
            RenderedNode::Text(inlines.to_vec())
        };
        theme.paragraph.apply(BlockKey::Paragraph, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::RecordingClipboard;
    use crate::clipboard::NoopClipboard;
    use crate::document::{parse, ListItem, TaskListItem};

    fn renderer(capabilities: Capabilities) -> BlockRenderer {
        BlockRenderer::new(capabilities, Arc::new(NoopClipboard))
    }

    fn text(t: &str) -> Inline {
        Inline::Text(t.to_string())
    }

    fn image(source: &str) -> Inline {
        Inline::Image {
            source: source.to_string(),
            children: vec![text("alt")],
        }
    }

    fn child(node: &RenderedNode) -> &RenderedNode {
        match node {
            RenderedNode::Styled { child, .. } => child,
            other => panic!("expected styled node, got {:?}", other),
        }
    }

    #[test]
    fn test_every_block_gets_its_theme_slot() {
        let theme = StyleTheme::default();
        let renderer = renderer(Capabilities::ADVANCED);
        let cases = vec![
            (Block::Blockquote(vec![]), BlockKey::Blockquote),
            (
                Block::TaskList {
                    tight: true,
                    items: vec![],
                },
                BlockKey::List,
            ),
            (
                Block::BulletedList {
                    tight: true,
                    items: vec![],
                },
                BlockKey::List,
            ),
            (
                Block::NumberedList {
                    tight: true,
                    start: 1,
                    items: vec![],
                },
                BlockKey::List,
            ),
            (
                Block::CodeBlock {
                    info: None,
                    content: String::new(),
                },
                BlockKey::CodeBlock,
            ),
            (Block::RawBlock("<div></div>".to_string()), BlockKey::Paragraph),
            (Block::Paragraph(vec![text("hi")]), BlockKey::Paragraph),
            (
                Block::Heading {
                    level: 3,
                    inlines: vec![text("Title")],
                },
                BlockKey::Heading(3),
            ),
            (
                Block::Table {
                    alignments: vec![],
                    rows: vec![],
                },
                BlockKey::Table,
            ),
            (Block::ThematicBreak, BlockKey::ThematicBreak),
        ];

        for (block, key) in cases {
            assert_eq!(renderer.render(&block, &theme).key(), Some(key), "{:?}", block);
        }
    }

    #[test]
    fn test_styled_node_carries_theme_style() {
        let theme = StyleTheme::default();
        let node = renderer(Capabilities::ADVANCED).render(&Block::ThematicBreak, &theme);
        match node {
            RenderedNode::Styled { style, child, .. } => {
                assert_eq!(style, theme.thematic_break);
                assert!(matches!(*child, RenderedNode::Rule { glyph: '─' }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_heading_is_anchored_by_slug() {
        let theme = StyleTheme::default();
        let block = Block::Heading {
            level: 2,
            inlines: vec![text("Hello "), Inline::Strong(vec![text("World")]), text("!")],
        };
        let node = renderer(Capabilities::ADVANCED).render(&block, &theme);
        match &node {
            RenderedNode::Anchored { id, child } => {
                assert_eq!(id, "hello-world");
                assert_eq!(child.key(), Some(BlockKey::Heading(2)));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(node.anchors(), vec!["hello-world"]);
    }

    #[test]
    fn test_heading_level_out_of_range_is_clamped() {
        let theme = StyleTheme::default();
        let block = Block::Heading {
            level: 9,
            inlines: vec![text("Deep")],
        };
        let node = renderer(Capabilities::ADVANCED).render(&block, &theme);
        assert_eq!(node.key(), Some(BlockKey::Heading(6)));
    }

    #[test]
    fn test_table_requires_advanced_layout() {
        let theme = StyleTheme::default();
        let block = Block::Table {
            alignments: vec![ColumnAlignment::Left],
            rows: vec![TableRow {
                cells: vec![vec![text("a")]],
            }],
        };

        let basic = renderer(Capabilities::BASIC).render(&block, &theme);
        assert!(basic.is_empty());
        assert_eq!(basic.key(), None);

        let advanced = renderer(Capabilities::ADVANCED).render(&block, &theme);
        match child(&advanced) {
            RenderedNode::Table(table) => {
                assert_eq!(table.alignments, vec![ColumnAlignment::Left]);
                assert_eq!(table.rows.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_table_keeps_row_order_and_alignments() {
        let theme = StyleTheme::default();
        let row = |cells: [&str; 3]| TableRow {
            cells: cells.iter().map(|cell| vec![text(cell)]).collect(),
        };
        let alignments = vec![
            ColumnAlignment::Left,
            ColumnAlignment::Center,
            ColumnAlignment::Right,
        ];
        let rows = vec![
            row(["name", "kind", "size"]),
            row(["b.rs", "file", "20"]),
            row(["a.rs", "file", "10"]),
            row(["src", "dir", "-"]),
        ];
        let block = Block::Table {
            alignments: alignments.clone(),
            rows: rows.clone(),
        };

        let node = renderer(Capabilities::ADVANCED).render(&block, &theme);
        assert_eq!(node.key(), Some(BlockKey::Table));
        match child(&node) {
            RenderedNode::Table(table) => {
                assert_eq!(table, &TableNode { alignments, rows });
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_capabilities_checked_per_call() {
        let theme = StyleTheme::default();
        let block = Block::Table {
            alignments: vec![],
            rows: vec![],
        };
        let mut renderer = renderer(Capabilities::ADVANCED);
        assert!(!renderer.render(&block, &theme).is_empty());

        renderer.set_capabilities(Capabilities::BASIC);
        assert!(renderer.render(&block, &theme).is_empty());
    }

    #[test]
    fn test_single_image_paragraph_in_both_tiers() {
        let theme = StyleTheme::default();
        let block = Block::Paragraph(vec![image("cat.png")]);
        for capabilities in [Capabilities::BASIC, Capabilities::ADVANCED] {
            let node = renderer(capabilities).render(&block, &theme);
            assert!(
                matches!(child(&node), RenderedNode::Image(image) if image.source == "cat.png"),
                "{:?}",
                node
            );
        }
    }

    #[test]
    fn test_multi_image_paragraph_depends_on_tier() {
        let theme = StyleTheme::default();
        let block = Block::Paragraph(vec![image("a.png"), text(" "), image("b.png")]);

        let advanced = renderer(Capabilities::ADVANCED).render(&block, &theme);
        assert!(matches!(child(&advanced), RenderedNode::ImageFlow(items) if items.len() == 2));

        let basic = renderer(Capabilities::BASIC).render(&block, &theme);
        match child(&basic) {
            RenderedNode::Text(inlines) => assert_eq!(inlines.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_text_paragraph_is_text() {
        let theme = StyleTheme::default();
        let block = Block::Paragraph(vec![text("Just words")]);
        let node = renderer(Capabilities::ADVANCED).render(&block, &theme);
        assert!(matches!(child(&node), RenderedNode::Text(_)));
    }

    #[test]
    fn test_numbered_list_markers_count_from_start() {
        let theme = StyleTheme::default();
        let block = Block::NumberedList {
            tight: true,
            start: 3,
            items: vec![ListItem::default(), ListItem::default()],
        };
        let node = renderer(Capabilities::ADVANCED).render(&block, &theme);
        match child(&node) {
            RenderedNode::List(list) => {
                assert_eq!(list.kind, ListKind::Numbered { start: 3 });
                let markers: Vec<_> = list.items.iter().map(|item| item.marker).collect();
                assert_eq!(markers, vec![ListMarker::Number(3), ListMarker::Number(4)]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_numbered_list_at_u64_max_saturates() {
        let theme = StyleTheme::default();
        let block = Block::NumberedList {
            tight: true,
            start: u64::MAX,
            items: vec![ListItem::default(), ListItem::default()],
        };
        let node = renderer(Capabilities::ADVANCED).render(&block, &theme);
        match child(&node) {
            RenderedNode::List(list) => {
                let markers: Vec<_> = list.items.iter().map(|item| item.marker).collect();
                assert_eq!(
                    markers,
                    vec![ListMarker::Number(u64::MAX), ListMarker::Number(u64::MAX)]
                );
            }
            other => panic!("unexpected {:?}", other),
        }

        // Lowering the huge markers stays total too
        let lines = layout(&node, &theme, 40).plain_lines();
        assert!(lines[0].contains(&u64::MAX.to_string()));
    }

    #[test]
    fn test_task_list_markers_follow_checked_state() {
        let theme = StyleTheme::default();
        let block = Block::TaskList {
            tight: false,
            items: vec![
                TaskListItem {
                    checked: true,
                    blocks: vec![Block::Paragraph(vec![text("done")])],
                },
                TaskListItem::default(),
            ],
        };
        let node = renderer(Capabilities::ADVANCED).render(&block, &theme);
        match child(&node) {
            RenderedNode::List(list) => {
                assert!(!list.tight);
                assert_eq!(list.items[0].marker, ListMarker::Checkbox(true));
                assert_eq!(list.items[1].marker, ListMarker::Checkbox(false));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_blockquote_renders_children_recursively() {
        let theme = StyleTheme::default();
        let blocks = parse("> # Inside\n>\n> ```\n> code\n> ```\n");
        let node = renderer(Capabilities::ADVANCED).render_document(&blocks, &theme);
        assert_eq!(node.anchors(), vec!["inside"]);
        assert_eq!(node.clipboard_actions().len(), 1);
    }

    #[tokio::test]
    async fn test_code_block_control_copies_exact_content() {
        let theme = StyleTheme::default();
        let clipboard = Arc::new(RecordingClipboard::default());
        let renderer = BlockRenderer::new(Capabilities::ADVANCED, clipboard.clone());
        let block = Block::CodeBlock {
            info: Some("rust".to_string()),
            content: "fn main() {}\n".to_string(),
        };

        let node = renderer.render(&block, &theme);
        match &node {
            RenderedNode::Overlay {
                alignment, control, ..
            } => {
                assert_eq!(*alignment, OverlayAlignment::TopTrailing);
                assert!(!control.is_copied());
                control.activate();
                assert!(control.is_copied());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(node.key(), Some(BlockKey::CodeBlock));
        assert_eq!(clipboard.copies(), vec!["fn main() {}\n".to_string()]);
    }

    #[test]
    fn test_each_code_block_gets_its_own_control() {
        let theme = StyleTheme::default();
        let blocks = parse("```\na\n```\n\n```\nb\n```\n");
        let node = renderer(Capabilities::ADVANCED).render_document(&blocks, &theme);
        let actions = node.clipboard_actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].content(), "a\n");
        assert_eq!(actions[1].content(), "b\n");
        assert!(!actions[0].same_control(actions[1]));
    }

    #[test]
    fn test_feedback_is_passed_to_controls() {
        let theme = StyleTheme::default();
        let feedback = CopyFeedback {
            revert_delay: std::time::Duration::from_millis(250),
            policy: RevertPolicy::Supersede,
        };
        let renderer = renderer(Capabilities::ADVANCED).with_feedback(feedback);
        let node = renderer.render(
            &Block::CodeBlock {
                info: None,
                content: "x".to_string(),
            },
            &theme,
        );
        assert_eq!(node.clipboard_actions()[0].feedback(), feedback);
    }
}
