// Display tree → terminal lines
//
// Walks a RenderedNode once, top to bottom, and emits ratatui Lines for a
// fixed width. Styled nodes contribute margins (adjacent margins collapse to
// the larger one), a patched text style and line prefixes: indents and
// borders repeat on every line, markers only on the first.
//
// Anchors and copy controls are recorded as pending marks and resolved to
// the next content line that is emitted.

use super::{
    ClipboardAction, CopyIcon, FlowItem, ImageNode, ListMarker, ListNode, RenderedNode,
    TableNode,
};
use crate::document::{plain_text, ColumnAlignment, Inline};
use crate::theme::{BlockStyle, InlineStyles, StyleTheme};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use std::mem;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const BULLETS: [&str; 3] = ["•", "◦", "▪"];
const COLUMN_SEPARATOR: &str = " │ ";
const IMAGE_GLYPH: &str = "▣";

/// Navigation target: the line a heading starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub id: String,
    pub line: usize,
}

/// Where a copy control is drawn
#[derive(Debug, Clone)]
pub struct ControlSlot {
    pub line: usize,
    /// First column of the control label
    pub column: usize,
    pub action: ClipboardAction,
}

/// Lines for one width plus everything needed to navigate them
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub lines: Vec<Line<'static>>,
    pub anchors: Vec<Anchor>,
    pub controls: Vec<ControlSlot>,
}

impl Layout {
    /// Line of the first anchor named `id`
    pub fn anchor_line(&self, id: &str) -> Option<usize> {
        self.anchors
            .iter()
            .find(|anchor| anchor.id == id)
            .map(|anchor| anchor.line)
    }

    /// Lines as plain text with trailing whitespace removed
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| {
                let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
                text.trim_end().to_string()
            })
            .collect()
    }
}

/// Label drawn for a copy control
pub fn control_label(icon: CopyIcon) -> String {
    format!(" {} ", icon.glyph())
}

/// Lay out `node` for a terminal `width` columns wide
pub fn layout(node: &RenderedNode, theme: &StyleTheme, width: u16) -> Layout {
    let mut painter = Painter::new(&theme.inline, usize::from(width.max(1)));
    painter.paint(node);
    painter.finish()
}

// ─────────────────────────────────────────────────────────────────────────────
// Painter
// ─────────────────────────────────────────────────────────────────────────────

/// Line prefix contributed by one enclosing block
struct Prefix {
    first: Option<Span<'static>>,
    rest: Span<'static>,
}

impl Prefix {
    fn uniform(span: Span<'static>) -> Self {
        Self {
            first: None,
            rest: span,
        }
    }

    fn marker(span: Span<'static>) -> Self {
        let rest = Span::raw(" ".repeat(span.width()));
        Self {
            first: Some(span),
            rest,
        }
    }
}

enum Mark {
    Anchor(String),
    Control(ClipboardAction),
}

struct Painter<'a> {
    inline: &'a InlineStyles,
    width: usize,
    lines: Vec<Line<'static>>,
    anchors: Vec<Anchor>,
    controls: Vec<ControlSlot>,
    prefixes: Vec<Prefix>,
    style: Style,
    fill: bool,
    /// Inside a tight list: no blank lines between blocks
    tight: bool,
    list_depth: usize,
    /// Blank lines owed before the next line
    gap: u16,
    /// Nothing emitted yet in the current container; owed gaps are dropped
    fresh: bool,
    pending: Vec<Mark>,
}

impl<'a> Painter<'a> {
    fn new(inline: &'a InlineStyles, width: usize) -> Self {
        Self {
            inline,
            width,
            lines: Vec::new(),
            anchors: Vec::new(),
            controls: Vec::new(),
            prefixes: Vec::new(),
            style: Style::default(),
            fill: false,
            tight: false,
            list_depth: 0,
            gap: 0,
            fresh: true,
            pending: Vec::new(),
        }
    }

    fn finish(mut self) -> Layout {
        let last = self.lines.len().saturating_sub(1);
        for mark in mem::take(&mut self.pending) {
            if let Mark::Anchor(id) = mark {
                self.anchors.push(Anchor { id, line: last });
            }
        }
        Layout {
            lines: self.lines,
            anchors: self.anchors,
            controls: self.controls,
        }
    }

    fn paint(&mut self, node: &RenderedNode) {
        match node {
            RenderedNode::Empty => {}
            RenderedNode::Sequence(children) => {
                for child in children {
                    self.paint(child);
                }
            }
            RenderedNode::Text(inlines) => self.paint_text(inlines),
            RenderedNode::Raw(content) => self.paint_raw(content),
            RenderedNode::Code { info, content } => self.paint_code(info.as_deref(), content),
            RenderedNode::List(list) => self.paint_list(list),
            RenderedNode::Image(image) => self.paint_image(image),
            RenderedNode::ImageFlow(items) => self.paint_flow(items),
            RenderedNode::Table(table) => self.paint_table(table),
            RenderedNode::Rule { glyph } => {
                let count = self.available_width() / glyph.width().unwrap_or(1).max(1);
                let rule = glyph.to_string().repeat(count);
                self.push_line(vec![Span::styled(rule, self.style)]);
            }
            RenderedNode::Styled { style, child, .. } => self.paint_styled(style, child),
            RenderedNode::Anchored { id, child } => {
                self.pending.push(Mark::Anchor(id.clone()));
                self.paint(child);
            }
            RenderedNode::Overlay { base, control, .. } => {
                self.pending.push(Mark::Control(control.clone()));
                self.paint(base);
            }
        }
    }

    fn paint_styled(&mut self, block: &BlockStyle, child: &RenderedNode) {
        self.request_gap(block.margin_top);
        self.flush_gap();

        let saved_style = self.style;
        let saved_fill = self.fill;
        let depth = self.prefixes.len();
        self.style = self.style.patch(block.text);
        self.fill |= block.fill;

        if block.indent > 0 {
            let indent = " ".repeat(usize::from(block.indent));
            self.prefixes.push(Prefix::uniform(Span::raw(indent)));
        }
        if let Some(border) = &block.border {
            self.prefixes
                .push(Prefix::uniform(Span::styled(border.clone(), self.style)));
            self.fresh = true;
        }
        if let Some(marker) = &block.marker {
            self.prefixes
                .push(Prefix::marker(Span::styled(marker.clone(), self.style)));
        }

        self.paint(child);

        self.prefixes.truncate(depth);
        self.style = saved_style;
        self.fill = saved_fill;
        self.request_gap(block.margin_bottom);
    }

    fn paint_text(&mut self, inlines: &[Inline]) {
        let spans = inline_spans(inlines, self.style, self.inline);
        for line in wrap(spans, self.available_width()) {
            self.push_line(line);
        }
    }

    fn paint_raw(&mut self, content: &str) {
        let style = self.style.patch(self.inline.html);
        for line in content.trim_end_matches('\n').lines() {
            self.push_line(vec![Span::styled(line.to_string(), style)]);
        }
    }

    fn paint_code(&mut self, info: Option<&str>, content: &str) {
        if let Some(info) = info.filter(|info| !info.is_empty()) {
            let label = Span::styled(info.to_string(), self.style.add_modifier(Modifier::DIM));
            self.push_line(vec![label]);
        }
        let body = content.strip_suffix('\n').unwrap_or(content);
        for line in body.split('\n') {
            self.push_line(vec![Span::styled(line.replace('\t', "    "), self.style)]);
        }
    }

    fn paint_list(&mut self, list: &ListNode) {
        let saved_tight = self.tight;
        self.tight = list.tight;

        let number_width = list
            .items
            .iter()
            .filter_map(|item| match item.marker {
                ListMarker::Number(n) => Some(n.to_string().len()),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        for (index, item) in list.items.iter().enumerate() {
            if index > 0 {
                self.request_gap(1);
            }
            self.flush_gap();

            let marker = self.marker_text(item.marker, number_width);
            self.prefixes
                .push(Prefix::marker(Span::styled(marker, self.style)));
            self.fresh = true;
            self.list_depth += 1;

            let before = self.lines.len();
            self.paint(&item.content);
            if self.lines.len() == before {
                self.push_line(Vec::new());
            }

            self.list_depth -= 1;
            self.prefixes.pop();
        }

        self.tight = saved_tight;
    }

    fn marker_text(&self, marker: ListMarker, number_width: usize) -> String {
        match marker {
            ListMarker::Bullet => format!("{} ", BULLETS[self.list_depth % BULLETS.len()]),
            ListMarker::Number(n) => format!("{:>width$}. ", n, width = number_width),
            ListMarker::Checkbox(true) => "[x] ".to_string(),
            ListMarker::Checkbox(false) => "[ ] ".to_string(),
        }
    }

    fn paint_image(&mut self, image: &ImageNode) {
        let mut spans = vec![
            Span::styled(
                format!("{} {}", IMAGE_GLYPH, image_label(image)),
                self.style.patch(self.inline.image),
            ),
            Span::styled(
                format!(" <{}>", image.source),
                self.style.add_modifier(Modifier::DIM),
            ),
        ];
        if let Some(link) = &image.link {
            spans.push(Span::styled(
                format!(" → {}", link),
                self.style.patch(self.inline.link),
            ));
        }
        for line in wrap(spans, self.available_width()) {
            self.push_line(line);
        }
    }

    fn paint_flow(&mut self, items: &[FlowItem]) {
        let style = self.style.patch(self.inline.image);
        let available = self.available_width();
        let mut row: Vec<Span<'static>> = Vec::new();
        let mut used = 0;

        for item in items {
            match item {
                FlowItem::LineBreak => {
                    self.push_line(mem::take(&mut row));
                    used = 0;
                }
                FlowItem::Image(image) => {
                    let cell = format!("[{} {}]", IMAGE_GLYPH, image_label(image));
                    let width = cell.width();
                    if used > 0 && used + 2 + width > available {
                        self.push_line(mem::take(&mut row));
                        used = 0;
                    }
                    if used > 0 {
                        row.push(Span::raw("  "));
                        used += 2;
                    }
                    row.push(Span::styled(cell, style));
                    used += width;
                }
            }
        }
        if !row.is_empty() {
            self.push_line(row);
        }
    }

    fn paint_table(&mut self, table: &TableNode) {
        let columns = table
            .rows
            .iter()
            .map(|row| row.cells.len())
            .max()
            .unwrap_or(0)
            .max(table.alignments.len());
        if table.rows.is_empty() || columns == 0 {
            return;
        }

        let cells: Vec<Vec<Vec<Span<'static>>>> = table
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let base = if index == 0 {
                    self.style.add_modifier(Modifier::BOLD)
                } else {
                    self.style
                };
                (0..columns)
                    .map(|column| {
                        row.cells
                            .get(column)
                            .map(|cell| single_line(inline_spans(cell, base, self.inline)))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = (0..columns)
            .map(|column| {
                cells
                    .iter()
                    .map(|row| spans_width(&row[column]))
                    .max()
                    .unwrap_or(0)
                    .max(1)
            })
            .collect();
        let budget = self
            .available_width()
            .saturating_sub(COLUMN_SEPARATOR.width() * (columns - 1));
        shrink_columns(&mut widths, budget);

        let pad_style = if self.fill { self.style } else { Style::default() };
        for (index, row) in cells.into_iter().enumerate() {
            let mut spans = Vec::new();
            for (column, cell) in row.into_iter().enumerate() {
                if column > 0 {
                    spans.push(Span::styled(COLUMN_SEPARATOR, self.style));
                }
                let alignment = table.alignments.get(column).copied().unwrap_or_default();
                spans.extend(align_cell(cell, widths[column], alignment, pad_style));
            }
            self.push_line(spans);

            if index == 0 {
                let rule = widths
                    .iter()
                    .map(|width| "─".repeat(*width))
                    .collect::<Vec<_>>()
                    .join("─┼─");
                self.push_line(vec![Span::styled(rule, self.style)]);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Line emission
    // ─────────────────────────────────────────────────────────────────────

    fn available_width(&self) -> usize {
        let prefix: usize = self.prefixes.iter().map(|prefix| prefix.rest.width()).sum();
        self.width.saturating_sub(prefix).max(1)
    }

    fn request_gap(&mut self, lines: u16) {
        if !self.tight {
            self.gap = self.gap.max(lines);
        }
    }

    fn flush_gap(&mut self) {
        let gap = mem::take(&mut self.gap);
        if self.fresh {
            return;
        }
        for _ in 0..gap {
            let spans: Vec<Span<'static>> =
                self.prefixes.iter().map(|prefix| prefix.rest.clone()).collect();
            self.lines.push(Line::from(spans));
        }
    }

    fn push_line(&mut self, content: Vec<Span<'static>>) {
        self.flush_gap();

        let mut spans: Vec<Span<'static>> = self
            .prefixes
            .iter_mut()
            .map(|prefix| prefix.first.take().unwrap_or_else(|| prefix.rest.clone()))
            .collect();
        spans.extend(content);

        let pad_style = if self.fill { self.style } else { Style::default() };
        if self.fill {
            spans = fit_spans(spans, self.width, pad_style);
        }

        let line = self.lines.len();
        for mark in mem::take(&mut self.pending) {
            match mark {
                Mark::Anchor(id) => self.anchors.push(Anchor { id, line }),
                Mark::Control(action) => {
                    let label = control_label(action.indicator().icon);
                    let column = self.width.saturating_sub(label.width());
                    spans = fit_spans(spans, column, pad_style);
                    spans.push(Span::styled(label, self.inline.copy_control));
                    self.controls.push(ControlSlot {
                        line,
                        column,
                        action,
                    });
                }
            }
        }

        self.lines.push(Line::from(spans));
        self.fresh = false;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline text
// ─────────────────────────────────────────────────────────────────────────────

fn inline_spans(inlines: &[Inline], base: Style, styles: &InlineStyles) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    collect_spans(inlines, base, styles, &mut spans);
    spans
}

fn collect_spans(
    inlines: &[Inline],
    base: Style,
    styles: &InlineStyles,
    out: &mut Vec<Span<'static>>,
) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push(Span::styled(text.clone(), base)),
            Inline::Code(code) => out.push(Span::styled(code.clone(), base.patch(styles.code))),
            Inline::Html(html) => out.push(Span::styled(html.clone(), base.patch(styles.html))),
            Inline::SoftBreak => out.push(Span::styled(" ", base)),
            Inline::LineBreak => out.push(Span::styled("\n", base)),
            Inline::Emphasis(children) => {
                collect_spans(children, base.add_modifier(Modifier::ITALIC), styles, out)
            }
            Inline::Strong(children) => {
                collect_spans(children, base.add_modifier(Modifier::BOLD), styles, out)
            }
            Inline::Strikethrough(children) => {
                collect_spans(children, base.add_modifier(Modifier::CROSSED_OUT), styles, out)
            }
            Inline::Link { children, .. } => {
                collect_spans(children, base.patch(styles.link), styles, out)
            }
            // Images inside running text show their alt text only
            Inline::Image { source, children } => {
                let alt = plain_text(children);
                let label = if alt.is_empty() { source.clone() } else { alt };
                out.push(Span::styled(label, base.patch(styles.image)));
            }
        }
    }
}

fn image_label(image: &ImageNode) -> &str {
    if image.alt.is_empty() {
        "image"
    } else {
        &image.alt
    }
}

/// Greedy word wrap; `\n` forces a break and over-long words are split
fn wrap(spans: Vec<Span<'static>>, width: usize) -> Vec<Vec<Span<'static>>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for span in &spans {
        for piece in pieces(&span.content) {
            if piece == "\n" {
                trim_trailing(&mut line);
                lines.push(mem::take(&mut line));
                used = 0;
                continue;
            }

            let piece_width = piece.width();
            if piece.chars().all(char::is_whitespace) {
                if used == 0 {
                    continue;
                }
                if used + piece_width > width {
                    trim_trailing(&mut line);
                    lines.push(mem::take(&mut line));
                    used = 0;
                    continue;
                }
                push_piece(&mut line, piece, span.style);
                used += piece_width;
                continue;
            }

            if used > 0 && used + piece_width > width {
                trim_trailing(&mut line);
                lines.push(mem::take(&mut line));
                used = 0;
            }
            if piece_width <= width {
                push_piece(&mut line, piece, span.style);
                used += piece_width;
                continue;
            }

            let mut buf = [0u8; 4];
            for ch in piece.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if used > 0 && used + ch_width > width {
                    lines.push(mem::take(&mut line));
                    used = 0;
                }
                push_piece(&mut line, ch.encode_utf8(&mut buf), span.style);
                used += ch_width;
            }
        }
    }

    trim_trailing(&mut line);
    lines.push(line);
    lines
}

/// Split into newlines, whitespace runs and word runs
fn pieces(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut kind = None;
    for (index, ch) in text.char_indices() {
        let current = if ch == '\n' {
            0
        } else if ch.is_whitespace() {
            1
        } else {
            2
        };
        if kind != Some(current) || current == 0 {
            if index > start {
                out.push(&text[start..index]);
            }
            start = index;
            kind = Some(current);
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

fn push_piece(line: &mut Vec<Span<'static>>, piece: &str, style: Style) {
    match line.last_mut() {
        Some(last) if last.style == style => last.content.to_mut().push_str(piece),
        _ => line.push(Span::styled(piece.to_string(), style)),
    }
}

fn trim_trailing(line: &mut Vec<Span<'static>>) {
    while let Some(last) = line.last_mut() {
        let trimmed = last.content.trim_end().len();
        if trimmed == 0 {
            line.pop();
            continue;
        }
        last.content.to_mut().truncate(trimmed);
        break;
    }
}

fn single_line(spans: Vec<Span<'static>>) -> Vec<Span<'static>> {
    spans
        .into_iter()
        .map(|span| {
            if span.content.contains('\n') {
                Span::styled(span.content.replace('\n', " "), span.style)
            } else {
                span
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Width helpers
// ─────────────────────────────────────────────────────────────────────────────

fn spans_width(spans: &[Span<'_>]) -> usize {
    spans.iter().map(|span| span.width()).sum()
}

/// Cut to at most `max` columns, ending in `…` when anything was dropped
fn truncate_spans(spans: Vec<Span<'static>>, max: usize) -> Vec<Span<'static>> {
    if spans_width(&spans) <= max {
        return spans;
    }

    let budget = max.saturating_sub(1);
    let mut out = Vec::new();
    let mut used = 0;
    let mut last_style = Style::default();

    'spans: for span in spans {
        last_style = span.style;
        let mut kept = String::new();
        for ch in span.content.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if used + ch_width > budget {
                if !kept.is_empty() {
                    out.push(Span::styled(kept, span.style));
                }
                break 'spans;
            }
            kept.push(ch);
            used += ch_width;
        }
        out.push(Span::styled(kept, span.style));
    }

    if max > 0 {
        out.push(Span::styled("…", last_style));
    }
    out
}

/// Truncate or pad to exactly `width` columns
fn fit_spans(spans: Vec<Span<'static>>, width: usize, pad_style: Style) -> Vec<Span<'static>> {
    let mut spans = truncate_spans(spans, width);
    let used = spans_width(&spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), pad_style));
    }
    spans
}

/// Narrow the widest columns until the row fits `budget`
fn shrink_columns(widths: &mut [usize], budget: usize) {
    while widths.iter().sum::<usize>() > budget {
        let Some((index, widest)) = widths
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(_, width)| *width)
        else {
            return;
        };
        if widest <= 1 {
            return;
        }
        widths[index] -= 1;
    }
}

fn align_cell(
    cell: Vec<Span<'static>>,
    width: usize,
    alignment: ColumnAlignment,
    pad_style: Style,
) -> Vec<Span<'static>> {
    let cell = truncate_spans(cell, width);
    let pad = width.saturating_sub(spans_width(&cell));
    let spaces = |count: usize| Span::styled(" ".repeat(count), pad_style);

    let (left, right) = match alignment {
        ColumnAlignment::Right => (pad, 0),
        ColumnAlignment::Center => (pad / 2, pad - pad / 2),
        ColumnAlignment::Left | ColumnAlignment::None => (0, pad),
    };

    let mut spans = Vec::with_capacity(cell.len() + 2);
    if left > 0 {
        spans.push(spaces(left));
    }
    spans.extend(cell);
    if right > 0 {
        spans.push(spaces(right));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::NoopClipboard;
    use crate::document::parse;
    use crate::render::{BlockRenderer, Capabilities};
    use std::sync::Arc;

    fn render_with(markdown: &str, theme: &StyleTheme, capabilities: Capabilities, width: u16) -> Layout {
        let renderer = BlockRenderer::new(capabilities, Arc::new(NoopClipboard));
        let node = renderer.render_document(&parse(markdown), theme);
        layout(&node, theme, width)
    }

    fn render(markdown: &str, width: u16) -> Layout {
        render_with(markdown, &StyleTheme::default(), Capabilities::ADVANCED, width)
    }

    fn lines(markdown: &str, width: u16) -> Vec<String> {
        render(markdown, width).plain_lines()
    }

    #[test]
    fn test_heading_then_paragraph() {
        let layout = render("# Title\n\nHello world", 40);
        assert_eq!(layout.plain_lines(), vec!["# Title", "", "Hello world"]);
        assert_eq!(
            layout.anchors,
            vec![Anchor {
                id: "title".to_string(),
                line: 0
            }]
        );
    }

    #[test]
    fn test_margins_collapse_between_blocks() {
        let layout = render("intro\n\n## Next", 40);
        assert_eq!(layout.plain_lines(), vec!["intro", "", "## Next"]);
        assert_eq!(layout.anchor_line("next"), Some(2));
        assert_eq!(layout.anchor_line("missing"), None);
    }

    #[test]
    fn test_paragraph_wraps_at_width() {
        assert_eq!(lines("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn test_long_word_is_split() {
        assert_eq!(lines("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_breaks() {
        assert_eq!(lines("a\nb", 40), vec!["a b"]);
        assert_eq!(lines("a  \nb", 40), vec!["a", "b"]);
    }

    #[test]
    fn test_blockquote_border_on_every_line() {
        assert_eq!(lines("> one\n>\n> two", 40), vec!["│ one", "│", "│ two"]);
    }

    #[test]
    fn test_tight_bullet_list_with_nesting() {
        assert_eq!(
            lines("- a\n- b\n  - c\n", 40),
            vec!["• a", "• b", "  ◦ c"]
        );
    }

    #[test]
    fn test_loose_list_separates_items() {
        assert_eq!(lines("- a\n\n- b\n", 40), vec!["• a", "", "• b"]);
    }

    #[test]
    fn test_numbered_markers_align() {
        assert_eq!(lines("9. x\n10. y\n", 40), vec![" 9. x", "10. y"]);
    }

    #[test]
    fn test_task_list_checkboxes() {
        assert_eq!(
            lines("- [x] done\n- [ ] todo\n", 40),
            vec!["[x] done", "[ ] todo"]
        );
    }

    #[test]
    fn test_list_item_wraps_under_its_text() {
        assert_eq!(lines("- aaa bbb\n", 7), vec!["• aaa", "  bbb"]);
    }

    #[test]
    fn test_code_block_with_control_at_trailing_edge() {
        let layout = render("```rust\nfn main() {}\n```\n", 30);
        let plain = layout.plain_lines();

        assert_eq!(plain[1], "  fn main() {}");
        assert!(plain[0].starts_with("  rust"));
        assert!(plain[0].ends_with(CopyIcon::Copy.glyph()));
        assert_eq!(spans_width(&layout.lines[0].spans), 30);

        assert_eq!(layout.controls.len(), 1);
        assert_eq!(layout.controls[0].line, 0);
        assert_eq!(layout.controls[0].column, 27);
        assert_eq!(layout.controls[0].action.content(), "fn main() {}\n");
    }

    #[test]
    fn test_code_is_not_wrapped() {
        let layout = render("```\nlet value = compute(alpha, beta);\n```\n", 20);
        assert_eq!(layout.lines.len(), 1);
        // Cut short to make room for the copy control, never wrapped
        assert!(layout.plain_lines()[0].starts_with("  let value = co…"));
    }

    #[test]
    fn test_filled_code_block_pads_every_line() {
        let mut theme = StyleTheme::default();
        theme.code_block.fill = true;
        let layout = render_with("```\na\nbb\n```\n", &theme, Capabilities::ADVANCED, 24);
        for line in &layout.lines {
            assert_eq!(spans_width(&line.spans), 24);
        }
    }

    #[test]
    fn test_table_alignment_and_header_rule() {
        assert_eq!(
            lines("| a | b |\n|:--|--:|\n| 1 | 22 |\n", 40),
            vec!["a │  b", "──┼───", "1 │ 22"]
        );
    }

    #[test]
    fn test_table_columns_shrink_to_fit() {
        assert_eq!(
            lines("| aaaaaaaaaa | b |\n|---|---|\n", 8),
            vec!["aaa… │ b", "─────┼──"]
        );
    }

    #[test]
    fn test_table_omitted_without_advanced_layout() {
        let layout = render_with(
            "| a |\n|---|\n| 1 |\n",
            &StyleTheme::default(),
            Capabilities::BASIC,
            40,
        );
        assert!(layout.lines.is_empty());
    }

    #[test]
    fn test_thematic_break_spans_width() {
        assert_eq!(lines("---", 10), vec!["──────────"]);
    }

    #[test]
    fn test_standalone_image() {
        assert_eq!(lines("![A cat](cat.png)", 40), vec!["▣ A cat <cat.png>"]);
    }

    #[test]
    fn test_image_flow_and_basic_fallback() {
        let markdown = "![a](a.png) ![b](b.png)";
        assert_eq!(lines(markdown, 40), vec!["[▣ a]  [▣ b]"]);

        let basic = render_with(markdown, &StyleTheme::default(), Capabilities::BASIC, 40);
        assert_eq!(basic.plain_lines(), vec!["a b"]);
    }

    #[test]
    fn test_raw_block_is_verbatim() {
        assert_eq!(
            lines("<div>\n  <b>x</b>\n</div>\n", 40),
            vec!["<div>", "  <b>x</b>", "</div>"]
        );
    }

    #[test]
    fn test_pieces() {
        assert_eq!(pieces("ab  c\n\nd"), vec!["ab", "  ", "c", "\n", "\n", "d"]);
        assert!(pieces("").is_empty());
    }

    #[test]
    fn test_truncate_spans() {
        let spans = vec![Span::raw("hello"), Span::raw(" world")];
        let cut = truncate_spans(spans, 7);
        let text: String = cut.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(text, "hello …");
        assert_eq!(spans_width(&cut), 7);
    }
}
