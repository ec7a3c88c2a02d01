// Markdown → block tree
//
// Walks pulldown-cmark's event stream and folds it into the nested Block /
// Inline tree. Each container Start event recurses until its matching End,
// so the tree mirrors the markdown nesting exactly.
//
// Enabled extensions: tables, strikethrough, task lists.

use super::{Block, ColumnAlignment, Inline, ListItem, TableRow, TaskListItem};
use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Parse markdown text into a block sequence
pub fn parse(markdown: &str) -> Vec<Block> {
    let options =
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;

    let mut builder = TreeBuilder {
        events: Parser::new_ext(markdown, options),
        task_marker: None,
        item_has_paragraph: false,
    };
    builder.blocks_until(None)
}

struct TreeBuilder<I> {
    events: I,
    /// Checkbox state of the list item currently being built
    task_marker: Option<bool>,
    /// Set when a list item holds an explicit paragraph (the list is loose)
    item_has_paragraph: bool,
}

impl<'a, I> TreeBuilder<I>
where
    I: Iterator<Item = Event<'a>>,
{
    /// Collect blocks until `end` (or end of input when `None`)
    fn blocks_until(&mut self, end: Option<TagEnd>) -> Vec<Block> {
        let mut blocks = Vec::new();
        // Inline content outside a paragraph (tight list items)
        let mut loose: Vec<Inline> = Vec::new();

        while let Some(event) = self.events.next() {
            match event {
                Event::End(tag) => {
                    if Some(tag) == end {
                        break;
                    }
                }

                Event::Start(Tag::Paragraph) => {
                    flush_paragraph(&mut loose, &mut blocks);
                    if end == Some(TagEnd::Item) {
                        self.item_has_paragraph = true;
                    }
                    let inlines = self.inlines_until(TagEnd::Paragraph);
                    blocks.push(Block::Paragraph(inlines));
                }

                Event::Start(Tag::Heading { level, .. }) => {
                    flush_paragraph(&mut loose, &mut blocks);
                    let inlines = self.inlines_until(TagEnd::Heading(level));
                    blocks.push(Block::Heading {
                        level: heading_level(level),
                        inlines,
                    });
                }

                Event::Start(Tag::BlockQuote) => {
                    flush_paragraph(&mut loose, &mut blocks);
                    let children = self.blocks_until(Some(TagEnd::BlockQuote));
                    blocks.push(Block::Blockquote(children));
                }

                Event::Start(Tag::CodeBlock(kind)) => {
                    flush_paragraph(&mut loose, &mut blocks);
                    let info = match kind {
                        CodeBlockKind::Fenced(info) => {
                            let info = info.trim();
                            (!info.is_empty()).then(|| info.to_string())
                        }
                        CodeBlockKind::Indented => None,
                    };
                    let content = self.text_until(TagEnd::CodeBlock);
                    blocks.push(Block::CodeBlock { info, content });
                }

                Event::Start(Tag::HtmlBlock) => {
                    flush_paragraph(&mut loose, &mut blocks);
                    blocks.push(Block::RawBlock(self.text_until(TagEnd::HtmlBlock)));
                }

                Event::Html(html) => {
                    flush_paragraph(&mut loose, &mut blocks);
                    blocks.push(Block::RawBlock(html.to_string()));
                }

                Event::Start(Tag::List(start)) => {
                    flush_paragraph(&mut loose, &mut blocks);
                    blocks.push(self.list(start));
                }

                Event::Start(Tag::Table(alignments)) => {
                    flush_paragraph(&mut loose, &mut blocks);
                    blocks.push(self.table(alignments));
                }

                Event::Rule => {
                    flush_paragraph(&mut loose, &mut blocks);
                    blocks.push(Block::ThematicBreak);
                }

                other => {
                    if let Some(inline) = self.inline(other) {
                        push_inline(&mut loose, inline);
                    }
                }
            }
        }

        flush_paragraph(&mut loose, &mut blocks);
        blocks
    }

    /// Collect inline content until `end`
    fn inlines_until(&mut self, end: TagEnd) -> Vec<Inline> {
        let mut inlines = Vec::new();
        while let Some(event) = self.events.next() {
            match event {
                Event::End(tag) if tag == end => break,
                other => {
                    if let Some(inline) = self.inline(other) {
                        push_inline(&mut inlines, inline);
                    }
                }
            }
        }
        inlines
    }

    /// Concatenate literal text until `end` (code and HTML blocks)
    fn text_until(&mut self, end: TagEnd) -> String {
        let mut text = String::new();
        while let Some(event) = self.events.next() {
            match event {
                Event::End(tag) if tag == end => break,
                Event::Text(t) | Event::Html(t) | Event::InlineHtml(t) => text.push_str(&t),
                _ => {}
            }
        }
        text
    }

    fn inline(&mut self, event: Event<'a>) -> Option<Inline> {
        match event {
            Event::Text(text) => Some(Inline::Text(text.to_string())),
            Event::Code(code) => Some(Inline::Code(code.to_string())),
            Event::InlineHtml(html) => Some(Inline::Html(html.to_string())),
            Event::SoftBreak => Some(Inline::SoftBreak),
            Event::HardBreak => Some(Inline::LineBreak),
            Event::FootnoteReference(label) => Some(Inline::Text(format!("[^{}]", label))),
            Event::TaskListMarker(checked) => {
                self.task_marker = Some(checked);
                None
            }
            Event::Start(Tag::Emphasis) => {
                Some(Inline::Emphasis(self.inlines_until(TagEnd::Emphasis)))
            }
            Event::Start(Tag::Strong) => Some(Inline::Strong(self.inlines_until(TagEnd::Strong))),
            Event::Start(Tag::Strikethrough) => Some(Inline::Strikethrough(
                self.inlines_until(TagEnd::Strikethrough),
            )),
            Event::Start(Tag::Link { dest_url, .. }) => Some(Inline::Link {
                destination: dest_url.to_string(),
                children: self.inlines_until(TagEnd::Link),
            }),
            Event::Start(Tag::Image { dest_url, .. }) => Some(Inline::Image {
                source: dest_url.to_string(),
                children: self.inlines_until(TagEnd::Image),
            }),
            _ => None,
        }
    }

    fn list(&mut self, start: Option<u64>) -> Block {
        // Nested lists must not clobber the enclosing item's state
        let parent_marker = self.task_marker.take();
        let parent_loose = std::mem::replace(&mut self.item_has_paragraph, false);

        let mut items: Vec<(Option<bool>, Vec<Block>)> = Vec::new();
        while let Some(event) = self.events.next() {
            match event {
                Event::Start(Tag::Item) => {
                    self.task_marker = None;
                    let blocks = self.blocks_until(Some(TagEnd::Item));
                    items.push((self.task_marker.take(), blocks));
                }
                Event::End(TagEnd::List(_)) => break,
                _ => {}
            }
        }

        let tight = !self.item_has_paragraph;
        self.task_marker = parent_marker;
        self.item_has_paragraph = parent_loose;

        if items.iter().any(|(marker, _)| marker.is_some()) {
            Block::TaskList {
                tight,
                items: items
                    .into_iter()
                    .map(|(marker, blocks)| TaskListItem {
                        checked: marker.unwrap_or(false),
                        blocks,
                    })
                    .collect(),
            }
        } else {
            let items = items
                .into_iter()
                .map(|(_, blocks)| ListItem { blocks })
                .collect();
            match start {
                Some(start) => Block::NumberedList {
                    tight,
                    start,
                    items,
                },
                None => Block::BulletedList { tight, items },
            }
        }
    }

    fn table(&mut self, alignments: Vec<Alignment>) -> Block {
        let alignments = alignments.into_iter().map(column_alignment).collect();
        let mut rows = Vec::new();
        let mut cells = Vec::new();

        while let Some(event) = self.events.next() {
            match event {
                Event::Start(Tag::TableHead) | Event::Start(Tag::TableRow) => cells.clear(),
                Event::Start(Tag::TableCell) => cells.push(self.inlines_until(TagEnd::TableCell)),
                Event::End(TagEnd::TableHead) | Event::End(TagEnd::TableRow) => {
                    rows.push(TableRow {
                        cells: std::mem::take(&mut cells),
                    });
                }
                Event::End(TagEnd::Table) => break,
                _ => {}
            }
        }

        Block::Table { alignments, rows }
    }
}

/// Append an inline, merging adjacent text runs
fn push_inline(inlines: &mut Vec<Inline>, inline: Inline) {
    if let (Some(Inline::Text(prev)), Inline::Text(next)) = (inlines.last_mut(), &inline) {
        prev.push_str(next);
        return;
    }
    inlines.push(inline);
}

/// Turn stray inline content into an implicit paragraph
fn flush_paragraph(loose: &mut Vec<Inline>, blocks: &mut Vec<Block>) {
    if loose.iter().all(Inline::is_blank) {
        loose.clear();
        return;
    }
    blocks.push(Block::Paragraph(std::mem::take(loose)));
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn column_alignment(alignment: Alignment) -> ColumnAlignment {
    match alignment {
        Alignment::None => ColumnAlignment::None,
        Alignment::Left => ColumnAlignment::Left,
        Alignment::Center => ColumnAlignment::Center,
        Alignment::Right => ColumnAlignment::Right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_parse_heading_levels() {
        let blocks = parse("# One\n\n### Three");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    inlines: vec![text("One")],
                },
                Block::Heading {
                    level: 3,
                    inlines: vec![text("Three")],
                },
            ]
        );
    }

    #[test]
    fn test_parse_code_block_info_string() {
        let blocks = parse("```rust\nfn main() {}\n```");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                info: Some("rust".to_string()),
                content: "fn main() {}\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_indented_code_has_no_info() {
        let blocks = parse("    let x = 1;\n");
        assert!(matches!(
            &blocks[0],
            Block::CodeBlock { info: None, content } if content == "let x = 1;\n"
        ));
    }

    #[test]
    fn test_parse_tight_bulleted_list() {
        let blocks = parse("- a\n- b\n");
        let Block::BulletedList { tight, items } = &blocks[0] else {
            panic!("expected bulleted list, got {:?}", blocks[0]);
        };
        assert!(*tight);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].blocks, vec![Block::Paragraph(vec![text("a")])]);
    }

    #[test]
    fn test_parse_loose_list() {
        let blocks = parse("- a\n\n- b\n");
        assert!(matches!(&blocks[0], Block::BulletedList { tight: false, .. }));
    }

    #[test]
    fn test_nested_blockquote_does_not_loosen_list() {
        let blocks = parse("- a\n  > quoted\n- b\n");
        assert!(matches!(&blocks[0], Block::BulletedList { tight: true, .. }));
    }

    #[test]
    fn test_parse_numbered_list_start() {
        let blocks = parse("3. three\n4. four\n");
        assert!(matches!(
            &blocks[0],
            Block::NumberedList { start: 3, items, .. } if items.len() == 2
        ));
    }

    #[test]
    fn test_parse_task_list() {
        let blocks = parse("- [x] done\n- [ ] todo\n");
        let Block::TaskList { items, .. } = &blocks[0] else {
            panic!("expected task list, got {:?}", blocks[0]);
        };
        assert!(items[0].checked);
        assert!(!items[1].checked);
        assert_eq!(items[1].blocks, vec![Block::Paragraph(vec![text("todo")])]);
    }

    #[test]
    fn test_nested_list_keeps_parent_task_marker() {
        let blocks = parse("- [x] parent\n  - child\n");
        let Block::TaskList { items, .. } = &blocks[0] else {
            panic!("expected task list, got {:?}", blocks[0]);
        };
        assert!(items[0].checked);
        assert!(matches!(items[0].blocks[1], Block::BulletedList { .. }));
    }

    #[test]
    fn test_parse_table() {
        let md = "| a | b |\n|:--|--:|\n| 1 | 2 |\n| 3 | 4 |\n";
        let blocks = parse(md);
        let Block::Table { alignments, rows } = &blocks[0] else {
            panic!("expected table, got {:?}", blocks[0]);
        };
        assert_eq!(
            alignments,
            &vec![ColumnAlignment::Left, ColumnAlignment::Right]
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].cells[0], vec![text("a")]);
        assert_eq!(rows[2].cells[1], vec![text("4")]);
    }

    #[test]
    fn test_parse_html_block_is_raw() {
        let blocks = parse("<div>\nhi\n</div>\n");
        assert!(matches!(&blocks[0], Block::RawBlock(raw) if raw.contains("<div>")));
    }

    #[test]
    fn test_parse_blockquote_and_rule() {
        let blocks = parse("> quoted\n\n---\n");
        assert_eq!(
            blocks,
            vec![
                Block::Blockquote(vec![Block::Paragraph(vec![text("quoted")])]),
                Block::ThematicBreak,
            ]
        );
    }

    #[test]
    fn test_parse_image_paragraph() {
        let blocks = parse("![logo](logo.png)");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![Inline::Image {
                source: "logo.png".to_string(),
                children: vec![text("logo")],
            }])]
        );
    }

    #[test]
    fn test_parse_inline_markup() {
        let blocks = parse("a **b** *c* ~~d~~ [e](f)");
        let Block::Paragraph(inlines) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(inlines.contains(&Inline::Strong(vec![text("b")])));
        assert!(inlines.contains(&Inline::Emphasis(vec![text("c")])));
        assert!(inlines.contains(&Inline::Strikethrough(vec![text("d")])));
        assert!(inlines.contains(&Inline::Link {
            destination: "f".to_string(),
            children: vec![text("e")],
        }));
    }
}
