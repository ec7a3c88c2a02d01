// Image paragraph detection
//
// A paragraph is shown as a standalone image when its only content is one
// image (optionally wrapped in a link). It is shown as an image flow when it
// holds nothing but images, linked images and breaks between them.

use crate::document::{plain_text, Inline};

/// One image reference lifted out of a paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageNode {
    pub source: String,
    /// Alt text, flattened
    pub alt: String,
    /// Destination when the image is wrapped in a link
    pub link: Option<String>,
}

/// Element of an image flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowItem {
    Image(ImageNode),
    /// Explicit line break: start a new row
    LineBreak,
}

/// The paragraph's single image, if that is all it contains
pub fn image_view(inlines: &[Inline]) -> Option<ImageNode> {
    let mut content = inlines.iter().filter(|inline| !inline.is_blank());
    let image = image_node(content.next()?)?;
    content.next().is_none().then_some(image)
}

/// Images and breaks for a flow layout, if nothing else is in the paragraph
pub fn image_flow(inlines: &[Inline]) -> Option<Vec<FlowItem>> {
    let mut items = Vec::new();
    for inline in inlines {
        match inline {
            Inline::SoftBreak => {}
            Inline::Text(_) if inline.is_blank() => {}
            Inline::LineBreak => items.push(FlowItem::LineBreak),
            other => items.push(FlowItem::Image(image_node(other)?)),
        }
    }

    items
        .iter()
        .any(|item| matches!(item, FlowItem::Image(_)))
        .then_some(items)
}

fn image_node(inline: &Inline) -> Option<ImageNode> {
    match inline {
        Inline::Image { source, children } => Some(ImageNode {
            source: source.clone(),
            alt: plain_text(children),
            link: None,
        }),
        Inline::Link {
            destination,
            children,
        } => {
            let mut content = children.iter().filter(|inline| !inline.is_blank());
            let first = content.next()?;
            if content.next().is_some() || matches!(first, Inline::Link { .. }) {
                return None;
            }
            let mut image = image_node(first)?;
            image.link = Some(destination.clone());
            Some(image)
        }
        _ => None,
    }
}
