//! Toast notification component
//!
//! A non-blocking overlay that auto-dismisses after a fixed duration.
//! Renders in the bottom-right corner of the document area.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

/// A toast notification that auto-dismisses
#[derive(Debug, Clone)]
pub struct Toast {
    /// Message to display
    pub message: String,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    /// Create a new toast with default 2-second duration
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            created_at: Instant::now(),
            duration: Duration::from_secs(2),
        }
    }

    /// Check if the toast has expired and should be removed
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// Render the toast in the bottom-right corner of `area`
    pub fn render(&self, f: &mut Frame, area: Rect, style: Style) {
        // 1 line of text + 2 for borders, 2 chars padding each side
        let width = (self.message.width() as u16 + 4).min(area.width.saturating_sub(2));
        let height = 3;
        if width < 5 || area.height < height {
            return;
        }

        let x = area.right().saturating_sub(width + 1);
        let y = area.bottom().saturating_sub(height);
        let toast_area = Rect::new(x, y, width, height);

        let block = Block::default().borders(Borders::ALL).border_style(style);
        let text = Paragraph::new(self.message.as_str())
            .alignment(Alignment::Center)
            .style(style)
            .block(block);

        // Clear the area first so toast appears on top
        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_toast_is_live() {
        let toast = Toast::new("Copied");
        assert_eq!(toast.message, "Copied");
        assert!(!toast.is_expired());
    }
}
