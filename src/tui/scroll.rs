// Scroll state for the document body
//
// Owns position, content size and viewport size. The offset is the index of
// the first visible line and is always clamped to the scrollable range once
// dimensions are known.

/// Scroll state for a line-based view
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    /// Current scroll offset (line index at top of viewport)
    offset: usize,

    /// Total number of lines in content
    total: usize,

    /// Number of lines visible in viewport
    viewport: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update content and viewport dimensions
    /// Call this whenever the layout or terminal size changes
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.offset = (self.offset + 1).min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        let page = self.viewport.max(1);
        self.offset = self.offset.saturating_sub(page);
    }

    pub fn page_down(&mut self) {
        let page = self.viewport.max(1);
        self.offset = (self.offset + page).min(self.max_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Put `line` at the top of the viewport (as far as the content allows)
    pub fn scroll_to(&mut self, line: usize) {
        self.offset = line.min(self.max_offset());
    }

    /// Scroll the minimum needed to make `line` visible
    pub fn reveal(&mut self, line: usize) {
        if line < self.offset {
            self.offset = line;
        } else if self.viewport > 0 && line >= self.offset + self.viewport {
            self.offset = (line + 1 - self.viewport).min(self.max_offset());
        }
    }

    /// Get current scroll offset
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get visible range (start_index, end_index)
    pub fn visible_range(&self) -> (usize, usize) {
        let start = self.offset;
        let end = (self.offset + self.viewport).min(self.total);
        (start, end)
    }

    /// Scroll position as a percentage for the status bar
    pub fn percent(&self) -> u16 {
        if self.max_offset() == 0 {
            100
        } else {
            (self.offset * 100 / self.max_offset()) as u16
        }
    }

    /// Maximum valid offset
    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }

    /// Get total content size
    pub fn total(&self) -> usize {
        self.total
    }

    /// Get viewport size
    pub fn viewport(&self) -> usize {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_is_clamped() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(20, 5);

        scroll.scroll_up();
        assert_eq!(scroll.offset(), 0);

        scroll.scroll_to_bottom();
        assert_eq!(scroll.offset(), 15);
        scroll.scroll_down();
        assert_eq!(scroll.offset(), 15);
    }

    #[test]
    fn test_pages() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(12, 5);

        scroll.page_down();
        assert_eq!(scroll.offset(), 5);
        scroll.page_down();
        assert_eq!(scroll.offset(), 7);
        scroll.page_up();
        assert_eq!(scroll.offset(), 2);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(100, 10);
        scroll.scroll_to(80);
        assert_eq!(scroll.offset(), 80);

        scroll.update_dimensions(30, 10);
        assert_eq!(scroll.offset(), 20);
    }

    #[test]
    fn test_reveal_scrolls_minimally() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(100, 10);

        scroll.reveal(4);
        assert_eq!(scroll.offset(), 0);
        scroll.reveal(14);
        assert_eq!(scroll.offset(), 5);
        scroll.reveal(2);
        assert_eq!(scroll.offset(), 2);
    }

    #[test]
    fn test_visible_range_and_percent() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(100, 10);
        assert_eq!(scroll.visible_range(), (0, 10));
        assert_eq!(scroll.percent(), 0);

        scroll.scroll_to_bottom();
        assert_eq!(scroll.visible_range(), (90, 100));
        assert_eq!(scroll.percent(), 100);

        scroll.update_dimensions(3, 10);
        assert_eq!(scroll.percent(), 100);
    }
}
