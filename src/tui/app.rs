// Viewer application state
//
// Holds the parsed document, its rendered node tree and the layout for the
// current terminal width. Rendering happens once per document or capability
// change; layout happens again whenever the width changes.

use super::scroll::ScrollState;
use super::toast::Toast;
use crate::document::Block;
use crate::logging::{LogBuffer, LogEntry, LogLevel};
use crate::render::{layout, BlockRenderer, Capabilities, ControlSlot, Layout, RenderedNode};
use crate::theme::StyleTheme;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Main application state for the viewer
pub struct App {
    /// File name shown in the status bar
    pub title: String,
    document: Vec<Block>,
    renderer: BlockRenderer,
    theme: StyleTheme,
    rendered: RenderedNode,
    layout: Layout,
    /// Width the current layout was computed for
    width: u16,
    layout_dirty: bool,
    pub scroll: ScrollState,
    /// Index into the layout's copy controls
    focused: Option<usize>,
    /// Heading to jump to once the first layout exists
    pending_anchor: Option<String>,
    log_buffer: LogBuffer,
    pub toast: Option<Toast>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        title: impl Into<String>,
        document: Vec<Block>,
        renderer: BlockRenderer,
        theme: StyleTheme,
        log_buffer: LogBuffer,
    ) -> Self {
        let rendered = renderer.render_document(&document, &theme);
        Self {
            title: title.into(),
            document,
            renderer,
            theme,
            rendered,
            layout: Layout::default(),
            width: 0,
            layout_dirty: true,
            scroll: ScrollState::new(),
            focused: None,
            pending_anchor: None,
            log_buffer,
            toast: None,
            should_quit: false,
        }
    }

    /// Jump to heading `id` once the document is laid out
    pub fn with_anchor(mut self, id: impl Into<String>) -> Self {
        self.pending_anchor = Some(id.into());
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn theme(&self) -> &StyleTheme {
        &self.theme
    }

    pub fn capabilities(&self) -> Capabilities {
        self.renderer.capabilities()
    }

    /// Index of the focused copy control
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_control(&self) -> Option<&ControlSlot> {
        self.focused.and_then(|index| self.layout.controls.get(index))
    }

    /// Latest warning or error for the status bar
    pub fn latest_warning(&self) -> Option<LogEntry> {
        self.log_buffer.latest_at_least(LogLevel::Warn)
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    /// Periodic housekeeping between frames
    pub fn tick(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    /// Fit the layout to the document area
    pub fn resize(&mut self, width: u16, height: u16) {
        if width != self.width || self.layout_dirty {
            self.width = width;
            self.layout_dirty = false;
            self.layout = layout(&self.rendered, &self.theme, width);
            if self
                .focused
                .is_some_and(|index| index >= self.layout.controls.len())
            {
                self.focused = None;
            }
            tracing::debug!(
                width,
                lines = self.layout.lines.len(),
                controls = self.layout.controls.len(),
                "Document laid out"
            );
        }
        self.scroll
            .update_dimensions(self.layout.lines.len(), usize::from(height));

        if let Some(id) = self.pending_anchor.take() {
            match self.layout.anchor_line(&id) {
                Some(line) => self.scroll.scroll_to(line),
                None => {
                    tracing::warn!("No heading with anchor {:?}", id);
                    self.show_toast(format!("No heading #{}", id));
                }
            }
        }
    }

    /// Render the document again with the current capabilities
    fn rerender(&mut self) {
        self.rendered = self.renderer.render_document(&self.document, &self.theme);
        self.layout_dirty = true;
        self.focused = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll.scroll_up(),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll.page_down(),
            KeyCode::PageUp => self.scroll.page_up(),
            KeyCode::Char('g') | KeyCode::Home => self.scroll.scroll_to_top(),
            KeyCode::Char('G') | KeyCode::End => self.scroll.scroll_to_bottom(),
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_prev(),
            KeyCode::Char('y') | KeyCode::Enter => self.copy_focused(),
            KeyCode::Char(']') => self.next_heading(),
            KeyCode::Char('[') => self.prev_heading(),
            KeyCode::Char('a') => self.toggle_advanced_layout(),
            _ => {}
        }
    }

    /// Focus the next copy control, wrapping around
    pub fn focus_next(&mut self) {
        let count = self.layout.controls.len();
        if count == 0 {
            self.show_toast("No code blocks");
            return;
        }
        let next = match self.focused {
            Some(index) => (index + 1) % count,
            None => self.first_visible_control().unwrap_or(0),
        };
        self.focus(next);
    }

    /// Focus the previous copy control, wrapping around
    pub fn focus_prev(&mut self) {
        let count = self.layout.controls.len();
        if count == 0 {
            self.show_toast("No code blocks");
            return;
        }
        let prev = match self.focused {
            Some(index) => (index + count - 1) % count,
            None => count - 1,
        };
        self.focus(prev);
    }

    fn focus(&mut self, index: usize) {
        self.focused = Some(index);
        if let Some(slot) = self.layout.controls.get(index) {
            self.scroll.reveal(slot.line);
        }
    }

    fn first_visible_control(&self) -> Option<usize> {
        let (start, end) = self.scroll.visible_range();
        self.layout
            .controls
            .iter()
            .position(|slot| slot.line >= start && slot.line < end)
    }

    /// Activate the focused copy control
    ///
    /// Without a focus, the first control on screen is focused and activated.
    pub fn copy_focused(&mut self) {
        if self.focused.is_none() {
            self.focused = self.first_visible_control();
        }
        match self.focused_control() {
            Some(slot) => slot.action.activate(),
            None => self.show_toast("Tab to select a code block"),
        }
    }

    /// Scroll to the next heading below the top of the viewport
    pub fn next_heading(&mut self) {
        let offset = self.scroll.offset();
        if let Some(anchor) = self.layout.anchors.iter().find(|a| a.line > offset) {
            let line = anchor.line;
            self.scroll.scroll_to(line);
        }
    }

    /// Scroll to the closest heading above the top of the viewport
    pub fn prev_heading(&mut self) {
        let offset = self.scroll.offset();
        if let Some(anchor) = self.layout.anchors.iter().rev().find(|a| a.line < offset) {
            let line = anchor.line;
            self.scroll.scroll_to(line);
        }
    }

    /// Flip advanced layout and render the document again
    pub fn toggle_advanced_layout(&mut self) {
        let advanced = !self.renderer.capabilities().supports_advanced_layout();
        self.renderer.set_capabilities(Capabilities {
            advanced_layout: advanced,
        });
        self.rerender();
        self.show_toast(if advanced {
            "Advanced layout on"
        } else {
            "Advanced layout off"
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::RecordingClipboard;
    use crate::document::parse;
    use std::sync::Arc;

    const DOC: &str = "# One\n\n```\nfirst\n```\n\n## Two\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n```\nsecond\n```\n";

    fn app_with(clipboard: Arc<RecordingClipboard>, capabilities: Capabilities) -> App {
        let renderer = BlockRenderer::new(capabilities, clipboard);
        let mut app = App::new(
            "test.md",
            parse(DOC),
            renderer,
            StyleTheme::default(),
            LogBuffer::new(),
        );
        app.resize(60, 4);
        app
    }

    fn app() -> App {
        app_with(Arc::new(RecordingClipboard::default()), Capabilities::ADVANCED)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = self::app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tab_cycles_code_blocks() {
        let mut app = app();
        assert_eq!(app.layout().controls.len(), 2);
        assert_eq!(app.focused(), None);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused(), Some(0));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused(), Some(1));
        // The second block is below the fold; focusing scrolls to it
        let line = app.focused_control().unwrap().line;
        let (start, end) = app.scroll.visible_range();
        assert!(line >= start && line < end);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused(), Some(0));
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused(), Some(1));
    }

    #[tokio::test]
    async fn test_copy_focused_block() {
        let clipboard = Arc::new(RecordingClipboard::default());
        let mut app = app_with(clipboard.clone(), Capabilities::ADVANCED);

        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Char('y'));

        assert_eq!(clipboard.copies(), vec!["second\n".to_string()]);
        assert!(app.focused_control().unwrap().action.is_copied());
    }

    #[tokio::test]
    async fn test_copy_without_focus_uses_visible_block() {
        let clipboard = Arc::new(RecordingClipboard::default());
        let mut app = app_with(clipboard.clone(), Capabilities::ADVANCED);

        press(&mut app, KeyCode::Enter);
        assert_eq!(clipboard.copies(), vec!["first\n".to_string()]);
        assert_eq!(app.focused(), Some(0));
    }

    #[test]
    fn test_heading_jumps() {
        let mut app = app();
        let two = app.layout().anchor_line("two").unwrap();

        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.scroll.offset(), two);

        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.scroll.offset(), 0);
    }

    #[test]
    fn test_toggle_advanced_layout_rerenders() {
        let mut app = app();
        let with_table = app.layout().lines.len();

        press(&mut app, KeyCode::Char('a'));
        assert!(!app.capabilities().supports_advanced_layout());
        app.resize(60, 4);
        assert!(app.layout().lines.len() < with_table);
        assert_eq!(app.toast.as_ref().unwrap().message, "Advanced layout off");

        press(&mut app, KeyCode::Char('a'));
        app.resize(60, 4);
        assert_eq!(app.layout().lines.len(), with_table);
    }

    #[test]
    fn test_pending_anchor_scrolls_after_layout() {
        let renderer = BlockRenderer::new(
            Capabilities::ADVANCED,
            Arc::new(RecordingClipboard::default()),
        );
        let mut app = App::new(
            "test.md",
            parse(DOC),
            renderer,
            StyleTheme::default(),
            LogBuffer::new(),
        )
        .with_anchor("two");
        app.resize(60, 4);

        assert_eq!(Some(app.scroll.offset()), app.layout().anchor_line("two"));
    }

    #[test]
    fn test_unknown_anchor_shows_toast() {
        let renderer = BlockRenderer::new(
            Capabilities::ADVANCED,
            Arc::new(RecordingClipboard::default()),
        );
        let mut app = App::new(
            "test.md",
            parse(DOC),
            renderer,
            StyleTheme::default(),
            LogBuffer::new(),
        )
        .with_anchor("nope");
        app.resize(60, 4);

        assert_eq!(app.scroll.offset(), 0);
        assert_eq!(app.toast.as_ref().unwrap().message, "No heading #nope");
    }
}
