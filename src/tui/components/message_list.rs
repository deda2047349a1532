//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Display the message sequence in arrival order, oldest at the top
//! - Manage scrolling (auto-scroll pinned to bottom, manual unpinning)
//! - Perform efficient layout caching (bubble heights)
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and `&Conversation` (props).
//!
//! Since `Component::render` takes `&mut self`, we can safely mutate the state
//! (including layout cache and scroll state) during the render pass, aligning
//! with Ratatui's `StatefulWidget` pattern.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::resolver::Conversation;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageBubble;
use crate::tui::components::typing_indicator::TypingIndicator;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    /// Prevents overscrolling past the last message.
    pub fn clamp_scroll(&mut self) {
        let max_y = self
            .layout
            .total_height()
            .saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    /// Called on scroll-down events so that scrolling past the end re-pins to bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self
            .layout
            .total_height()
            .saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    // Mutable reference to persistent state
    pub state: &'a mut MessageListState,
    pub conversation: &'a Conversation,
    /// When true, an animated typing bubble is appended below the last message.
    pub is_typing: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        conversation: &'a Conversation,
        is_typing: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            conversation,
            is_typing,
            spinner_frame,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let messages = &self.conversation.messages;

        // 1. Update layout cache. Messages are append-only and immutable once
        // pushed, so cached heights stay valid until the width changes or the
        // conversation is reset.
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(messages.len(), content_width);
        layout.heights.truncate(reusable);

        for message in messages.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(MessageBubble::calculate_height(message, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(messages.len(), content_width);

        let messages_height = self.state.layout.total_height();
        let indicator_height = if self.is_typing {
            TypingIndicator::height()
        } else {
            0
        };
        let canvas_height = messages_height.saturating_add(indicator_height);

        // 2. Clamp scroll offset to prevent overscrolling past content.
        // Skip when auto-scrolling: scroll_to_bottom targets canvas_height,
        // which includes the typing indicator.
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible bubbles into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let bubble_rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(MessageBubble::new(&messages[i]), bubble_rect);
            y_offset = y_offset.saturating_add(height);
        }

        // Typing bubble sits below the last message, inside the canvas, so
        // auto-scroll keeps it in view.
        if self.is_typing {
            let indicator_rect =
                Rect::new(0, messages_height, content_width, indicator_height);
            scroll_view.render_widget(TypingIndicator::new(self.spinner_frame), indicator_rect);
        }

        // Auto-scroll logic (mutation)
        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because event handling requires persistent state (scroll position,
/// stick_to_bottom flag) while `MessageList` is recreated each frame.
impl EventHandler for MessageListState {
    type Event = (); // MessageList currently emits no events (scroll handled internally)

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            _ => None,
        }
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
        }
    }

    /// How many cached heights are still valid.
    ///
    /// Messages never mutate after being appended, so the only invalidating
    /// events are a width change and a conversation reset (fewer messages
    /// than cached).
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        if message_count < self.message_count {
            return 0;
        }
        self.heights.len()
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16) {
        self.message_count = message_count;
        self.content_width = content_width;
    }

    /// Total canvas height across all cached bubbles.
    ///
    /// Saturates at `u16::MAX` rows. A long session can exceed that, and a
    /// wrapped sum would otherwise shrink the canvas and break scroll
    /// clamping; saturation just caps how far back the view can scroll.
    pub fn total_height(&self) -> u16 {
        self.heights
            .iter()
            .fold(0u16, |acc, &h| acc.saturating_add(h))
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_cache_reusable() {
        let mut cache = LayoutCache::new();
        cache.update_metadata(5, 80);
        cache.heights = vec![4; 5]; // Simulating 5 bubbles of height 4

        // Same everything -> all reusable
        assert_eq!(cache.reusable_count(5, 80), 5);

        // New message appended -> existing heights still valid
        assert_eq!(cache.reusable_count(6, 80), 5);

        // Width changed -> nothing reusable
        assert_eq!(cache.reusable_count(5, 40), 0);

        // Conversation reset (fewer messages than cached) -> nothing reusable
        assert_eq!(cache.reusable_count(1, 80), 0);
    }

    #[test]
    fn test_prefix_heights_accumulate() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![4, 6, 5];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.prefix_heights, vec![4, 10, 15]);
    }

    #[test]
    fn test_visible_range_spans_viewport() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![10; 10]; // 100 rows of content
        cache.rebuild_prefix_heights();

        // Viewport at the top sees the first few bubbles (plus overscan)
        let range = cache.visible_range(0, 20);
        assert_eq!(range.start, 0);
        assert!(range.end >= 2);
        assert!(range.end <= cache.heights.len());

        // Scrolled to the middle: the first bubbles drop out of range
        let range = cache.visible_range(50, 20);
        assert!(range.start > 0);
        assert!(range.contains(&5));
    }

    #[test]
    fn test_total_height_saturates_instead_of_wrapping() {
        let mut cache = LayoutCache::new();
        // Three bubbles whose true total exceeds u16::MAX
        cache.heights = vec![u16::MAX / 2; 3];
        cache.rebuild_prefix_heights();

        assert_eq!(cache.total_height(), u16::MAX);

        // Prefix sums clamp too, staying monotonic non-decreasing
        assert_eq!(
            cache.prefix_heights,
            vec![u16::MAX / 2, u16::MAX - 1, u16::MAX]
        );

        // A saturated canvas still clamps scrolling sanely
        let mut state = MessageListState::new();
        state.layout = cache;
        state.viewport_height = 20;
        state.scroll_state.set_offset(Position {
            x: 0,
            y: u16::MAX,
        });
        state.clamp_scroll();
        assert_eq!(state.scroll_state.offset().y, u16::MAX - 20);
    }

    #[test]
    fn test_repin_engages_at_bottom() {
        let mut state = MessageListState::new();
        state.layout.heights = vec![10; 4];
        state.viewport_height = 20;
        state.stick_to_bottom = false;

        // Scrolled to the very bottom (40 - 20 = 20)
        state.scroll_state.set_offset(Position { x: 0, y: 20 });
        state.repin_if_at_bottom();
        assert!(state.stick_to_bottom);

        // Scrolled partway up: stays unpinned
        state.stick_to_bottom = false;
        state.scroll_state.set_offset(Position { x: 0, y: 5 });
        state.repin_if_at_bottom();
        assert!(!state.stick_to_bottom);
    }
}
