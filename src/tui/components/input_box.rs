//! # InputBox Component
//!
//! Single-line text entry for the conversation.
//!
//! ## Responsibilities
//!
//! - Capture text input (typed characters and bracketed paste)
//! - Handle editing (backspace, delete, cursor movement)
//! - Handle submission (Enter), gated while a reply is pending
//!
//! The buffer is internal state; the `disabled` flag is a prop from the
//! application state. While disabled, editing still works but Enter is
//! swallowed, matching the pending-reply submission gate in the reducer.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Borders: 1 top + 1 bottom.
const VERTICAL_OVERHEAD: u16 = 2;
/// Borders: 1 left + 1 right.
const HORIZONTAL_OVERHEAD: u16 = 2;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed with a non-blank buffer)
    Submit(String),
    /// Text content changed (optional, if parent needs to know)
    ContentChanged,
}

/// Text input component.
///
/// # Props
///
/// - `disabled`: a reply is pending; submission is gated
///
/// # State
///
/// - `buffer`: current text being typed
/// - `cursor_pos`: byte offset of the cursor within `buffer`
pub struct InputBox {
    pub buffer: String,
    pub disabled: bool,
    cursor_pos: usize,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            cursor_pos: 0,
        }
    }

    /// Fixed height: one text row plus borders.
    pub const fn height() -> u16 {
        1 + VERTICAL_OVERHEAD
    }

    fn prev_char_boundary(&self) -> usize {
        self.buffer[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_char_boundary(&self) -> usize {
        self.buffer[self.cursor_pos..]
            .chars()
            .next()
            .map(|c| self.cursor_pos + c.len_utf8())
            .unwrap_or(self.cursor_pos)
    }

    /// The slice of the buffer that fits in the given inner width, keeping the
    /// cursor visible. Scrolls horizontally by dropping leading characters.
    fn visible_text(&self, inner_width: u16) -> (&str, u16) {
        let width = inner_width as usize;
        if width == 0 {
            return ("", 0);
        }

        let mut start = 0;
        let mut cursor_col = self.buffer[..self.cursor_pos].width();
        while cursor_col >= width {
            let skipped = self.buffer[start..]
                .chars()
                .next()
                .map(|c| c.len_utf8())
                .unwrap_or(0);
            if skipped == 0 {
                break;
            }
            start += skipped;
            cursor_col = self.buffer[start..self.cursor_pos].width();
        }

        (&self.buffer[start..], cursor_col as u16)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        let (visible, cursor_col) = self.visible_text(inner_width);

        let title = if self.disabled {
            "Message (agents working...)"
        } else {
            "Message"
        };
        let style = if self.disabled {
            Style::default().fg(Color::Green).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::Green)
        };

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .title(title);
        let input = Paragraph::new(visible).block(block).style(style);

        frame.render_widget(input, area);
        frame.set_cursor_position((area.x + 1 + cursor_col, area.y + 1));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor_pos, *c);
                self.cursor_pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(self.cursor_pos, text);
                self.cursor_pos += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor_pos > 0 {
                    let prev = self.prev_char_boundary();
                    self.buffer.drain(prev..self.cursor_pos);
                    self.cursor_pos = prev;
                    return Some(InputEvent::ContentChanged);
                }
                None
            }
            TuiEvent::Delete => {
                if self.cursor_pos < self.buffer.len() {
                    let next = self.next_char_boundary();
                    self.buffer.drain(self.cursor_pos..next);
                    return Some(InputEvent::ContentChanged);
                }
                None
            }
            TuiEvent::CursorLeft => {
                if self.cursor_pos > 0 {
                    self.cursor_pos = self.prev_char_boundary();
                }
                None
            }
            TuiEvent::CursorRight => {
                if self.cursor_pos < self.buffer.len() {
                    self.cursor_pos = self.next_char_boundary();
                }
                None
            }
            TuiEvent::CursorHome => {
                self.cursor_pos = 0;
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor_pos = self.buffer.len();
                None
            }
            TuiEvent::Submit => {
                // Blank submissions and submissions while a reply is pending
                // are swallowed without clearing the buffer.
                if self.disabled || self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor_pos = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
