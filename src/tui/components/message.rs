use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::resolver::{ChatMessage, Sender};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// One extra row below the content for the timestamp.
const TIMESTAMP_ROWS: u16 = 1;

/// A stateless component that renders a single chat message bubble.
///
/// # Design
///
/// `MessageBubble` is a **transient component**: it's created fresh each frame
/// with the data it needs to render. Styling depends solely on the message's
/// sender, so two messages with the same sender always look the same.
///
/// # Styling
///
/// - **User** (cyan, right-aligned title): messages from the human
/// - **Assistant** (blue): the built-in travel assistant
/// - **Agent** (magenta): replies attributed to a named backend agent
///
/// Messages carrying an `AgentInfo` badge show it in the title, e.g.
/// `Finance Agent · Budget monitoring`, regardless of sender. Each bubble
/// ends with a dimmed wall-clock timestamp row.
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts rendered height using
/// `textwrap` with options that match Ratatui's `Paragraph` wrapping behavior.
/// This lets the parent `MessageList` compute scroll positions without
/// actually rendering each bubble.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    /// The message content and metadata to render
    pub message: &'a ChatMessage,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a ChatMessage) -> Self {
        Self { message }
    }

    /// Calculate the height required for this message given a width.
    ///
    /// The wrapping options must match the Ratatui default for `Paragraph`
    /// to ensure 1:1 mapping between calculated and actual height.
    pub fn calculate_height(message: &ChatMessage, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            // Return 1 row so the message still occupies space in the layout.
            return 1;
        }

        let content = message.content.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD + TIMESTAMP_ROWS;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        (lines.len() as u16).max(1) + TIMESTAMP_ROWS + VERTICAL_OVERHEAD
    }

    fn title(&self) -> String {
        match &self.message.agent_info {
            Some(info) => format!("{} · {}", info.agent_type, info.action),
            None => match self.message.sender {
                Sender::User => "you".to_string(),
                Sender::Assistant => "travelbud".to_string(),
                Sender::Agent => "agent".to_string(),
            },
        }
    }
}

// Implement Widget for easy usage in ScrollView
impl<'a> Widget for MessageBubble<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = match self.message.sender {
            Sender::User => Style::default().fg(Color::Cyan),
            Sender::Assistant => Style::default().fg(Color::Blue),
            Sender::Agent => Style::default().fg(Color::Magenta),
        };
        let border_style = style.add_modifier(Modifier::DIM);

        // User bubbles carry their title on the right, mirroring the
        // left-titled assistant and agent bubbles.
        let title_alignment = match self.message.sender {
            Sender::User => Alignment::Right,
            _ => Alignment::Left,
        };

        let block = Block::bordered()
            .title(self.title())
            .title_alignment(title_alignment)
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let paragraph = Paragraph::new(self.message.content.trim())
            .style(style)
            .wrap(Wrap { trim: true });
        paragraph.render(inner_area, buf);

        // Timestamp row at the bottom of the inner area, dimmed.
        if inner_area.height > 0 {
            let stamp_area = Rect::new(
                inner_area.x,
                inner_area.y + inner_area.height - 1,
                inner_area.width,
                1,
            );
            let stamp = Paragraph::new(self.message.clock_label())
                .style(style.add_modifier(Modifier::DIM))
                .alignment(Alignment::Right);
            stamp.render(stamp_area, buf);
        }
    }
}

/// Component trait implementation.
///
/// Note: `MessageBubble` is stateless, so the `&mut self` required by the
/// trait is a no-op. Rendering is delegated to the [`Widget`] implementation.
impl<'a> Component for MessageBubble<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
