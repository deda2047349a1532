use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Padding, Paragraph, Widget};

/// Animated three-dot frames, advanced once per redraw tick.
const DOT_FRAMES: [&str; 4] = ["●∙∙∙", "∙●∙∙", "∙∙●∙", "∙∙∙●"];

/// A bubble shown below the last message while a reply is pending.
///
/// Transient component: created fresh each frame with the current animation
/// frame. Styled like an assistant bubble so the pending reply visually
/// "belongs" to the assistant before any content exists.
#[derive(Clone, Copy)]
pub struct TypingIndicator {
    pub spinner_frame: usize,
}

impl TypingIndicator {
    pub fn new(spinner_frame: usize) -> Self {
        Self { spinner_frame }
    }

    /// Fixed height: one dot row plus top and bottom borders.
    pub const fn height() -> u16 {
        3
    }
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = Style::default().fg(Color::Blue);
        let block = Block::bordered()
            .title("travelbud")
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(style.add_modifier(Modifier::DIM))
            .title_style(style)
            .padding(Padding::horizontal(1));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let dots = DOT_FRAMES[self.spinner_frame % DOT_FRAMES.len()];
        Paragraph::new(dots)
            .style(style.add_modifier(Modifier::DIM))
            .render(inner_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_cycle() {
        // Any frame index is valid; the animation wraps around.
        for frame in 0..10 {
            let dots = DOT_FRAMES[TypingIndicator::new(frame).spinner_frame % DOT_FRAMES.len()];
            assert!(!dots.is_empty());
        }
        assert_ne!(DOT_FRAMES[0], DOT_FRAMES[1]);
    }
}
