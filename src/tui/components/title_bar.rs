//! # TitleBar Component
//!
//! Top status bar showing application state.
//!
//! ## Responsibilities
//!
//! - Display the active resolver (local rules or gateway)
//! - Display status messages (e.g., "Contacting agents...")
//! - Show a "Guest Mode" badge when no user name is configured
//!
//! TitleBar is purely presentational: it receives all data as props and has no
//! internal state, which makes it trivial to test. Props live in struct fields
//! (rather than render() parameters) so the fixed `Component::render` signature
//! works for it like any other component.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::tui::component::Component;

/// Top status bar component.
///
/// # Props
///
/// - `resolver_name`: The active reply strategy (e.g., "local-rules")
/// - `status_message`: Transient status (e.g., "Contacting agents...")
/// - `is_guest`: Whether the session runs without a configured user name
pub struct TitleBar {
    pub resolver_name: String,
    pub status_message: String,
    pub is_guest: bool,
}

impl TitleBar {
    pub fn new(resolver_name: String, status_message: String, is_guest: bool) -> Self {
        Self {
            resolver_name,
            status_message,
            is_guest,
        }
    }
}

impl Component for TitleBar {
    /// Render the title bar as a single line.
    ///
    /// Always height 1; a plain Span rather than a Block since there is no
    /// room or need for borders.
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut title_text = format!("TravelBud (resolver: {})", self.resolver_name);
        if !self.status_message.is_empty() {
            title_text.push_str(" | ");
            title_text.push_str(&self.status_message);
        }
        if self.is_guest {
            title_text.push_str(" | Guest Mode");
        }

        frame.render_widget(Span::raw(title_text), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_text(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_shows_resolver_and_status() {
        let mut title_bar = TitleBar::new(
            "local-rules".to_string(),
            "Contacting agents...".to_string(),
            false,
        );
        let text = render_to_text(&mut title_bar);

        assert!(text.contains("TravelBud"));
        assert!(text.contains("local-rules"));
        assert!(text.contains("Contacting agents..."));
        assert!(!text.contains("Guest Mode"));
    }

    #[test]
    fn test_title_bar_guest_badge() {
        let mut title_bar = TitleBar::new("gateway".to_string(), String::new(), true);
        let text = render_to_text(&mut title_bar);

        assert!(text.contains("Guest Mode"));
        // No status: the resolver and the badge are the only segments
        assert!(!text.contains("| |"));
    }
}
