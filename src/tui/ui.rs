use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::input_box::InputBox;
use crate::tui::components::message_list::MessageList;
use crate::tui::components::title_bar::TitleBar;

/// Draw one frame: title bar, conversation, input box.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(InputBox::height())]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar::new(
        app.resolver.name().to_string(),
        app.status_message.clone(),
        app.user_name.is_none(),
    );
    title_bar.render(frame, title_area);

    let mut message_list = MessageList::new(
        &mut tui.message_list,
        &app.conversation,
        app.is_typing,
        spinner_frame,
    );
    message_list.render(frame, main_area);

    tui.input_box.render(frame, input_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::core::action::{Action, update};
    use crate::test_support::{guest_app, test_app};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draw_ui_fresh_session() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = test_app();
        let mut tui = TuiState::new();

        terminal.draw(|f| draw_ui(f, &app, &mut tui, 0)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("TravelBud"));
        assert!(text.contains("Hi Ada!"));
        assert!(text.contains("Message"));
        assert!(!text.contains("Guest Mode"));
    }

    #[test]
    fn test_draw_ui_guest_session_shows_badge() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = guest_app();
        let mut tui = TuiState::new();

        terminal.draw(|f| draw_ui(f, &app, &mut tui, 0)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Guest Mode"));
        assert!(text.contains("Welcome to TravelBud!"));
    }

    #[test]
    fn test_draw_ui_pending_reply_disables_input() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = test_app();
        update(&mut app, Action::Submit("plan a tokyo trip".into()));

        let mut tui = TuiState::new();
        tui.input_box.disabled = app.is_typing;

        terminal.draw(|f| draw_ui(f, &app, &mut tui, 0)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("plan a tokyo trip"));
        assert!(text.contains("agents working"));
    }
}
