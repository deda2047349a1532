//! # Application State
//!
//! Core business state for TravelBud. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── resolver: Arc<dyn ReplyResolver>  // reply strategy (local rules or gateway)
//! ├── conversation: Conversation        // append-only message sequence
//! ├── status_message: String            // status bar text
//! ├── user_name: Option<String>         // None = guest session
//! └── is_typing: bool                   // a reply is pending; gates submissions
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::resolver::{Conversation, ReplyResolver};

pub struct App {
    pub resolver: Arc<dyn ReplyResolver>,
    pub conversation: Conversation,
    pub status_message: String,
    pub user_name: Option<String>,
    /// Exactly one pending-response flag per session. While true, submissions
    /// are dropped silently and the typing indicator is shown.
    pub is_typing: bool,
}

impl App {
    pub fn new(resolver: Arc<dyn ReplyResolver>, user_name: Option<String>) -> Self {
        let conversation = Conversation::welcome(user_name.as_deref());
        Self {
            resolver,
            conversation,
            status_message: String::from("Welcome to TravelBud!"),
            user_name,
            is_typing: false,
        }
    }

    pub fn from_config(resolver: Arc<dyn ReplyResolver>, config: &ResolvedConfig) -> Self {
        Self::new(resolver, config.user_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::resolver::Sender;
    use crate::test_support::{guest_app, test_app};

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Welcome to TravelBud!");
        assert!(!app.is_typing);
        assert_eq!(app.user_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_fresh_session_has_single_assistant_welcome() {
        let app = guest_app();
        assert_eq!(app.conversation.len(), 1);
        assert_eq!(app.conversation.messages[0].sender, Sender::Assistant);
    }
}
