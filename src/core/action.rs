//! # Actions
//!
//! Everything that can happen in TravelBud becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! A resolver produces a reply? That's `Action::ReplyReceived(reply)`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing the I/O the adapter must perform.
//! No side effects here; I/O happens in the TUI layer.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: feed actions, assert on state and effects.

use log::debug;

use crate::core::state::App;
use crate::resolver::{AgentInfo, ChatMessage, Conversation, Reply};

/// Events fed into the reducer, from the UI or from background tasks.
#[derive(Debug)]
pub enum Action {
    /// The user submitted the input buffer (verbatim, untrimmed).
    Submit(String),
    /// A resolver produced one reply part.
    ReplyReceived(Reply),
    /// The active resolver finished sending replies.
    ResolutionDone,
    /// The active resolver failed; the payload is the conversation-visible text.
    ResolutionFailed(String),
    /// Stored history finished loading at startup.
    HistoryLoaded(Option<Vec<ChatMessage>>),
    /// Discard the conversation and start over.
    NewSession,
    Quit,
}

/// I/O the adapter must perform after a state transition.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// Spawn the resolver for this submitted text.
    SpawnResolution(String),
    /// Persist the full conversation.
    SaveHistory,
    /// Drop the persisted conversation.
    ClearHistory,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            // Rejected submissions are silent: no error surfaces, nothing changes.
            if text.trim().is_empty() {
                debug!("Ignoring empty submission");
                return Effect::None;
            }
            if app.is_typing {
                debug!("Ignoring submission while a reply is pending");
                return Effect::None;
            }
            // Content keeps the original whitespace; only the gate trims.
            app.conversation.push(ChatMessage::user(text.clone()));
            app.is_typing = true;
            app.status_message = String::from("Contacting agents...");
            Effect::SpawnResolution(text)
        }
        Action::ReplyReceived(reply) => {
            app.conversation.push(reply.into_message());
            Effect::SaveHistory
        }
        Action::ResolutionDone => {
            // The forwarder still reports done after a failure closed the
            // channel. That trailing done must not overwrite the failure
            // status, so it only completes a resolution that is still pending.
            if !app.is_typing {
                return Effect::None;
            }
            app.is_typing = false;
            app.status_message = String::from("Ready");
            Effect::SaveHistory
        }
        Action::ResolutionFailed(text) => {
            // Failures become ordinary conversation content; never retried.
            app.conversation
                .push(ChatMessage::agent(text, AgentInfo::new("System", "Error report")));
            app.is_typing = false;
            app.status_message = String::from("Agent unreachable");
            Effect::SaveHistory
        }
        Action::HistoryLoaded(history) => {
            match history {
                // A restored sequence fully replaces in-memory state. No second
                // welcome message is synthesized.
                Some(messages) if !messages.is_empty() => {
                    debug!("Restored {} message(s) from history", messages.len());
                    app.conversation = Conversation::from_history(messages);
                }
                // No (or empty) history: keep the welcome conversation.
                _ => debug!("No stored history; keeping welcome message"),
            }
            Effect::None
        }
        Action::NewSession => {
            app.conversation = Conversation::welcome(app.user_name.as_deref());
            app.is_typing = false;
            app.status_message = String::from("New session");
            Effect::ClearHistory
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Sender;
    use crate::test_support::{guest_app, test_app};

    #[test]
    fn test_submit_appends_verbatim_user_message() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("  keep my spaces  ".into()));

        assert_eq!(effect, Effect::SpawnResolution("  keep my spaces  ".into()));
        assert_eq!(app.conversation.len(), 2);
        let last = app.conversation.messages.last().unwrap();
        assert_eq!(last.sender, Sender::User);
        // Verbatim content: internal and surrounding whitespace preserved.
        assert_eq!(last.content, "  keep my spaces  ");
        assert!(app.is_typing);
    }

    #[test]
    fn test_submit_whitespace_only_is_dropped_silently() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("   \t  ".into()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.conversation.len(), 1);
        assert!(!app.is_typing);
    }

    #[test]
    fn test_submit_while_pending_does_not_change_sequence_length() {
        let mut app = test_app();
        update(&mut app, Action::Submit("first".into()));
        let len_before = app.conversation.len();

        let effect = update(&mut app, Action::Submit("second".into()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.conversation.len(), len_before);
    }

    #[test]
    fn test_reply_received_appends_and_persists() {
        let mut app = test_app();
        update(&mut app, Action::Submit("tokyo trip".into()));

        let reply = Reply::assistant("Connecting...", AgentInfo::new("Coordinator", "Discovering agents"));
        let effect = update(&mut app, Action::ReplyReceived(reply));

        assert_eq!(effect, Effect::SaveHistory);
        let last = app.conversation.messages.last().unwrap();
        assert_eq!(last.sender, Sender::Assistant);
        assert_eq!(
            last.agent_info.as_ref().unwrap().agent_type,
            "Coordinator"
        );
        // Still typing until ResolutionDone.
        assert!(app.is_typing);
    }

    #[test]
    fn test_resolution_done_clears_pending() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hi".into()));
        let effect = update(&mut app, Action::ResolutionDone);
        assert_eq!(effect, Effect::SaveHistory);
        assert!(!app.is_typing);
    }

    #[test]
    fn test_done_after_failure_keeps_failure_status() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hi".into()));
        update(
            &mut app,
            Action::ResolutionFailed("Connection error: unable to reach the agent.".into()),
        );
        let len_after_failure = app.conversation.len();

        // The forwarder's trailing done arrives after the failure.
        let effect = update(&mut app, Action::ResolutionDone);

        assert_eq!(effect, Effect::None);
        assert_eq!(app.status_message, "Agent unreachable");
        assert_eq!(app.conversation.len(), len_after_failure);
        assert!(!app.is_typing);
    }

    #[test]
    fn test_resolution_failure_becomes_system_message() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hi".into()));

        let effect = update(
            &mut app,
            Action::ResolutionFailed("Connection error: unable to reach the agent.".into()),
        );

        assert_eq!(effect, Effect::SaveHistory);
        assert!(!app.is_typing);
        let last = app.conversation.messages.last().unwrap();
        assert_eq!(last.sender, Sender::Agent);
        assert_eq!(last.agent_info.as_ref().unwrap().agent_type, "System");
        assert!(last.content.starts_with("Connection error:"));
    }

    #[test]
    fn test_history_loaded_replaces_welcome() {
        let mut app = guest_app();
        let stored = vec![
            ChatMessage::assistant("welcome back"),
            ChatMessage::user("earlier question"),
        ];
        update(&mut app, Action::HistoryLoaded(Some(stored)));

        // Restored as-is: no extra welcome message is synthesized.
        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.conversation.messages[1].content, "earlier question");
    }

    #[test]
    fn test_history_loaded_empty_keeps_welcome() {
        let mut app = guest_app();
        update(&mut app, Action::HistoryLoaded(None));
        assert_eq!(app.conversation.len(), 1);
        assert_eq!(app.conversation.messages[0].sender, Sender::Assistant);

        update(&mut app, Action::HistoryLoaded(Some(Vec::new())));
        assert_eq!(app.conversation.len(), 1);
    }

    #[test]
    fn test_new_session_resets_to_welcome_and_clears_store() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hello".into()));
        update(&mut app, Action::ResolutionDone);

        let effect = update(&mut app, Action::NewSession);
        assert_eq!(effect, Effect::ClearHistory);
        assert_eq!(app.conversation.len(), 1);
        assert!(app.conversation.messages[0].content.starts_with("Hi Ada!"));
        assert!(!app.is_typing);
    }

    #[test]
    fn test_quit_produces_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
