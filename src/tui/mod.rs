//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//! The intention is to swap this out for a different adapter (web, etc.)
//! in the future if needed.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (reply pending): draws every ~80ms so the typing
//!   indicator stays smooth.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous
//! redraws.

pub mod component;
pub mod components;
pub mod event;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::session::{self, FileHistoryStore, HistoryStore, MemoryHistoryStore};
use crate::core::state::App;
use crate::resolver::{GatewayResolver, LocalRulesResolver, Reply, ReplyResolver};
use crate::tui::component::EventHandler;
use crate::tui::components::input_box::{InputBox, InputEvent};
use crate::tui::components::message_list::MessageListState;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste, Hide);
    }
}

/// Build a resolver from a resolved config's resolver name.
pub fn build_resolver(config: &ResolvedConfig) -> Arc<dyn ReplyResolver> {
    match config.resolver.as_str() {
        "gateway" => Arc::new(GatewayResolver::new(config.gateway_base_url.clone())),
        // Default to the offline keyword rules
        _ => Arc::new(LocalRulesResolver::new()),
    }
}

/// Open the canonical history store, falling back to an in-memory store when
/// the data directory is unavailable (history then lasts for this run only).
fn open_history_store() -> Box<dyn HistoryStore> {
    match FileHistoryStore::open_default() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!("Chat history unavailable, running without persistence: {}", e);
            Box::new(MemoryHistoryStore::new())
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let resolver = build_resolver(&config);
    let mut app = App::from_config(resolver, &config);
    let mut tui = TuiState::new();

    let store = open_history_store();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background resolver tasks
    let (tx, rx) = mpsc::channel();

    // Abort handles for the in-flight resolution (aborted on reset and quit)
    let mut active_abort_handles: Vec<tokio::task::AbortHandle> = Vec::new();

    // Restore the previous conversation before the first frame
    match store.load() {
        Ok(history) => {
            update(&mut app, Action::HistoryLoaded(history));
        }
        Err(e) => warn!("Failed to load chat history: {}", e),
    }

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame
    let mut should_quit = false;

    loop {
        // Sync InputBox props with App state
        tui.input_box.disabled = app.is_typing;

        // The typing indicator is the only animation
        let animating = app.is_typing;
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            let spinner_frame = (elapsed * 4.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating, long when idle
        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        if first_event.is_some() {
            needs_redraw = true;
        }
        for tui_event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match tui_event {
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => {}
                TuiEvent::ForceQuit => {
                    let effect = update(&mut app, Action::Quit);
                    handle_effect(
                        effect,
                        &app,
                        store.as_ref(),
                        &tx,
                        &mut active_abort_handles,
                        &mut should_quit,
                    );
                }
                TuiEvent::NewSession => {
                    let effect = reset_session(&mut app, &rx, &mut active_abort_handles);
                    handle_effect(
                        effect,
                        &app,
                        store.as_ref(),
                        &tx,
                        &mut active_abort_handles,
                        &mut should_quit,
                    );
                    tui.message_list = MessageListState::new();
                }
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.message_list.handle_event(&tui_event);
                }
                _ => {
                    if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&tui_event)
                    {
                        let effect = update(&mut app, Action::Submit(text));
                        handle_effect(
                            effect,
                            &app,
                            store.as_ref(),
                            &tx,
                            &mut active_abort_handles,
                            &mut should_quit,
                        );
                        // New content below: keep the view pinned
                        tui.message_list.stick_to_bottom = true;
                    }
                }
            }
        }

        // Handle background task actions (resolver replies)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            // Every appended reply re-pins the view to the newest message
            if matches!(action, Action::ReplyReceived(_) | Action::ResolutionFailed(_)) {
                tui.message_list.stick_to_bottom = true;
            }
            let effect = update(&mut app, action);
            handle_effect(
                effect,
                &app,
                store.as_ref(),
                &tx,
                &mut active_abort_handles,
                &mut should_quit,
            );
        }

        if should_quit {
            break;
        }
    }

    // Save on exit and stop any in-flight resolution
    for handle in active_abort_handles.drain(..) {
        handle.abort();
    }
    session::save_conversation(store.as_ref(), &app.conversation.messages);

    ratatui::restore();
    Ok(())
}

/// Tear down the active resolution and reset to a fresh welcome session.
///
/// Aborting the tasks is not enough: the forwarder may already have queued
/// actions on the channel before the abort landed, and a drained-later reply
/// from the old session would otherwise be appended to (and saved with) the
/// new one. The receiver is flushed before the reset so nothing produced for
/// the old conversation survives it.
fn reset_session(
    app: &mut App,
    rx: &mpsc::Receiver<Action>,
    active_abort_handles: &mut Vec<tokio::task::AbortHandle>,
) -> Effect {
    for handle in active_abort_handles.drain(..) {
        handle.abort();
    }
    while rx.try_recv().is_ok() {}
    update(app, Action::NewSession)
}

/// Perform the I/O an `update()` transition asked for.
fn handle_effect(
    effect: Effect,
    app: &App,
    store: &dyn HistoryStore,
    tx: &mpsc::Sender<Action>,
    active_abort_handles: &mut Vec<tokio::task::AbortHandle>,
    should_quit: &mut bool,
) {
    match effect {
        Effect::None => {}
        Effect::SpawnResolution(text) => {
            *active_abort_handles = spawn_resolution(app, text, tx.clone());
        }
        Effect::SaveHistory => {
            session::save_conversation(store, &app.conversation.messages);
        }
        Effect::ClearHistory => {
            if let Err(e) = store.clear() {
                warn!("Failed to clear chat history: {}", e);
            }
        }
        Effect::Quit => *should_quit = true,
    }
}

/// Run the resolver for one submission in the background.
///
/// Two tasks: the resolver itself, and a forwarder that turns its replies
/// into actions. When the reply channel closes, the forwarder reports
/// `ResolutionDone`. Both abort handles are returned so a session reset or
/// quit can cancel the resolution mid-flight.
fn spawn_resolution(
    app: &App,
    text: String,
    tx: mpsc::Sender<Action>,
) -> Vec<tokio::task::AbortHandle> {
    info!("Spawning resolution via '{}'", app.resolver.name());

    let resolver = app.resolver.clone();
    let (reply_tx, mut reply_rx) = tokio::sync::mpsc::channel::<Reply>(16);

    let tx_err = tx.clone();
    let resolve_handle = tokio::spawn(async move {
        if let Err(e) = resolver.resolve(&text, reply_tx).await {
            info!("Resolution failed: {}", e);
            if tx_err.send(Action::ResolutionFailed(e.user_message())).is_err() {
                warn!("Failed to send resolution error: receiver dropped");
            }
        }
    });

    let forward_handle = tokio::spawn(async move {
        let mut forwarded_count = 0usize;
        while let Some(reply) = reply_rx.recv().await {
            forwarded_count += 1;
            if tx.send(Action::ReplyReceived(reply)).is_err() {
                warn!("Failed to forward reply: receiver dropped");
                return;
            }
        }
        debug!("Reply channel closed after {} repl(ies)", forwarded_count);
        if tx.send(Action::ResolutionDone).is_err() {
            warn!("Failed to send ResolutionDone: receiver dropped");
        }
    });

    vec![resolve_handle.abort_handle(), forward_handle.abort_handle()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::AgentInfo;
    use crate::test_support::test_app;

    #[test]
    fn test_reset_discards_replies_queued_before_the_reset() {
        let mut app = test_app();
        update(&mut app, Action::Submit("plan a tokyo trip".into()));

        // A reply for the old session is already on the channel when the
        // user resets; it must not reach the fresh conversation.
        let (tx, rx) = mpsc::channel();
        tx.send(Action::ReplyReceived(Reply::assistant(
            "Connecting to travel agents...",
            AgentInfo::new("Coordinator", "Discovering agents"),
        )))
        .unwrap();

        let mut handles = Vec::new();
        let effect = reset_session(&mut app, &rx, &mut handles);

        assert_eq!(effect, Effect::ClearHistory);
        assert_eq!(app.conversation.len(), 1);
        assert!(app.conversation.messages[0].content.starts_with("Hi Ada!"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_reset_aborts_in_flight_resolution_tasks() {
        let mut app = test_app();
        let (_tx, rx) = mpsc::channel::<Action>();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let task = runtime
            .spawn(async { tokio::time::sleep(std::time::Duration::from_secs(60)).await });
        let mut handles = vec![task.abort_handle()];

        reset_session(&mut app, &rx, &mut handles);

        assert!(handles.is_empty());
        runtime.block_on(async {
            assert!(task.await.unwrap_err().is_cancelled());
        });
    }
}
