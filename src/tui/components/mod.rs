//! UI components for the TravelBud TUI.
//!
//! Each component follows the props/state split described in
//! [`crate::tui::component`]: transient widgets are rebuilt every frame from
//! application state, while persistent presentation state (scroll offsets,
//! input buffer) lives in the structs the event loop owns.

pub mod input_box;
pub mod message;
pub mod message_list;
pub mod title_bar;
pub mod typing_indicator;
