use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::types::{AgentInfo, ChatMessage, Sender};

/// Errors that can occur while resolving a reply.
/// Every variant is terminal for its submission — nothing is retried.
#[derive(Debug)]
pub enum ResolverError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The gateway answered with a non-2xx HTTP status.
    Http { status: u16 },
    /// The gateway answered 2xx but the body signalled a failure
    /// (non-200 status field or missing content).
    Agent(String),
    /// The gateway body could not be parsed.
    Parse(String),
    /// The mpsc channel was closed (the session dropped the receiver).
    ChannelClosed,
}

impl ResolverError {
    /// The text shown in the conversation in place of a normal reply.
    /// Failures never surface as anything but ordinary chat content.
    pub fn user_message(&self) -> String {
        match self {
            ResolverError::Agent(msg) => format!("Error: {msg}"),
            _ => String::from(
                "Connection error: unable to reach the agent. \
                 Please check your connection and try again.",
            ),
        }
    }
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverError::Network(msg) => write!(f, "network error: {msg}"),
            ResolverError::Http { status } => write!(f, "gateway error (HTTP {status})"),
            ResolverError::Agent(msg) => write!(f, "agent error: {msg}"),
            ResolverError::Parse(msg) => write!(f, "parse error: {msg}"),
            ResolverError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for ResolverError {}

/// One reply produced by a resolver, before it becomes a [`ChatMessage`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub sender: Sender,
    pub content: String,
    pub agent_info: AgentInfo,
}

impl Reply {
    /// A reply spoken by the assistant itself (local rule output).
    pub fn assistant(content: impl Into<String>, agent_info: AgentInfo) -> Self {
        Self {
            sender: Sender::Assistant,
            content: content.into(),
            agent_info,
        }
    }

    /// A reply relayed from a named remote agent.
    pub fn agent(content: impl Into<String>, agent_info: AgentInfo) -> Self {
        Self {
            sender: Sender::Agent,
            content: content.into(),
            agent_info,
        }
    }

    pub fn into_message(self) -> ChatMessage {
        ChatMessage::compose(self.sender, self.content, Some(self.agent_info))
    }
}

/// Strategy mapping a submitted user text to one or more replies.
///
/// Replies are sent over the channel in the order they should appear; the
/// resolver returns once the last one is sent. A multi-part resolver may
/// sleep between sends to stagger their arrival.
#[async_trait]
pub trait ReplyResolver: Send + Sync {
    /// Returns the name of the resolver strategy.
    fn name(&self) -> &str;

    /// Resolve `text` into replies, sending each to `sender` in order.
    async fn resolve(&self, text: &str, sender: mpsc::Sender<Reply>) -> Result<(), ResolverError>;
}
