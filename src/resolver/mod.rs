//! # Reply Resolution
//!
//! The strategy layer that turns a submitted user text into one or more
//! assistant/agent replies. Two interchangeable strategies exist behind the
//! [`ReplyResolver`] trait:
//!
//! - [`LocalRulesResolver`]: offline keyword rules with staggered multi-part
//!   replies and a seedable random fallback.
//! - [`GatewayResolver`]: one HTTP round trip to a local agent gateway.
//!
//! Both communicate results the same way — replies over an mpsc channel,
//! failures as [`ResolverError`] — so the session container never knows
//! which strategy is active.

pub mod gateway;
pub mod resolver;
pub mod rules;
pub mod types;

pub use gateway::{DEFAULT_GATEWAY_BASE_URL, GatewayResolver};
pub use resolver::{Reply, ReplyResolver, ResolverError};
pub use rules::LocalRulesResolver;
pub use types::{AgentInfo, ChatMessage, Conversation, Sender};
