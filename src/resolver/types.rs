use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
    /// A specialist agent speaking through the assistant (gateway replies,
    /// multi-agent progress reports, synthetic error reports).
    #[serde(rename = "agent")]
    Agent,
}

/// Badge metadata shown above an assistant/agent message body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentInfo {
    pub agent_type: String,
    pub action: String,
}

impl AgentInfo {
    pub fn new(agent_type: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            action: action.into(),
        }
    }
}

/// One turn in a conversation.
///
/// Content is verbatim display text: emphasis markers and emoji inside it are
/// rendered as-is, never parsed as markup. The timestamp is display-only
/// (local hour:minute); ordering is always append order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_info: Option<AgentInfo>,
}

impl ChatMessage {
    pub(crate) fn compose(
        sender: Sender,
        content: String,
        agent_info: Option<AgentInfo>,
    ) -> Self {
        Self {
            // Random ids: the original scheme derived ids from a millisecond
            // clock and collided when several replies landed in one tick.
            id: uuid::Uuid::new_v4().to_string(),
            content,
            sender,
            timestamp: Utc::now(),
            agent_info,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::compose(Sender::User, content.into(), None)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::compose(Sender::Assistant, content.into(), None)
    }

    pub fn agent(content: impl Into<String>, info: AgentInfo) -> Self {
        Self::compose(Sender::Agent, content.into(), Some(info))
    }

    /// Local hour:minute, the only way timestamps are surfaced.
    pub fn clock_label(&self) -> String {
        self.timestamp
            .with_timezone(&chrono::Local)
            .format("%H:%M")
            .to_string()
    }
}

/// The ordered, append-only message sequence of one chat session.
///
/// Messages are never mutated or removed individually; the only wholesale
/// change is replacement by a loaded history or a new-session reset.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    /// A fresh session: exactly one synthesized assistant welcome, personalized
    /// when a user name is known.
    pub fn welcome(user_name: Option<&str>) -> Self {
        let content = match user_name {
            Some(name) => format!(
                "Hi {name}! I'm your AI travel assistant. I can help you plan trips, \
                 find the best deals, and manage your budget. \
                 Try asking me: \"Plan a 4-day Tokyo trip under $1200\""
            ),
            None => String::from(
                "Welcome to TravelBud! I'm your AI travel assistant. I can help you \
                 with general travel suggestions and planning ideas. \
                 Try asking me: \"What are the best places to visit in Japan?\"",
            ),
        };
        Self {
            messages: vec![ChatMessage::assistant(content)],
        }
    }

    /// Restore from a persisted history, replacing any in-memory state.
    pub fn from_history(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    pub fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        self.messages.last().expect("just pushed")
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_personalized() {
        let convo = Conversation::welcome(Some("Ada"));
        assert_eq!(convo.len(), 1);
        let first = &convo.messages[0];
        assert_eq!(first.sender, Sender::Assistant);
        assert!(first.content.starts_with("Hi Ada!"));
        assert!(first.agent_info.is_none());
    }

    #[test]
    fn test_welcome_guest() {
        let convo = Conversation::welcome(None);
        assert_eq!(convo.len(), 1);
        assert!(convo.messages[0].content.starts_with("Welcome to TravelBud!"));
    }

    #[test]
    fn test_push_preserves_append_order() {
        let mut convo = Conversation::welcome(None);
        convo.push(ChatMessage::user("first"));
        convo.push(ChatMessage::user("second"));
        assert_eq!(convo.messages[1].content, "first");
        assert_eq!(convo.messages[2].content, "second");
    }

    #[test]
    fn test_message_ids_are_unique() {
        // The whole point of random ids: several messages created in the same
        // clock tick must not collide.
        let a = ChatMessage::assistant("a");
        let b = ChatMessage::assistant("b");
        let c = ChatMessage::assistant("c");
        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_serde_round_trip() {
        let info = AgentInfo::new("Finance Agent", "Budget optimization");
        let original = vec![
            ChatMessage::user("  spaces kept  "),
            ChatMessage::agent("report", info),
        ];
        let json = serde_json::to_string(&original).unwrap();
        let restored: Vec<ChatMessage> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].content, "  spaces kept  ");
        assert_eq!(restored[0].sender, Sender::User);
        assert_eq!(restored[1].sender, Sender::Agent);
        assert_eq!(
            restored[1].agent_info.as_ref().unwrap().agent_type,
            "Finance Agent"
        );
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        let json = serde_json::to_string(&Sender::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
