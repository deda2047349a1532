//! # Chat-History Persistence
//!
//! One conversation, one canonical location: `~/.travelbud/chat_history.json`.
//!
//! The store is an injected collaborator rather than ambient global state, so
//! the session container can run against an in-memory store in tests. Writes
//! are whole-sequence overwrites (last writer wins) using atomic rename
//! (write `.tmp`, then `rename()`) for crash safety.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use log::{debug, warn};

use crate::resolver::ChatMessage;

pub const HISTORY_FILE: &str = "chat_history.json";

/// Scoped key-value persistence for one conversation.
pub trait HistoryStore: Send + Sync {
    /// Load the stored sequence. `Ok(None)` means "no usable history" —
    /// including a stored file that fails to parse.
    fn load(&self) -> io::Result<Option<Vec<ChatMessage>>>;

    /// Overwrite the stored sequence. Empty sequences are never written.
    fn save(&self, messages: &[ChatMessage]) -> io::Result<()>;

    /// Remove the stored sequence entirely.
    fn clear(&self) -> io::Result<()>;
}

/// Returns `~/.travelbud/`, creating it if needed.
pub fn data_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".travelbud");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// JSON-file store under the user's data directory.
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    /// Store at the canonical `~/.travelbud/chat_history.json`.
    pub fn open_default() -> io::Result<Self> {
        Ok(Self {
            path: data_dir()?.join(HISTORY_FILE),
        })
    }

    /// Store at an explicit path (tests, alternate profiles).
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> io::Result<Option<Vec<ChatMessage>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Vec<ChatMessage>>(&json) {
            Ok(messages) => {
                debug!("Loaded {} message(s) from {}", messages.len(), self.path.display());
                Ok(Some(messages))
            }
            Err(e) => {
                // Unparseable history is treated as absent, not fatal.
                warn!("Failed to parse {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    fn save(&self, messages: &[ChatMessage]) -> io::Result<()> {
        if messages.is_empty() {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(messages)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryHistoryStore {
    slot: Mutex<Option<Vec<ChatMessage>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> io::Result<Option<Vec<ChatMessage>>> {
        Ok(self.slot.lock().expect("store lock poisoned").clone())
    }

    fn save(&self, messages: &[ChatMessage]) -> io::Result<()> {
        if messages.is_empty() {
            return Ok(());
        }
        *self.slot.lock().expect("store lock poisoned") = Some(messages.to_vec());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.slot.lock().expect("store lock poisoned") = None;
        Ok(())
    }
}

/// Persist the conversation, logging rather than propagating failures — a
/// failed save must never take down the session. Single entry point for the
/// TUI's SaveHistory effect and the quit path.
pub fn save_conversation(store: &dyn HistoryStore, messages: &[ChatMessage]) {
    if let Err(e) = store.save(messages) {
        warn!("Failed to save chat history: {}", e);
    } else {
        debug!("Chat history saved ({} messages)", messages.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{AgentInfo, Sender};

    fn sample_history() -> Vec<ChatMessage> {
        vec![
            ChatMessage::assistant("Welcome!"),
            ChatMessage::user("plan a tokyo trip"),
            ChatMessage::agent("report", AgentInfo::new("Finance Agent", "Budget monitoring")),
        ]
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryHistoryStore::new();
        assert!(store.load().unwrap().is_none());

        let history = sample_history();
        store.save(&history).unwrap();
        let restored = store.load().unwrap().unwrap();

        assert_eq!(restored.len(), history.len());
        for (a, b) in restored.iter().zip(&history) {
            assert_eq!(a.content, b.content);
            assert_eq!(a.sender, b.sender);
        }
    }

    #[test]
    fn test_empty_sequence_is_never_written() {
        let store = MemoryHistoryStore::new();
        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_clear_removes_history() {
        let store = MemoryHistoryStore::new();
        store.save(&sample_history()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("travelbud-test-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let store = FileHistoryStore::at_path(dir.join(HISTORY_FILE));

        assert!(store.load().unwrap().is_none());

        let history = sample_history();
        store.save(&history).unwrap();
        let restored = store.load().unwrap().unwrap();
        assert_eq!(restored.len(), 3);
        assert_eq!(restored[1].content, "plan a tokyo trip");
        assert_eq!(restored[1].sender, Sender::User);
        assert_eq!(
            restored[2].agent_info.as_ref().unwrap().agent_type,
            "Finance Agent"
        );

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_file_treated_as_no_history() {
        let dir = std::env::temp_dir().join(format!("travelbud-test-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(HISTORY_FILE);
        fs::write(&path, "{not json[").unwrap();

        let store = FileHistoryStore::at_path(path);
        assert!(store.load().unwrap().is_none());
        fs::remove_dir_all(&dir).ok();
    }
}
