use chat_relay_contract::{ChatRole, WireMessage};
use platform_host::{StorageFacade, CHAT_HISTORY_KEY};
use serde::{Deserialize, Serialize};

/// Messages kept in the persisted transcript; older ones are evicted first.
pub const TRANSCRIPT_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Unix milliseconds.
    pub timestamp: u64,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>, timestamp: u64) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }

    pub fn to_wire(&self) -> WireMessage {
        WireMessage::new(self.role, self.content.clone())
    }
}

/// Persisted chat history, rewritten whole on every change.
#[derive(Debug, Clone)]
pub struct Transcript {
    storage: StorageFacade,
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn load(storage: StorageFacade) -> Self {
        let mut messages: Vec<ChatMessage> = storage.get(CHAT_HISTORY_KEY, Vec::new());
        trim_to_limit(&mut messages);
        Self { storage, messages }
    }

    /// Re-reads the history from storage, dropping the in-memory copy.
    pub fn reload(&mut self) {
        self.messages = self.storage.get(CHAT_HISTORY_KEY, Vec::new());
        trim_to_limit(&mut self.messages);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        trim_to_limit(&mut self.messages);
        self.storage.set(CHAT_HISTORY_KEY, &self.messages);
    }

    /// The last `count` messages with content, oldest first.
    pub fn recent(&self, count: usize) -> Vec<WireMessage> {
        let start = self.messages.len().saturating_sub(count);
        self.messages[start..]
            .iter()
            .filter(|m| !m.content.is_empty())
            .map(ChatMessage::to_wire)
            .collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.storage.remove(CHAT_HISTORY_KEY);
    }
}

fn trim_to_limit(messages: &mut Vec<ChatMessage>) {
    if messages.len() > TRANSCRIPT_LIMIT {
        let overflow = messages.len() - TRANSCRIPT_LIMIT;
        messages.drain(0..overflow);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn transcript_keeps_the_newest_fifty() {
        let storage = StorageFacade::in_memory();
        let mut transcript = Transcript::load(storage.clone());
        for i in 0..60u64 {
            transcript.push(ChatMessage::new(ChatRole::User, format!("m{i}"), i));
        }

        assert_eq!(transcript.messages().len(), TRANSCRIPT_LIMIT);
        assert_eq!(transcript.messages()[0].content, "m10");

        let reloaded = Transcript::load(storage);
        assert_eq!(reloaded.messages().len(), TRANSCRIPT_LIMIT);
        assert_eq!(reloaded.messages()[49].content, "m59");
    }

    #[test]
    fn recent_skips_empty_messages() {
        let mut transcript = Transcript::load(StorageFacade::in_memory());
        transcript.push(ChatMessage::new(ChatRole::User, "a", 1));
        transcript.push(ChatMessage::new(ChatRole::Assistant, "", 2));
        transcript.push(ChatMessage::new(ChatRole::User, "b", 3));

        let recent = transcript.recent(2);
        assert_eq!(recent, vec![WireMessage::new(ChatRole::User, "b")]);
    }

    #[test]
    fn reload_picks_up_a_cleared_store() {
        let storage = StorageFacade::in_memory();
        let mut transcript = Transcript::load(storage.clone());
        transcript.push(ChatMessage::new(ChatRole::User, "old", 1));

        storage.clear();
        transcript.reload();
        transcript.push(ChatMessage::new(ChatRole::User, "new", 2));

        let stored: Vec<ChatMessage> = storage.get(CHAT_HISTORY_KEY, Vec::new());
        assert_eq!(stored, vec![ChatMessage::new(ChatRole::User, "new", 2)]);
    }

    #[test]
    fn clear_removes_persisted_history() {
        let storage = StorageFacade::in_memory();
        let mut transcript = Transcript::load(storage.clone());
        transcript.push(ChatMessage::new(ChatRole::User, "hi", 1));
        transcript.clear();
        assert!(Transcript::load(storage).is_empty());
    }
}
