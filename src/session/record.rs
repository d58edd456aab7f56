use serde::{Deserialize, Serialize};

/// One user question and the assistant's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// A single conversation: the model that answered plus its exchanges in
/// chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub model: String,
    #[serde(default)]
    pub exchanges: Vec<Exchange>,
}

impl ConversationRecord {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            exchanges: Vec::new(),
        }
    }

    /// Returns the record with `exchange` appended as the newest entry.
    pub fn with_exchange(mut self, exchange: Exchange) -> Self {
        self.exchanges.push(exchange);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    /// Renders every exchange as alternating `User:` / `Assistant:` lines.
    pub fn transcript(&self) -> String {
        self.exchanges
            .iter()
            .map(|exchange| format!("User: {}\nAssistant: {}", exchange.user, exchange.assistant))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// First user question, used as a one-line label in listings.
    pub fn headline(&self) -> Option<&str> {
        self.exchanges.first().map(|exchange| exchange.user.as_str())
    }
}

/// A persisted record bound to its positional slot (1 = oldest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub index: usize,
    pub record: ConversationRecord,
}
