use super::prompt::{CHAT_PREFIX, compose};
use crate::config::Model;
use crate::session::{ConversationRecord, Exchange, StoredSession};

/// A live interactive session.
///
/// Owned by the caller and threaded through every turn; recording an
/// exchange consumes the session and hands back the extended one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    record: ConversationRecord,
    resume_context: Option<String>,
    resumed_from: Option<usize>,
}

impl ChatSession {
    pub fn fresh(model: Model) -> Self {
        Self {
            record: ConversationRecord::new(model.as_str()),
            resume_context: None,
            resumed_from: None,
        }
    }

    /// Seeds a session with a stored conversation. The prior exchanges are
    /// rendered once into the resume context and also copied into the live
    /// record, which takes the currently configured model.
    pub fn resume(stored: StoredSession, model: Model) -> Self {
        let context = stored.record.transcript();
        let mut record = stored.record;
        record.model = model.as_str().to_string();

        Self {
            record,
            resume_context: (!context.is_empty()).then_some(context),
            resumed_from: Some(stored.index),
        }
    }

    pub fn record(&self) -> &ConversationRecord {
        &self.record
    }

    pub fn into_record(self) -> ConversationRecord {
        self.record
    }

    pub fn resume_context(&self) -> Option<&str> {
        self.resume_context.as_deref()
    }

    /// Slot the session was resumed from, if any.
    pub fn resumed_from(&self) -> Option<usize> {
        self.resumed_from
    }

    pub fn prompt_for(&self, text: &str) -> String {
        compose(CHAT_PREFIX, self.resume_context(), text)
    }

    pub fn record_exchange(self, exchange: Exchange) -> Self {
        Self {
            record: self.record.with_exchange(exchange),
            ..self
        }
    }
}
