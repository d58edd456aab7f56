pub mod record;
pub mod store;

pub use record::{ConversationRecord, Exchange, StoredSession};
pub use store::{CommitOutcome, DEFAULT_CAPACITY, JsonSessionStore, SessionStore};
