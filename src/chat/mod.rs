//! Interactive chat: session lifecycle, turns and persistence on exit.

pub mod input;
pub mod orchestrator;
pub mod prompt;
pub mod session;

pub use input::{LineInput, TerminalInput, TurnInput};
pub use orchestrator::{ASSISTANT_NAME, Orchestrator, TurnOutcome, ask_once};
pub use prompt::{CHAT_PREFIX, ONE_SHOT_PREFIX};
pub use session::ChatSession;
