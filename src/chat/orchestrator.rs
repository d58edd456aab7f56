use super::input::TurnInput;
use super::prompt::{ONE_SHOT_PREFIX, compose};
use super::session::ChatSession;
use crate::backend::ChatBackend;
use crate::config::Model;
use crate::error::{BackendError, Result, StoreError};
use crate::session::{CommitOutcome, Exchange, SessionStore};
use crate::ui::style;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const ASSISTANT_NAME: &str = "BASHō";
pub const WELCOME: &str = "Welcome to BASHō - Your Linux Terminal Assistant! Type 'exit' to quit.";
pub const GOODBYE: &str = "Jaa, mata ne! See you later!";
const USER_PROMPT: &str = "You";

/// Result of one user turn. A failed turn leaves the session unchanged.
#[derive(Debug)]
pub enum TurnOutcome {
    Answered(String),
    Failed(BackendError),
}

enum Line<'a> {
    End,
    Blank,
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let text = line.trim();
    if text.is_empty() {
        Line::Blank
    } else if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
        Line::End
    } else {
        Line::Text(text)
    }
}

/// Drives chat sessions: start (fresh or resumed), turns, and the single
/// commit when a session ends.
pub struct Orchestrator {
    backend: Arc<dyn ChatBackend>,
    store: Box<dyn SessionStore>,
    model: Model,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn ChatBackend>, store: Box<dyn SessionStore>, model: Model) -> Self {
        Self {
            backend,
            store,
            model,
        }
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Opens a fresh session, or resumes stored slot `resume`.
    pub fn start(&self, resume: Option<usize>) -> std::result::Result<ChatSession, StoreError> {
        let Some(index) = resume else {
            return Ok(ChatSession::fresh(self.model));
        };

        let record = self.store.get(index)?;
        info!(index, exchanges = record.len(), "resuming session");
        Ok(ChatSession::resume(
            crate::session::StoredSession { index, record },
            self.model,
        ))
    }

    /// Sends one user line. Exactly one backend call is made; on success the
    /// exchange is recorded, on failure the session comes back untouched.
    pub async fn take_turn(&self, session: ChatSession, text: &str) -> (ChatSession, TurnOutcome) {
        let prompt = session.prompt_for(text);
        match self.backend.chat(&prompt, self.model).await {
            Ok(answer) => {
                let session = session.record_exchange(Exchange::new(text, answer.clone()));
                (session, TurnOutcome::Answered(answer))
            }
            Err(error) => {
                warn!(backend = self.backend.name(), %error, "chat turn failed");
                (session, TurnOutcome::Failed(error))
            }
        }
    }

    /// Ends `session`, persisting it if it holds any exchange.
    pub fn end(&self, session: ChatSession) -> std::result::Result<CommitOutcome, StoreError> {
        let record = session.into_record();
        let outcome = self.store.commit(&record)?;
        debug!(?outcome, "session ended");
        Ok(outcome)
    }

    /// Runs the read/answer loop until `exit`, `quit` or end of input, then
    /// commits the session. A terminal I/O failure still commits whatever was
    /// answered before the error is returned.
    pub async fn run(
        &self,
        session: ChatSession,
        input: &mut dyn TurnInput,
        out: &mut dyn Write,
    ) -> Result<CommitOutcome> {
        let (session, conversed) = self.converse(session, input, out).await;
        let outcome = self.end(session)?;
        if let Err(error) = conversed {
            warn!(%error, ?outcome, "terminal I/O failed, session committed");
            return Err(error.into());
        }

        writeln!(out, "{GOODBYE}")?;
        if let CommitOutcome::Stored { slot, .. } = outcome {
            writeln!(out, "{}", style::note(format!("Conversation saved as session {slot}")))?;
        }
        Ok(outcome)
    }

    async fn converse(
        &self,
        mut session: ChatSession,
        input: &mut dyn TurnInput,
        out: &mut dyn Write,
    ) -> (ChatSession, io::Result<()>) {
        if let Err(error) = greet(&session, out) {
            return (session, Err(error));
        }

        loop {
            let line = match input.next_line(USER_PROMPT) {
                Ok(Some(line)) => line,
                Ok(None) => return (session, Ok(())),
                Err(error) => return (session, Err(error)),
            };
            let text = match classify(&line) {
                Line::End => return (session, Ok(())),
                Line::Blank => continue,
                Line::Text(text) => text,
            };

            let (next, outcome) = self.take_turn(session, text).await;
            session = next;
            let written = match outcome {
                TurnOutcome::Answered(answer) => {
                    writeln!(out, "{} {answer}", style::speaker(ASSISTANT_NAME))
                }
                TurnOutcome::Failed(error) => writeln!(out, "{} {error}", style::failure_label()),
            };
            if let Err(error) = written {
                return (session, Err(error));
            }
        }
    }
}

fn greet(session: &ChatSession, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", style::banner(WELCOME))?;
    if let Some(index) = session.resumed_from() {
        writeln!(
            out,
            "{}",
            style::note(format!(
                "Resuming session {index} ({} exchanges)",
                session.record().len()
            ))
        )?;
    }
    Ok(())
}

/// Answers a single question with the concise prefix. Nothing is persisted.
pub async fn ask_once(
    backend: &dyn ChatBackend,
    model: Model,
    question: &str,
) -> std::result::Result<String, BackendError> {
    let prompt = compose(ONE_SHOT_PREFIX, None, question);
    backend.chat(&prompt, model).await
}
