#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use basho::backend::{BackendFuture, ChatBackend};
use basho::config::Model;
use basho::error::BackendError;
use basho::session::{ConversationRecord, Exchange, JsonSessionStore};

/// Chat backend that answers from a fixed script and records each prompt.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn answering(replies: &[&str]) -> Arc<Self> {
        Self::scripted(replies.iter().map(|reply| Ok((*reply).to_string())).collect())
    }

    pub fn scripted(replies: Vec<Result<String, BackendError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::default(),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn chat<'a>(&'a self, prompt: &'a str, _model: Model) -> BackendFuture<'a, String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Protocol("script exhausted".into())));
        Box::pin(async move { reply })
    }
}

pub struct TempStore {
    pub tmp: TempDir,
    pub dir: PathBuf,
}

impl TempStore {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("conversations");
        Self { tmp, dir }
    }

    pub fn open(&self, capacity: usize) -> JsonSessionStore {
        JsonSessionStore::open(&self.dir, capacity).unwrap()
    }

    pub fn slot_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// One-exchange conversation labelled by its question.
pub fn convo(label: &str) -> ConversationRecord {
    ConversationRecord::new("gpt-4o-mini").with_exchange(Exchange::new(label, format!("re: {label}")))
}

pub fn questions(record: &ConversationRecord) -> Vec<&str> {
    record
        .exchanges
        .iter()
        .map(|exchange| exchange.user.as_str())
        .collect()
}
