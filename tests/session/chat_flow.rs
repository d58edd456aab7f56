use std::io::Cursor;
use std::sync::Arc;

use basho::backend::ChatBackend;
use basho::chat::{LineInput, Orchestrator, TurnOutcome};
use basho::config::Model;
use basho::error::BackendError;
use basho::session::{CommitOutcome, Exchange};

use super::session_harness::{ScriptedBackend, TempStore, convo, questions};

fn orchestrator(temp: &TempStore, backend: &Arc<ScriptedBackend>, capacity: usize) -> Orchestrator {
    let backend: Arc<dyn ChatBackend> = backend.clone();
    Orchestrator::new(backend, Box::new(temp.open(capacity)), Model::Claude3Haiku)
}

#[tokio::test]
async fn resumed_session_is_extended_into_newest_slot() {
    let temp = TempStore::new();
    let backend = ScriptedBackend::answering(&["find . -size +100M"]);
    let orchestrator = orchestrator(&temp, &backend, 5);
    for label in ["first", "second", "third"] {
        orchestrator.store().commit(&convo(label)).unwrap();
    }

    let session = orchestrator.start(Some(2)).unwrap();
    let mut input = LineInput::new(Cursor::new("and big files?\nexit\n"), std::io::sink());
    let outcome = orchestrator
        .run(session, &mut input, &mut Vec::new())
        .await
        .unwrap();
    assert_eq!(outcome, CommitOutcome::Stored { slot: 4, evicted: 0 });

    let listed = orchestrator.store().list().unwrap();
    assert_eq!(listed.len(), 4);
    assert_eq!(questions(&listed[1].record), ["second"]);

    let newest = &listed[3].record;
    assert_eq!(questions(newest), ["second", "and big files?"]);
    assert_eq!(newest.model, "claude-3-haiku");
    assert_eq!(
        newest.exchanges[1],
        Exchange::new("and big files?", "find . -size +100M")
    );

    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("User: second\nAssistant: re: second"));
}

#[tokio::test]
async fn chat_sessions_rotate_through_the_store() {
    let temp = TempStore::new();
    let replies: Vec<String> = (1..=4).map(|n| format!("answer {n}")).collect();
    let backend = ScriptedBackend::answering(&replies.iter().map(String::as_str).collect::<Vec<_>>());
    let orchestrator = orchestrator(&temp, &backend, 2);

    for n in 1..=4 {
        let session = orchestrator.start(None).unwrap();
        let (session, outcome) = orchestrator.take_turn(session, &format!("question {n}")).await;
        assert!(matches!(outcome, TurnOutcome::Answered(_)));
        orchestrator.end(session).unwrap();
    }

    let listed = orchestrator.store().list().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(questions(&listed[0].record), ["question 3"]);
    assert_eq!(questions(&listed[1].record), ["question 4"]);
}

#[tokio::test]
async fn failed_turns_are_not_recorded() {
    let temp = TempStore::new();
    let backend = ScriptedBackend::scripted(vec![
        Err(BackendError::Status {
            endpoint: "chat".into(),
            status: 418,
            message: "teapot".into(),
        }),
        Ok("whoami".into()),
    ]);
    let orchestrator = orchestrator(&temp, &backend, 5);

    let session = orchestrator.start(None).unwrap();
    let mut input = LineInput::new(Cursor::new("who am I?\nwho am I really?\n"), std::io::sink());
    let mut out = Vec::new();
    orchestrator.run(session, &mut input, &mut out).await.unwrap();

    let transcript = String::from_utf8(out).unwrap();
    assert!(transcript.contains("HTTP 418"));

    let stored = orchestrator.store().get(1).unwrap();
    assert_eq!(questions(&stored), ["who am I really?"]);
}

#[tokio::test]
async fn session_with_only_failures_is_not_saved() {
    let temp = TempStore::new();
    let backend = ScriptedBackend::scripted(vec![Err(BackendError::Protocol("down".into()))]);
    let orchestrator = orchestrator(&temp, &backend, 5);

    let session = orchestrator.start(None).unwrap();
    let mut input = LineInput::new(Cursor::new("anyone there?\n"), std::io::sink());
    let outcome = orchestrator
        .run(session, &mut input, &mut Vec::new())
        .await
        .unwrap();

    assert_eq!(outcome, CommitOutcome::Skipped);
    assert!(orchestrator.store().list().unwrap().is_empty());
}

#[tokio::test]
async fn resuming_a_missing_slot_names_the_range() {
    let temp = TempStore::new();
    let backend = ScriptedBackend::answering(&[]);
    let orchestrator = orchestrator(&temp, &backend, 5);
    orchestrator.store().commit(&convo("one")).unwrap();
    orchestrator.store().commit(&convo("two")).unwrap();

    let err = orchestrator.start(Some(9)).unwrap_err();
    assert_eq!(err.to_string(), "session 9 does not exist (valid range: 1-2)");
    assert!(backend.prompts().is_empty());
}
