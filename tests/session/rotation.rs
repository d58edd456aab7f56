use std::fs;

use basho::session::{CommitOutcome, SessionStore};

use super::session_harness::{TempStore, convo, questions};

#[test]
fn sixth_session_evicts_the_oldest() {
    let temp = TempStore::new();
    let store = temp.open(5);

    for label in ["S1", "S2", "S3", "S4", "S5"] {
        store.commit(&convo(label)).unwrap();
    }
    let outcome = store.commit(&convo("S6")).unwrap();
    assert_eq!(outcome, CommitOutcome::Stored { slot: 5, evicted: 1 });

    let listed: Vec<String> = store
        .list()
        .unwrap()
        .into_iter()
        .map(|stored| stored.record.exchanges[0].user.clone())
        .collect();
    assert_eq!(listed, ["S2", "S3", "S4", "S5", "S6"]);
    assert_eq!(questions(&store.get(5).unwrap()), ["S6"]);
    assert_eq!(questions(&store.get(1).unwrap()), ["S2"]);

    assert_eq!(
        temp.slot_files(),
        ["convo_1.json", "convo_2.json", "convo_3.json", "convo_4.json", "convo_5.json"]
    );
}

#[test]
fn reopening_sees_the_same_log() {
    let temp = TempStore::new();
    {
        let store = temp.open(3);
        for label in ["a", "b", "c", "d"] {
            store.commit(&convo(label)).unwrap();
        }
    }

    let reopened = temp.open(3);
    let listed = reopened.list().unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].index, 1);
    assert_eq!(questions(&listed[0].record), ["b"]);
    assert_eq!(questions(&listed[2].record), ["d"]);
}

#[test]
fn slot_files_are_readable_json() {
    let temp = TempStore::new();
    temp.open(5).commit(&convo("df -h?")).unwrap();

    let raw = fs::read_to_string(temp.dir.join("convo_1.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["model"], "gpt-4o-mini");
    assert_eq!(value["exchanges"][0]["user"], "df -h?");
    assert_eq!(value["exchanges"][0]["assistant"], "re: df -h?");
}

#[test]
fn zero_capacity_never_touches_disk() {
    let temp = TempStore::new();
    let store = temp.open(0);

    assert_eq!(store.commit(&convo("a")).unwrap(), CommitOutcome::Disabled);
    assert!(store.list().unwrap().is_empty());
    assert!(!temp.dir.exists());
}

#[test]
fn out_of_range_leaves_store_untouched() {
    let temp = TempStore::new();
    let store = temp.open(5);
    store.commit(&convo("only")).unwrap();

    let err = store.get(4).unwrap_err();
    assert!(err.to_string().contains("1-1"));
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn corrupt_slot_is_skipped_then_quarantined() {
    let temp = TempStore::new();
    let store = temp.open(5);
    store.commit(&convo("good")).unwrap();
    fs::write(temp.dir.join("convo_2.json"), "{ not json").unwrap();

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);

    store.commit(&convo("newer")).unwrap();
    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(questions(&listed[1].record), ["newer"]);
    assert!(temp.slot_files().contains(&"convo_2.json.corrupt".to_string()));
}
