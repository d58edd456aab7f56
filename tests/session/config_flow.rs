use std::fs;
use std::io::Cursor;

use basho::config::{ConfigStore, Model, SafeSearch, SearchConfig};
use basho::onboard::choose_model_from;

use super::session_harness::TempStore;

fn config_store(temp: &TempStore) -> ConfigStore {
    ConfigStore::new(temp.tmp.path().join(".basho").join("config.toml"))
}

#[test]
fn first_run_selection_is_persisted() {
    let temp = TempStore::new();
    let store = config_store(&temp);
    assert!(store.load().is_none());

    let model = choose_model_from(Cursor::new("nope\n4\n"), std::io::sink()).unwrap();
    let saved = store.save(model, None).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.model, Model::O3Mini);
    assert_eq!(loaded.search, SearchConfig::default());
}

#[test]
fn saved_file_is_stable_across_reload() {
    let temp = TempStore::new();
    let store = config_store(&temp);
    store.save(Model::Llama70b, None).unwrap();
    let first = fs::read_to_string(store.path()).unwrap();

    let loaded = store.load().unwrap();
    store.save(loaded.model, Some(&loaded)).unwrap();
    assert_eq!(fs::read_to_string(store.path()).unwrap(), first);

    assert!(first.contains("model = \"llama-3.3-70b\""));
    assert!(first.contains("[search.video]"));
    assert!(first.contains("[sessions]"));
}

#[test]
fn partial_file_is_backfilled_on_load() {
    let temp = TempStore::new();
    let store = config_store(&temp);
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(
        store.path(),
        "model = \"gpt-4o-mini\"\n\n[search.text]\nsafesearch = \"strict\"\n",
    )
    .unwrap();

    let config = store.load().unwrap();
    assert_eq!(config.search.text.safesearch, SafeSearch::Strict);
    assert_eq!(config.search.text.max_results, 5);
    assert_eq!(config.search.video.max_results, 3);
    assert_eq!(config.sessions.capacity, 5);
}
