use crate::config::{Config, ConfigStore, Model};
use anyhow::{Context, Result};
use std::io::{self, IsTerminal};
use tracing::info;

use super::prompts::{choose_model_from, select_model};

/// Asks for a model: a picker on a terminal, a numbered menu otherwise.
pub fn prompt_for_model(current: Option<Model>) -> Result<Model> {
    if io::stdin().is_terminal() {
        select_model(current)
    } else {
        choose_model_from(io::stdin().lock(), io::stdout())
    }
}

/// Returns the stored config, running first-run model selection when there is
/// none usable.
pub fn ensure_config(store: &ConfigStore) -> Result<Config> {
    ensure_config_with(store, || prompt_for_model(None))
}

pub fn ensure_config_with(
    store: &ConfigStore,
    choose: impl FnOnce() -> Result<Model>,
) -> Result<Config> {
    if let Some(config) = store.load() {
        return Ok(config);
    }

    info!(path = %store.path().display(), "no usable config, selecting model");
    let model = choose()?;
    // A retired model must not cost the user the rest of the file.
    let raw = store.load_raw().unwrap_or_default();
    store
        .save_raw(model, raw)
        .with_context(|| format!("failed to write {}", store.path().display()))
}

/// Picks a new model while keeping every other stored setting.
pub fn reselect_model(store: &ConfigStore) -> Result<Config> {
    let base = store.load();
    reselect_model_with(store, base, prompt_for_model)
}

pub fn reselect_model_with(
    store: &ConfigStore,
    base: Option<Config>,
    choose: impl FnOnce(Option<Model>) -> Result<Model>,
) -> Result<Config> {
    let model = choose(base.as_ref().map(|config| config.model))?;
    let saved = match base {
        Some(base) => store.save(model, Some(&base)),
        None => store.save_raw(model, store.load_raw().unwrap_or_default()),
    };
    saved.with_context(|| format!("failed to write {}", store.path().display()))
}
