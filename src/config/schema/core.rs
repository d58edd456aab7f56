use super::model::Model;
use super::search::{RawSearch, SearchConfig};
use crate::session::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_EDITOR: &str = "nano";

/// Fully populated configuration. Only ever built through [`normalize`] or
/// [`Config::backfilled`], so every group is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub model: Model,
    pub editor: String,
    pub search: SearchConfig,
    pub sessions: SessionsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Conversations kept on disk; 0 disables saving.
    pub capacity: usize,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Config exactly as stored; any group or field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    pub model: Option<String>,
    pub editor: Option<String>,
    pub search: Option<RawSearch>,
    pub sessions: Option<RawSessions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSessions {
    pub capacity: Option<i64>,
}

impl From<&Config> for RawConfig {
    fn from(config: &Config) -> Self {
        Self {
            model: Some(config.model.to_string()),
            editor: Some(config.editor.clone()),
            search: Some(RawSearch::from(&config.search)),
            sessions: Some(RawSessions {
                capacity: i64::try_from(config.sessions.capacity).ok(),
            }),
        }
    }
}

/// Turns a stored config into a usable one.
///
/// Returns `None` when the model is missing or not supported; every other gap
/// is filled with its default.
pub fn normalize(raw: RawConfig) -> Option<Config> {
    let Some(name) = raw.model.as_deref().map(str::trim) else {
        debug!("config has no model");
        return None;
    };
    let Ok(model) = name.parse::<Model>() else {
        debug!(model = name, "config names an unsupported model");
        return None;
    };
    Some(Config::backfilled(model, raw))
}

impl Config {
    /// `raw` with `model` forced and all missing groups defaulted.
    pub fn backfilled(model: Model, raw: RawConfig) -> Self {
        let editor = raw
            .editor
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.into());

        let capacity = raw
            .sessions
            .and_then(|sessions| sessions.capacity)
            .and_then(|value| usize::try_from(value).ok())
            .unwrap_or(DEFAULT_CAPACITY);

        Self {
            model,
            editor,
            search: SearchConfig::backfilled(raw.search),
            sessions: SessionsConfig { capacity },
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies `BASHO_MODEL` and `BASHO_SESSION_CAPACITY` as read by `lookup`.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(model) = lookup("BASHO_MODEL") {
            if !model.is_empty() {
                match model.trim().parse::<Model>() {
                    Ok(parsed) => self.model = parsed,
                    Err(_) => warn!(model = %model, "ignoring unsupported BASHO_MODEL"),
                }
            }
        }

        if let Some(capacity) = lookup("BASHO_SESSION_CAPACITY") {
            match capacity.trim().parse::<usize>() {
                Ok(parsed) => self.sessions.capacity = parsed,
                Err(_) => warn!(capacity = %capacity, "ignoring invalid BASHO_SESSION_CAPACITY"),
            }
        }
    }
}
