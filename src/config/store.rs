use super::schema::{Config, Model, RawConfig, normalize};
use crate::error::ConfigError;
use directories::UserDirs;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// On-disk layout under the app directory (`~/.basho` unless `BASHO_HOME` is set).
#[derive(Debug, Clone)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve() -> Result<Self, ConfigError> {
        if let Ok(home) = std::env::var("BASHO_HOME") {
            if !home.is_empty() {
                return Ok(Self::new(home));
            }
        }

        UserDirs::new()
            .map(|dirs| Self::new(dirs.home_dir().join(".basho")))
            .ok_or(ConfigError::HomeDirMissing)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn conversations_dir(&self) -> PathBuf {
        self.root.join("conversations")
    }
}

/// Reads and writes the single `config.toml`.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored configuration, or `None` when there is nothing usable
    /// on disk (missing file, unparseable TOML, unsupported model).
    pub fn load(&self) -> Option<Config> {
        let config = self.load_raw().and_then(normalize);
        if config.is_none() {
            info!("stored model is missing or unsupported; model selection required");
        }
        config
    }

    /// The stored file as parsed, before the model is validated. Groups kept
    /// here survive a model re-selection even when the old model is gone.
    pub fn load_raw(&self) -> Option<RawConfig> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no config file yet");
                return None;
            }
            Err(error) => {
                warn!(%error, path = %self.path.display(), "could not read config");
                return None;
            }
        };

        match toml::from_str(&contents) {
            Ok(raw) => Some(raw),
            Err(error) => {
                warn!(%error, path = %self.path.display(), "ignoring unparseable config");
                None
            }
        }
    }

    /// Writes `model` on top of `base` (or on top of defaults) and returns
    /// what was written. Identical inputs always produce identical bytes.
    pub fn save(&self, model: Model, base: Option<&Config>) -> Result<Config, ConfigError> {
        self.save_raw(model, base.map(RawConfig::from).unwrap_or_default())
    }

    /// Like [`save`](Self::save), but over groups that have not been
    /// normalized yet.
    pub fn save_raw(&self, model: Model, raw: RawConfig) -> Result<Config, ConfigError> {
        let config = Config::backfilled(model, raw);

        let toml_str = toml::to_string_pretty(&config)
            .map_err(|error| ConfigError::Serialize(error.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("toml.tmp");
        let mut file = File::create(&tmp_path)?;
        file.write_all(toml_str.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, &self.path)?;

        debug!(path = %self.path.display(), model = %config.model, "config saved");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{SafeSearch, SearchConfig};
    use crate::session::DEFAULT_CAPACITY;
    use tempfile::TempDir;

    fn store() -> (TempDir, ConfigStore) {
        let tmp = TempDir::new().unwrap();
        let store = ConfigStore::new(tmp.path().join("nested").join("config.toml"));
        (tmp, store)
    }

    #[test]
    fn load_returns_none_without_file() {
        let (_tmp, store) = store();
        assert!(store.load().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_tmp, store) = store();
        let saved = store.save(Model::Claude3Haiku, None).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.model, Model::Claude3Haiku);
        assert_eq!(loaded.search, SearchConfig::default());
        assert_eq!(loaded.sessions.capacity, DEFAULT_CAPACITY);
        assert!(!loaded.editor.is_empty());
    }

    #[test]
    fn repeated_saves_are_byte_identical() {
        let (_tmp, store) = store();
        store.save(Model::O3Mini, None).unwrap();
        let first = fs::read(store.path()).unwrap();
        store.save(Model::O3Mini, None).unwrap();
        let second = fs::read(store.path()).unwrap();
        assert_eq!(first, second);

        let loaded = store.load().unwrap();
        store.save(loaded.model, Some(&loaded)).unwrap();
        assert_eq!(fs::read(store.path()).unwrap(), first);
    }

    #[test]
    fn save_keeps_base_groups() {
        let (_tmp, store) = store();
        let mut base = store.save(Model::Gpt4oMini, None).unwrap();
        base.editor = "vim".into();
        base.search.text.safesearch = SafeSearch::Strict;

        let saved = store.save(Model::Mixtral8x7b, Some(&base)).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(saved, loaded);
        assert_eq!(loaded.model, Model::Mixtral8x7b);
        assert_eq!(loaded.editor, "vim");
        assert_eq!(loaded.search.text.safesearch, SafeSearch::Strict);
    }

    #[test]
    fn unsupported_model_loads_as_none() {
        let (_tmp, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "model = \"gpt-3.5-turbo\"\n").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn unparseable_file_loads_as_none() {
        let (_tmp, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "model = [unterminated").unwrap();
        assert!(store.load().is_none());

        fs::write(store.path(), "model = \"o3-mini\"\n[search.text]\nmax_results = \"five\"\n")
            .unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn legacy_model_only_file_is_backfilled() {
        let (_tmp, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "model = \"llama-3.3-70b\"\n").unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.model, Model::Llama70b);
        assert_eq!(loaded.search, SearchConfig::default());
    }

    #[test]
    fn unsupported_model_keeps_raw_groups() {
        let (_tmp, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            "model = \"gpt-3.5-retired\"\neditor = \"vim\"\n[sessions]\ncapacity = 0\n",
        )
        .unwrap();
        assert!(store.load().is_none());

        let raw = store.load_raw().unwrap();
        assert_eq!(raw.model.as_deref(), Some("gpt-3.5-retired"));
        let saved = store.save_raw(Model::O3Mini, raw).unwrap();

        assert_eq!(saved.editor, "vim");
        assert_eq!(saved.sessions.capacity, 0);
        assert_eq!(store.load().unwrap(), saved);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let (_tmp, store) = store();
        store.save(Model::O3Mini, None).unwrap();
        assert!(!store.path().with_extension("toml.tmp").exists());
    }

    #[test]
    fn app_paths_layout() {
        let paths = AppPaths::new("/home/someone/.basho");
        assert_eq!(paths.config_file(), PathBuf::from("/home/someone/.basho/config.toml"));
        assert_eq!(
            paths.conversations_dir(),
            PathBuf::from("/home/someone/.basho/conversations")
        );
    }
}
