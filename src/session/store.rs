use super::record::{ConversationRecord, StoredSession};
use crate::error::StoreError;
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Number of conversations kept when the config does not say otherwise.
pub const DEFAULT_CAPACITY: usize = 5;

const SLOT_PREFIX: &str = "convo_";
const SLOT_SUFFIX: &str = ".json";
const CORRUPT_SUFFIX: &str = ".corrupt";
const COMPLETE_MARKER: &str = ".complete";

/// Bounded, oldest-to-newest log of finished conversations.
///
/// Slots are positional: index 1 is the oldest surviving conversation and
/// indices are reassigned on every commit.
pub trait SessionStore {
    /// Maximum number of retained conversations. Zero disables persistence.
    fn capacity(&self) -> usize;

    fn list(&self) -> Result<Vec<StoredSession>, StoreError>;

    fn get(&self, index: usize) -> Result<ConversationRecord, StoreError>;

    /// Appends `record` as the newest conversation and evicts from the front
    /// until the capacity bound holds.
    fn commit(&self, record: &ConversationRecord) -> Result<CommitOutcome, StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Capacity is zero; nothing is ever written.
    Disabled,
    /// The record had no exchanges.
    Skipped,
    Stored { slot: usize, evicted: usize },
}

/// One JSON file per slot (`convo_<N>.json`) inside a single directory.
///
/// A commit writes every surviving slot into a sibling staging directory,
/// marks it complete, then swaps it in place of the live directory. The old
/// directory is kept as a backup until the swap succeeds, so an interrupted
/// commit leaves either the old or the new generation on disk, never a mix.
/// [`JsonSessionStore::open`] resolves whichever of the two was left behind.
pub struct JsonSessionStore {
    dir: PathBuf,
    capacity: usize,
}

struct SlotFile {
    path: PathBuf,
    parsed: Result<ConversationRecord, StoreError>,
}

impl JsonSessionStore {
    pub fn open(dir: impl Into<PathBuf>, capacity: usize) -> Result<Self, StoreError> {
        let store = Self {
            dir: dir.into(),
            capacity,
        };
        if capacity > 0 {
            store.recover()?;
        }
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn staging_dir(&self) -> PathBuf {
        sibling(&self.dir, ".staging")
    }

    fn backup_dir(&self) -> PathBuf {
        sibling(&self.dir, ".previous")
    }

    fn recover(&self) -> Result<(), StoreError> {
        let staging = self.staging_dir();
        let backup = self.backup_dir();

        if !self.dir.exists() {
            if staging.join(COMPLETE_MARKER).exists() {
                info!(dir = %self.dir.display(), "completing interrupted session rotation");
                fs::rename(&staging, &self.dir)?;
                remove_marker(&self.dir);
            } else if backup.exists() {
                warn!(dir = %self.dir.display(), "restoring sessions from interrupted rotation");
                fs::rename(&backup, &self.dir)?;
            }
        }

        if staging.exists() {
            debug!(dir = %staging.display(), "discarding stale staging directory");
            fs::remove_dir_all(&staging)?;
        }
        if backup.exists() && self.dir.exists() {
            fs::remove_dir_all(&backup)?;
        }

        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn scan(&self) -> Result<Vec<SlotFile>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut numbered = Vec::new();
        for entry in entries {
            let entry = entry?;
            let Some(number) = entry.file_name().to_str().and_then(slot_number) else {
                continue;
            };
            numbered.push((number, entry.path()));
        }
        numbered.sort_by_key(|(number, _)| *number);

        Ok(numbered
            .into_iter()
            .map(|(_, path)| {
                let parsed = read_slot(&path);
                SlotFile { path, parsed }
            })
            .collect())
    }

    fn stage(
        &self,
        staging: &Path,
        survivors: &[ConversationRecord],
        unreadable: &[PathBuf],
    ) -> Result<(), StoreError> {
        if staging.exists() {
            fs::remove_dir_all(staging)?;
        }
        fs::create_dir_all(staging)?;

        for (position, record) in survivors.iter().enumerate() {
            write_slot(&staging.join(slot_file_name(position + 1)), record)?;
        }

        // Earlier quarantined files travel with the log.
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if name.to_string_lossy().ends_with(CORRUPT_SUFFIX) {
                fs::copy(entry.path(), staging.join(&name))?;
            }
        }
        for path in unreadable {
            let Some(name) = path.file_name() else {
                continue;
            };
            fs::copy(path, quarantine_path(staging, name))?;
        }

        File::create(staging.join(COMPLETE_MARKER))?.sync_all()?;
        Ok(())
    }

    fn swap_in(&self, staging: &Path) -> Result<(), StoreError> {
        let backup = self.backup_dir();
        if backup.exists() {
            fs::remove_dir_all(&backup)?;
        }

        if self.dir.exists() {
            fs::rename(&self.dir, &backup)
                .map_err(|error| StoreError::Rotation(format!("could not retire old slots: {error}")))?;
        }

        if let Err(error) = fs::rename(staging, &self.dir) {
            if backup.exists() {
                fs::rename(&backup, &self.dir)?;
            }
            return Err(StoreError::Rotation(format!(
                "could not install new slots: {error}"
            )));
        }

        remove_marker(&self.dir);
        if let Err(error) = fs::remove_dir_all(&backup) {
            if error.kind() != io::ErrorKind::NotFound {
                warn!(%error, dir = %backup.display(), "failed to remove retired session slots");
            }
        }
        Ok(())
    }
}

impl SessionStore for JsonSessionStore {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn list(&self) -> Result<Vec<StoredSession>, StoreError> {
        if self.capacity == 0 {
            return Ok(Vec::new());
        }

        let sessions = self
            .scan()?
            .into_iter()
            .filter_map(|slot| match slot.parsed {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(%error, "skipping unreadable session slot");
                    None
                }
            })
            .enumerate()
            .map(|(position, record)| StoredSession {
                index: position + 1,
                record,
            })
            .collect();
        Ok(sessions)
    }

    fn get(&self, index: usize) -> Result<ConversationRecord, StoreError> {
        let sessions = self.list()?;
        let count = sessions.len();
        if index == 0 || index > count {
            return Err(StoreError::OutOfRange { index, count });
        }
        sessions
            .into_iter()
            .nth(index - 1)
            .map(|stored| stored.record)
            .ok_or(StoreError::OutOfRange { index, count })
    }

    fn commit(&self, record: &ConversationRecord) -> Result<CommitOutcome, StoreError> {
        if self.capacity == 0 {
            debug!("session persistence disabled");
            return Ok(CommitOutcome::Disabled);
        }
        if record.is_empty() {
            debug!("not persisting empty conversation");
            return Ok(CommitOutcome::Skipped);
        }

        self.recover()?;

        let mut survivors = Vec::new();
        let mut unreadable = Vec::new();
        for slot in self.scan()? {
            match slot.parsed {
                Ok(existing) => survivors.push(existing),
                Err(error) => {
                    warn!(%error, "quarantining unreadable session slot");
                    unreadable.push(slot.path);
                }
            }
        }

        survivors.push(record.clone());
        let evicted = survivors.len().saturating_sub(self.capacity);
        survivors.drain(..evicted);

        let staging = self.staging_dir();
        if let Err(error) = self.stage(&staging, &survivors, &unreadable) {
            if let Err(cleanup) = fs::remove_dir_all(&staging) {
                debug!(%cleanup, "staging cleanup failed");
            }
            return Err(StoreError::Rotation(error.to_string()));
        }
        self.swap_in(&staging)?;

        info!(
            slots = survivors.len(),
            evicted,
            quarantined = unreadable.len(),
            "session log rotated"
        );
        Ok(CommitOutcome::Stored {
            slot: survivors.len(),
            evicted,
        })
    }
}

fn sibling(dir: &Path, suffix: &str) -> PathBuf {
    let mut name = dir
        .file_name()
        .map_or_else(|| OsString::from("sessions"), ToOwned::to_owned);
    name.push(suffix);
    dir.with_file_name(name)
}

fn slot_file_name(index: usize) -> String {
    format!("{SLOT_PREFIX}{index}{SLOT_SUFFIX}")
}

fn slot_number(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix(SLOT_PREFIX)?
        .strip_suffix(SLOT_SUFFIX)?
        .parse()
        .ok()
}

/// First free `<name>.corrupt`, `<name>.1.corrupt`, ... inside `dir`.
fn quarantine_path(dir: &Path, name: &OsStr) -> PathBuf {
    let mut attempt = 0usize;
    loop {
        let mut candidate = name.to_os_string();
        if attempt > 0 {
            candidate.push(format!(".{attempt}"));
        }
        candidate.push(CORRUPT_SUFFIX);
        let path = dir.join(candidate);
        if !path.exists() {
            return path;
        }
        attempt += 1;
    }
}

fn read_slot(path: &Path) -> Result<ConversationRecord, StoreError> {
    let corrupt = |message: String| StoreError::Corrupt {
        path: path.to_path_buf(),
        message,
    };
    let contents = fs::read_to_string(path).map_err(|error| corrupt(error.to_string()))?;
    serde_json::from_str(&contents).map_err(|error| corrupt(error.to_string()))
}

fn write_slot(path: &Path, record: &ConversationRecord) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(record)
        .map_err(|error| StoreError::Serialize(error.to_string()))?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn remove_marker(dir: &Path) {
    if let Err(error) = fs::remove_file(dir.join(COMPLETE_MARKER)) {
        if error.kind() != io::ErrorKind::NotFound {
            debug!(%error, "failed to remove rotation marker");
        }
    }
}
