use std::path::PathBuf;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `basho`.
///
/// Each subsystem defines its own error enum. The binary glue (`app`, `main`)
/// works in `anyhow::Result` and attaches context on top of these.
#[derive(Debug, Error)]
pub enum BashoError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Session store ───────────────────────────────────────────────────
    #[error("sessions: {0}")]
    Store(#[from] StoreError),

    // ── Remote chat / search ────────────────────────────────────────────
    #[error("backend: {0}")]
    Backend(#[from] BackendError),

    // ── Terminal I/O ────────────────────────────────────────────────────
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not find home directory")]
    HomeDirMissing,

    #[error("failed to serialize config: {0}")]
    Serialize(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Session store errors ────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session {index} does not exist ({})", valid_range(*count))]
    OutOfRange { index: usize, count: usize },

    #[error("corrupt session file {}: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },

    #[error("failed to serialize session: {0}")]
    Serialize(String),

    #[error("rotation aborted: {0}")]
    Rotation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

fn valid_range(count: usize) -> String {
    match count {
        0 => "no saved sessions".into(),
        count => format!("valid range: 1-{count}"),
    }
}

// ─── Backend errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("unexpected response: {0}")]
    Protocol(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, BashoError>;
