mod core;
mod model;
mod search;

pub use self::core::{Config, DEFAULT_EDITOR, RawConfig, RawSessions, SessionsConfig, normalize};
pub use model::Model;
pub use search::{
    DEFAULT_REGION, RawSearch, RawSurface, SafeSearch, SearchConfig, SearchKind, SurfaceConfig,
};
