pub mod schema;
pub mod store;

pub use schema::{
    Config, Model, RawConfig, SafeSearch, SearchConfig, SearchKind, SessionsConfig, SurfaceConfig,
    normalize,
};
pub use store::{AppPaths, ConfigStore};
