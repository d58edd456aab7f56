pub mod duckduckgo;
pub mod http_client;
pub mod traits;

pub use duckduckgo::DuckDuckGo;
pub use http_client::build_backend_client;
pub use traits::{
    ArticleHit, BackendFuture, ChatBackend, SearchBackend, SearchHit, SearchQuery, VideoHit,
};
