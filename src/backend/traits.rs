use crate::config::{Model, SafeSearch, SearchKind, SurfaceConfig};
use crate::error::BackendError;
use std::future::Future;
use std::pin::Pin;

pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BackendError>> + Send + 'a>>;

/// Remote chat: one prompt in, one answer out.
pub trait ChatBackend: Send + Sync {
    /// Backend identifier (e.g. "duckduckgo").
    fn name(&self) -> &str;

    fn chat<'a>(&'a self, prompt: &'a str, model: Model) -> BackendFuture<'a, String>;
}

/// Remote search over one of the text / news / video surfaces.
pub trait SearchBackend: Send + Sync {
    fn search<'a>(&'a self, query: SearchQuery<'a>) -> BackendFuture<'a, Vec<SearchHit>>;
}

#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    pub kind: SearchKind,
    pub query: &'a str,
    pub region: &'a str,
    pub safesearch: SafeSearch,
    pub max_results: usize,
}

impl<'a> SearchQuery<'a> {
    pub fn new(kind: SearchKind, query: &'a str, surface: &'a SurfaceConfig) -> Self {
        Self {
            kind,
            query,
            region: &surface.region,
            safesearch: surface.safesearch,
            max_results: usize::try_from(surface.max_results).unwrap_or(usize::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchHit {
    Article(ArticleHit),
    Video(VideoHit),
}

/// Text or news result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleHit {
    pub title: String,
    pub url: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoHit {
    pub title: String,
    pub duration: String,
    pub url: String,
    pub view_count: Option<u64>,
}
