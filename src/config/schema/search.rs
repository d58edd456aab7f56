use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

pub const DEFAULT_REGION: &str = "wt-wt";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SafeSearch {
    Strict,
    #[default]
    Moderate,
    Off,
}

impl SafeSearch {
    /// Value of the `p` / `kp` query parameter understood by the search endpoints.
    pub fn query_code(self) -> &'static str {
        match self {
            Self::Strict => "1",
            Self::Moderate => "-1",
            Self::Off => "-2",
        }
    }
}

/// Search surfaces, each with its own settings group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SearchKind {
    Text,
    News,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub max_results: u32,
    pub region: String,
    pub safesearch: SafeSearch,
}

impl SurfaceConfig {
    fn default_max_results(kind: SearchKind) -> u32 {
        match kind {
            SearchKind::Text | SearchKind::News => 5,
            SearchKind::Video => 3,
        }
    }

    pub fn defaults_for(kind: SearchKind) -> Self {
        Self {
            max_results: Self::default_max_results(kind),
            region: DEFAULT_REGION.into(),
            safesearch: SafeSearch::default(),
        }
    }

    /// Fills whatever `raw` lacks (or gets wrong) with the defaults for `kind`.
    pub fn backfilled(kind: SearchKind, raw: Option<RawSurface>) -> Self {
        let raw = raw.unwrap_or_default();

        let max_results = raw
            .max_results
            .and_then(|value| u32::try_from(value).ok())
            .filter(|value| *value > 0)
            .unwrap_or_else(|| Self::default_max_results(kind));

        let region = raw
            .region
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.into());

        let safesearch = match raw.safesearch.as_deref().map(str::trim) {
            None | Some("") => SafeSearch::default(),
            Some(value) => value.parse().unwrap_or_else(|_| {
                warn!(surface = %kind, value, "unknown safesearch level, using moderate");
                SafeSearch::default()
            }),
        };

        Self {
            max_results,
            region,
            safesearch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub video: SurfaceConfig,
    pub text: SurfaceConfig,
    pub news: SurfaceConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            video: SurfaceConfig::defaults_for(SearchKind::Video),
            text: SurfaceConfig::defaults_for(SearchKind::Text),
            news: SurfaceConfig::defaults_for(SearchKind::News),
        }
    }
}

impl SearchConfig {
    pub fn surface(&self, kind: SearchKind) -> &SurfaceConfig {
        match kind {
            SearchKind::Text => &self.text,
            SearchKind::News => &self.news,
            SearchKind::Video => &self.video,
        }
    }

    pub fn backfilled(raw: Option<RawSearch>) -> Self {
        let raw = raw.unwrap_or_default();
        Self {
            video: SurfaceConfig::backfilled(SearchKind::Video, raw.video),
            text: SurfaceConfig::backfilled(SearchKind::Text, raw.text),
            news: SurfaceConfig::backfilled(SearchKind::News, raw.news),
        }
    }
}

// ── Raw (as-stored) shapes ─────────────────────────────────────────────────

/// A search group as found on disk; every field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSurface {
    pub max_results: Option<i64>,
    pub region: Option<String>,
    pub safesearch: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSearch {
    pub video: Option<RawSurface>,
    pub text: Option<RawSurface>,
    pub news: Option<RawSurface>,
}

impl From<&SurfaceConfig> for RawSurface {
    fn from(surface: &SurfaceConfig) -> Self {
        Self {
            max_results: Some(i64::from(surface.max_results)),
            region: Some(surface.region.clone()),
            safesearch: Some(surface.safesearch.to_string()),
        }
    }
}

impl From<&SearchConfig> for RawSearch {
    fn from(search: &SearchConfig) -> Self {
        Self {
            video: Some(RawSurface::from(&search.video)),
            text: Some(RawSurface::from(&search.text)),
            news: Some(RawSurface::from(&search.news)),
        }
    }
}
