//! DuckDuckGo AI chat and search.
//!
//! Chat goes through the duck.ai status handshake (an `x-vqd-4` token) and
//! reads the answer from a server-sent event stream. Text search scrapes the
//! HTML endpoint; news and video use the JSON endpoints, which need a `vqd`
//! token taken from the regular search page.

use super::http_client::build_backend_client;
use super::traits::{
    ArticleHit, BackendFuture, ChatBackend, SearchBackend, SearchHit, SearchQuery, VideoHit,
};
use crate::config::{Model, SearchKind};
use crate::error::BackendError;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://duckduckgo.com";
const DEFAULT_HTML_URL: &str = "https://html.duckduckgo.com";
const VQD_HEADER: &str = "x-vqd-4";
const ERROR_BODY_LIMIT: usize = 200;

pub struct DuckDuckGo {
    base_url: String,
    html_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatEvent {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    status: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct ResultsPayload<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    excerpt: String,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    duration: String,
    #[serde(default)]
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount", default)]
    view_count: Option<u64>,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self::with_endpoints(DEFAULT_BASE_URL, DEFAULT_HTML_URL)
    }

    /// Points the backend at other hosts (used against mock servers).
    pub fn with_endpoints(base_url: &str, html_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            html_url: html_url.trim_end_matches('/').to_string(),
            client: build_backend_client(),
        }
    }

    async fn chat_token(&self) -> Result<String, BackendError> {
        let endpoint = format!("{}/duckchat/v1/status", self.base_url);
        let response = self
            .client
            .get(&endpoint)
            .header("x-vqd-accept", "1")
            .send()
            .await
            .map_err(|error| request_error(&endpoint, &error))?;
        let response = ensure_success(&endpoint, response).await?;

        response
            .headers()
            .get(VQD_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| BackendError::Protocol(format!("{endpoint} returned no {VQD_HEADER}")))
    }

    async fn send_chat(&self, prompt: &str, model: Model) -> Result<String, BackendError> {
        let token = self.chat_token().await?;
        let endpoint = format!("{}/duckchat/v1/chat", self.base_url);
        let request = ChatRequest {
            model: model.api_id(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(%model, %endpoint, "sending chat request");
        let response = self
            .client
            .post(&endpoint)
            .header(VQD_HEADER, token)
            .header(ACCEPT, "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(|error| request_error(&endpoint, &error))?;
        let response = ensure_success(&endpoint, response).await?;
        let body = response
            .text()
            .await
            .map_err(|error| request_error(&endpoint, &error))?;

        parse_chat_stream(&body)
    }

    async fn search_token(&self, query: &str) -> Result<String, BackendError> {
        let endpoint = format!("{}/", self.base_url);
        let response = self
            .client
            .get(&endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|error| request_error(&endpoint, &error))?;
        let body = ensure_success(&endpoint, response)
            .await?
            .text()
            .await
            .map_err(|error| request_error(&endpoint, &error))?;

        extract_vqd(&body)
            .ok_or_else(|| BackendError::Protocol("search page carried no vqd token".into()))
    }

    async fn search_text(&self, query: &SearchQuery<'_>) -> Result<Vec<SearchHit>, BackendError> {
        let endpoint = format!("{}/html/", self.html_url);
        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("q", query.query),
                ("kl", query.region),
                ("kp", query.safesearch.query_code()),
            ])
            .send()
            .await
            .map_err(|error| request_error(&endpoint, &error))?;
        let body = ensure_success(&endpoint, response)
            .await?
            .text()
            .await
            .map_err(|error| request_error(&endpoint, &error))?;

        parse_html_results(&body, query.max_results)
    }

    async fn fetch_results<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &SearchQuery<'_>,
        extra: &[(&str, &str)],
    ) -> Result<Vec<T>, BackendError> {
        let token = self.search_token(query.query).await?;
        let endpoint = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("l", query.region),
                ("o", "json"),
                ("q", query.query),
                ("vqd", token.as_str()),
                ("p", query.safesearch.query_code()),
            ])
            .query(extra)
            .send()
            .await
            .map_err(|error| request_error(&endpoint, &error))?;
        let payload: ResultsPayload<T> = ensure_success(&endpoint, response)
            .await?
            .json()
            .await
            .map_err(|error| BackendError::Protocol(format!("{endpoint}: {error}")))?;

        Ok(payload.results)
    }

    async fn search_news(&self, query: &SearchQuery<'_>) -> Result<Vec<SearchHit>, BackendError> {
        let items: Vec<NewsItem> = self
            .fetch_results("news.js", query, &[("noamp", "1")])
            .await?;

        Ok(items
            .into_iter()
            .filter(|item| !item.url.is_empty())
            .take(query.max_results)
            .map(|item| {
                SearchHit::Article(ArticleHit {
                    title: strip_markup(&item.title),
                    url: item.url,
                    body: strip_markup(&item.excerpt),
                })
            })
            .collect())
    }

    async fn search_videos(&self, query: &SearchQuery<'_>) -> Result<Vec<SearchHit>, BackendError> {
        let items: Vec<VideoItem> = self
            .fetch_results("v.js", query, &[("f", ",,,,")])
            .await?;

        Ok(items
            .into_iter()
            .filter(|item| !item.content.is_empty())
            .take(query.max_results)
            .map(|item| {
                SearchHit::Video(VideoHit {
                    title: strip_markup(&item.title),
                    duration: item.duration,
                    url: item.content,
                    view_count: item.statistics.and_then(|stats| stats.view_count),
                })
            })
            .collect())
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatBackend for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn chat<'a>(&'a self, prompt: &'a str, model: Model) -> BackendFuture<'a, String> {
        Box::pin(async move { self.send_chat(prompt, model).await })
    }
}

impl SearchBackend for DuckDuckGo {
    fn search<'a>(&'a self, query: SearchQuery<'a>) -> BackendFuture<'a, Vec<SearchHit>> {
        Box::pin(async move {
            debug!(kind = %query.kind, max_results = query.max_results, "searching");
            match query.kind {
                SearchKind::Text => self.search_text(&query).await,
                SearchKind::News => self.search_news(&query).await,
                SearchKind::Video => self.search_videos(&query).await,
            }
        })
    }
}

fn request_error(endpoint: &str, error: &reqwest::Error) -> BackendError {
    BackendError::Request {
        endpoint: endpoint.to_string(),
        message: error.to_string(),
    }
}

async fn ensure_success(endpoint: &str, response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let mut message: String = body.trim().chars().take(ERROR_BODY_LIMIT).collect();
    if message.is_empty() {
        message = status.canonical_reason().unwrap_or("no body").to_string();
    }
    Err(BackendError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        message,
    })
}

/// Concatenates the `message` fragments of a duck.ai event stream.
pub(crate) fn parse_chat_stream(body: &str) -> Result<String, BackendError> {
    let mut answer = String::new();

    for line in body.lines() {
        let Some(data) = line.trim().strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();
        if data == "[DONE]" {
            break;
        }
        if data.is_empty() {
            continue;
        }

        let event: ChatEvent = match serde_json::from_str(data) {
            Ok(event) => event,
            Err(error) => {
                debug!(%error, "skipping unparseable chat event");
                continue;
            }
        };

        if event.action.as_deref() == Some("error") {
            return Err(BackendError::Protocol(format!(
                "chat stream reported {} (status {})",
                event.kind.as_deref().unwrap_or("an error"),
                event.status.map_or_else(|| "unknown".to_string(), |s| s.to_string()),
            )));
        }
        if let Some(fragment) = event.message {
            answer.push_str(&fragment);
        }
    }

    if answer.is_empty() {
        return Err(BackendError::Protocol(
            "chat stream contained no message".into(),
        ));
    }
    Ok(answer)
}

/// Pulls the `vqd` token out of a search page.
pub(crate) fn extract_vqd(body: &str) -> Option<String> {
    [("vqd=\"", '"'), ("vqd='", '\''), ("vqd=", '&')]
        .into_iter()
        .find_map(|(start, end)| {
            let rest = &body[body.find(start)? + start.len()..];
            let token = &rest[..rest.find(end)?];
            (!token.is_empty()).then(|| token.to_string())
        })
}

fn selector(css: &str) -> Result<Selector, BackendError> {
    Selector::parse(css)
        .map_err(|error| BackendError::Protocol(format!("invalid selector {css}: {error}")))
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_markup(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    collapse_whitespace(parsed.root_element().text())
}

/// Result links on the HTML endpoint are `//duckduckgo.com/l/?uddg=<target>`
/// redirects; ad links go through `/y.js`.
fn resolve_result_url(href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    let Ok(parsed) = Url::parse(&absolute) else {
        return Some(absolute);
    };

    if parsed.path().starts_with("/y.js") {
        return None;
    }
    if parsed.path().starts_with("/l/") {
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned());
    }
    Some(absolute)
}

pub(crate) fn parse_html_results(
    html: &str,
    max_results: usize,
) -> Result<Vec<SearchHit>, BackendError> {
    let document = Html::parse_document(html);
    let result_selector = selector("div.result")?;
    let title_selector = selector("a.result__a")?;
    let snippet_selector = selector(".result__snippet")?;

    let mut hits = Vec::new();
    for result in document.select(&result_selector) {
        if hits.len() >= max_results {
            break;
        }
        if result.value().classes().any(|class| class == "result--ad") {
            continue;
        }
        let Some(anchor) = result.select(&title_selector).next() else {
            continue;
        };
        let Some(url) = anchor.value().attr("href").and_then(resolve_result_url) else {
            continue;
        };
        let body = result
            .select(&snippet_selector)
            .next()
            .map(|snippet| collapse_whitespace(snippet.text()))
            .unwrap_or_default();

        hits.push(SearchHit::Article(ArticleHit {
            title: collapse_whitespace(anchor.text()),
            url,
            body,
        }));
    }
    Ok(hits)
}
