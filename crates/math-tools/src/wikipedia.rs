//! Wikipedia Lookup
//!
//! Searches the MediaWiki API and returns plain-text summaries of the top
//! matching pages.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

/// Reply when the search yields nothing usable
pub const NO_RESULT: &str = "No good Wikipedia Search Result was found";

/// Longest query forwarded to the search API
const MAX_QUERY_CHARS: usize = 300;

/// Wikipedia client configuration
#[derive(Clone, Debug)]
pub struct WikipediaConfig {
    /// MediaWiki `api.php` endpoint
    pub api_url: String,

    /// Number of pages summarised per lookup
    pub top_k_results: usize,

    /// Cap on the rendered reply, in characters
    pub max_chars: usize,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            api_url: "https://en.wikipedia.org/w/api.php".into(),
            top_k_results: 3,
            max_chars: 4000,
            timeout_secs: 30,
        }
    }
}

impl WikipediaConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: std::env::var("WIKIPEDIA_API_URL").unwrap_or(defaults.api_url),
            top_k_results: std::env::var("WIKIPEDIA_TOP_K")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.top_k_results),
            max_chars: std::env::var("WIKIPEDIA_MAX_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_chars),
            ..defaults
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    extract: Option<String>,
}

/// A page title with its summary
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageSummary {
    pub title: String,
    pub summary: String,
}

/// HTTP client for the MediaWiki API
#[derive(Clone, Debug)]
pub struct WikipediaClient {
    http: reqwest::Client,
    config: WikipediaConfig,
}

impl WikipediaClient {
    pub fn new(config: WikipediaConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("math-tools/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &WikipediaConfig {
        &self.config
    }

    /// Search and render summaries of the top pages
    pub async fn lookup(&self, query: &str) -> Result<String> {
        let query: String = query.trim().chars().take(MAX_QUERY_CHARS).collect();
        if query.is_empty() {
            return Ok(NO_RESULT.to_string());
        }

        let titles = self.search_titles(&query).await?;
        tracing::debug!(query = %query, hits = titles.len(), "Wikipedia search");

        let mut pages = Vec::new();
        for title in titles {
            if let Some(page) = self.page_summary(&title).await? {
                pages.push(page);
            }
        }

        if pages.is_empty() {
            return Ok(NO_RESULT.to_string());
        }
        Ok(render_pages(&pages, self.config.max_chars))
    }

    async fn search_titles(&self, query: &str) -> Result<Vec<String>> {
        let limit = self.config.top_k_results.to_string();
        let response: SearchResponse = self
            .http
            .get(&self.config.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("format", "json"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(search_titles_from(response, self.config.top_k_results))
    }

    async fn page_summary(&self, title: &str) -> Result<Option<PageSummary>> {
        let response: ExtractResponse = self
            .http
            .get(&self.config.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("format", "json"),
                ("titles", title),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(summary_from(response))
    }
}

fn search_titles_from(response: SearchResponse, limit: usize) -> Vec<String> {
    response
        .query
        .unwrap_or_default()
        .search
        .into_iter()
        .take(limit)
        .map(|hit| hit.title)
        .collect()
}

fn summary_from(response: ExtractResponse) -> Option<PageSummary> {
    response
        .query
        .unwrap_or_default()
        .pages
        .into_values()
        .find_map(|page| {
            let summary = page.extract?.trim().to_string();
            (!summary.is_empty()).then_some(PageSummary {
                title: page.title,
                summary,
            })
        })
}

/// `Page: ..\nSummary: ..` blocks separated by blank lines, capped at `max_chars`
pub fn render_pages(pages: &[PageSummary], max_chars: usize) -> String {
    let rendered = pages
        .iter()
        .map(|p| format!("Page: {}\nSummary: {}", p.title, p.summary))
        .collect::<Vec<_>>()
        .join("\n\n");

    rendered.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, summary: &str) -> PageSummary {
        PageSummary {
            title: title.into(),
            summary: summary.into(),
        }
    }

    #[test]
    fn test_render_pages() {
        let pages = [page("Rust", "A language."), page("Ferris", "A crab.")];
        assert_eq!(
            render_pages(&pages, 4000),
            "Page: Rust\nSummary: A language.\n\nPage: Ferris\nSummary: A crab."
        );
        assert_eq!(render_pages(&pages, 10), "Page: Rust");
    }

    #[test]
    fn test_render_truncates_on_char_boundary() {
        let pages = [page("Zürich", "Stadt")];
        assert_eq!(render_pages(&pages, 10), "Page: Züri");
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{"batchcomplete":"","query":{"searchinfo":{"totalhits":2},
            "search":[{"ns":0,"title":"Exponentiation","pageid":1},
                      {"ns":0,"title":"Power (physics)","pageid":2}]}}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            search_titles_from(response, 1),
            vec!["Exponentiation".to_string()]
        );

        let empty: SearchResponse = serde_json::from_str(r#"{"batchcomplete":""}"#).unwrap();
        assert!(search_titles_from(empty, 3).is_empty());
    }

    #[test]
    fn test_parse_extract_response() {
        let json = r#"{"query":{"pages":{"42":{"pageid":42,"title":"Exponentiation",
            "extract":"  In mathematics, exponentiation is an operation.  "}}}}"#;
        let response: ExtractResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            summary_from(response),
            Some(page("Exponentiation", "In mathematics, exponentiation is an operation."))
        );

        let missing = r#"{"query":{"pages":{"-1":{"title":"Nope","missing":""}}}}"#;
        let response: ExtractResponse = serde_json::from_str(missing).unwrap();
        assert!(summary_from(response).is_none());
    }

    #[tokio::test]
    async fn test_blank_query_skips_network() {
        let client = WikipediaClient::new(WikipediaConfig {
            api_url: "http://127.0.0.1:9/unreachable".into(),
            ..WikipediaConfig::default()
        })
        .unwrap();

        assert_eq!(client.lookup("   ").await.unwrap(), NO_RESULT);
    }

    #[test]
    fn test_config_defaults() {
        let config = WikipediaConfig::default();
        assert_eq!(config.top_k_results, 3);
        assert_eq!(config.max_chars, 4000);
    }
}
