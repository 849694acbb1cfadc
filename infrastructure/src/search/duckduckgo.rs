//! DuckDuckGo Instant Answer search
//!
//! The Instant Answer API needs no API key. It returns an abstract and a
//! list of related topics rather than a ranked result listing, which is
//! enough to ground a debate in a few citable sources.

use async_trait::async_trait;
use council_application::{SearchClient, SearchError};
use council_domain::ResearchSource;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Instant Answer API endpoint.
pub const DDG_API_URL: &str = "https://api.duckduckgo.com/";

/// [`SearchClient`] backed by the DuckDuckGo Instant Answer API.
pub struct DuckDuckGoSearch {
    http: reqwest::Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(timeout: Duration) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: DDG_API_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchClient for DuckDuckGoSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<ResearchSource>, SearchError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .header(
                "User-Agent",
                concat!("advisor-council/", env!("CARGO_PKG_VERSION")),
            )
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else {
                    SearchError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(SearchError::RequestFailed(format!(
                "Search API returned error: {}",
                response.status()
            )));
        }

        // The API answers with `application/x-javascript`, so decode by hand
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;
        let data: Value = serde_json::from_str(&body)
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        let sources = parse_instant_answer(&data, max_results);
        debug!("Search '{}' returned {} sources", query, sources.len());
        Ok(sources)
    }
}

/// Extract research sources from an Instant Answer response.
///
/// The abstract comes first when present, followed by related topics
/// (including topics nested inside category groups).
pub fn parse_instant_answer(data: &Value, max_results: usize) -> Vec<ResearchSource> {
    let mut sources = Vec::new();

    if let Some(text) = data["AbstractText"].as_str()
        && !text.is_empty()
    {
        let url = data["AbstractURL"].as_str().unwrap_or_default();
        let title = data["Heading"]
            .as_str()
            .filter(|h| !h.is_empty())
            .or(data["AbstractSource"].as_str())
            .unwrap_or(url);
        sources.extend(ResearchSource::new(title, url, text).normalized());
    }

    if let Some(topics) = data["RelatedTopics"].as_array() {
        for topic in topics {
            match topic["Topics"].as_array() {
                Some(group) => sources.extend(group.iter().filter_map(topic_source)),
                None => sources.extend(topic_source(topic)),
            }
        }
    }

    sources.truncate(max_results);
    sources
}

/// A related topic's `Text` reads "Title - description"; split it when it does.
fn topic_source(topic: &Value) -> Option<ResearchSource> {
    let text = topic["Text"].as_str()?;
    let url = topic["FirstURL"].as_str()?;
    let title = text.split(" - ").next().unwrap_or(text);
    ResearchSource::new(title, url, text).normalized()
}
