//! OMDb API client
//!
//! Responses are validated into typed entities here; nothing past this
//! module sees raw JSON.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ReelError, Result};
use crate::types::{MovieDetail, MovieSummary, SearchResults};

pub const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

/// Read-only movie data provider
#[async_trait]
pub trait MovieSource: Send + Sync {
    /// Search titles; results keep the provider's ranking
    async fn search_by_title(&self, query: &str) -> Result<SearchResults>;

    /// Fetch the full record for one id
    async fn fetch_details(&self, id: &str) -> Result<MovieDetail>;
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ReelError::MissingApiKey);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: OMDB_BASE_URL.into(),
        })
    }

    /// Point the client at another host (mirrors, local fixtures)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str::<serde_json::Value>(&body);

        if status.is_success() {
            return parsed
                .map_err(|e| ReelError::Fetch(format!("Unexpected response from OMDb: {}", e)));
        }

        // OMDb reports a bad key as 401 with its usual error body
        let status_message = format!("HTTP {} from OMDb", status);
        debug!(%status, "OMDb returned an error status");
        if let Ok(data) = parsed {
            check_response(&data, &status_message)?;
        }
        Err(ReelError::Fetch(status_message))
    }
}

/// Build the search-by-title URL
fn build_search_url(base_url: &str, api_key: &str, query: &str) -> String {
    format!(
        "{}?apikey={}&s={}",
        base_url,
        urlencoding::encode(api_key),
        urlencoding::encode(query)
    )
}

/// Build the fetch-by-id URL (always asks for the full plot)
fn build_details_url(base_url: &str, api_key: &str, id: &str) -> String {
    format!(
        "{}?apikey={}&i={}&plot=full",
        base_url,
        urlencoding::encode(api_key),
        urlencoding::encode(id)
    )
}

/// Turn `Response: "False"` into a fetch error carrying the API's message
fn check_response(data: &serde_json::Value, fallback: &str) -> Result<()> {
    if data.get("Response").and_then(|r| r.as_str()) == Some("False") {
        let message = data
            .get("Error")
            .and_then(|e| e.as_str())
            .filter(|e| !e.is_empty())
            .unwrap_or(fallback);
        return Err(ReelError::Fetch(message.to_string()));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(data: serde_json::Value) -> Result<T> {
    serde_json::from_value(data)
        .map_err(|e| ReelError::Fetch(format!("Unexpected response from OMDb: {}", e)))
}

/// Parse a search response body
fn parse_search_results(data: serde_json::Value) -> Result<SearchResults> {
    #[derive(Deserialize)]
    struct SearchResponse {
        #[serde(rename = "Search", default)]
        search: Vec<MovieSummary>,
        #[serde(rename = "totalResults", default)]
        total_results: Option<String>,
    }

    check_response(&data, "Failed to fetch movies")?;
    let response: SearchResponse = decode(data)?;

    let total_results = response
        .total_results
        .as_deref()
        .and_then(|t| t.trim().parse().ok())
        .unwrap_or(0);

    // OMDb occasionally repeats an id within one page
    let mut seen = HashSet::new();
    let movies: Vec<MovieSummary> = response
        .search
        .into_iter()
        .filter(|m| seen.insert(m.id.clone()))
        .collect();

    Ok(SearchResults {
        movies,
        total_results,
    })
}

/// Parse a details response body
fn parse_movie_detail(data: serde_json::Value) -> Result<MovieDetail> {
    check_response(&data, "Failed to fetch movie details")?;
    decode(data)
}

#[async_trait]
impl MovieSource for OmdbClient {
    async fn search_by_title(&self, query: &str) -> Result<SearchResults> {
        if query.trim().is_empty() {
            return Err(ReelError::EmptyQuery);
        }

        debug!(query, "searching OMDb");
        let url = build_search_url(&self.base_url, &self.api_key, query);
        let results = self
            .get_json(&url)
            .await
            .and_then(parse_search_results)
            .inspect_err(|e| warn!(query, error = %e, "search failed"))?;

        debug!(
            query,
            returned = results.movies.len(),
            total = results.total_results,
            "search complete"
        );
        Ok(results)
    }

    async fn fetch_details(&self, id: &str) -> Result<MovieDetail> {
        debug!(id, "fetching details");
        let url = build_details_url(&self.base_url, &self.api_key, id);
        self.get_json(&url)
            .await
            .and_then(parse_movie_detail)
            .inspect_err(|e| warn!(id, error = %e, "details fetch failed"))
    }
}
