use crate::config::SearchSettings;
use crate::models::RawResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors from a single search query
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("search API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("search provider is not configured")]
    NotConfigured,
}

/// Web search provider
///
/// `try_search` may fail; `search` never does. A failing query is logged and
/// contributes no results so one bad query cannot abort a request.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    async fn try_search(&self, query: &str) -> Result<Vec<RawResult>, SearchError>;

    async fn search(&self, query: &str) -> Vec<RawResult> {
        match self.try_search(query).await {
            Ok(results) => {
                tracing::debug!(query, results = results.len(), "search query completed");
                results
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "search query failed, skipping");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Google Custom Search JSON API client
pub struct GoogleSearchClient {
    endpoint: String,
    api_key: String,
    engine_id: String,
    num: u8,
    country: String,
    language: String,
    client: Client,
}

impl GoogleSearchClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        engine_id: String,
        results_per_query: u8,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            engine_id,
            num: results_per_query.clamp(1, 10),
            country: "us".to_string(),
            language: "en".to_string(),
            client,
        })
    }

    /// Build a client from settings; `NotConfigured` without credentials
    pub fn from_settings(settings: &SearchSettings) -> Result<Self, SearchError> {
        let (api_key, engine_id) = settings.credentials().ok_or(SearchError::NotConfigured)?;
        let mut client = Self::new(
            settings.endpoint.clone(),
            api_key.to_string(),
            engine_id.to_string(),
            settings.results_per_query,
            Duration::from_secs(settings.timeout_secs),
        )?;
        client.country = settings.country.clone();
        client.language = settings.language.clone();
        Ok(client)
    }

    fn request_url(&self, query: &str) -> String {
        format!(
            "{}?key={}&cx={}&q={}&num={}&gl={}&hl={}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.engine_id),
            urlencoding::encode(query),
            self.num,
            urlencoding::encode(&self.country),
            urlencoding::encode(&self.language),
        )
    }
}

#[async_trait]
impl SearchGateway for GoogleSearchClient {
    async fn try_search(&self, query: &str) -> Result<Vec<RawResult>, SearchError> {
        tracing::debug!(query, "Running search query");

        let response = self.client.get(self.request_url(query)).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| SearchError::InvalidResponse(format!("Failed to parse results: {}", e)))?;

        Ok(parsed
            .items
            .into_iter()
            .filter_map(|item| {
                let link = item.link.filter(|l| !l.trim().is_empty())?;
                Some(RawResult::new(item.title, item.snippet, link))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str, num: u8) -> GoogleSearchClient {
        GoogleSearchClient::new(
            endpoint.to_string(),
            "k e y".to_string(),
            "cx".to_string(),
            num,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_request_url_encodes_and_clamps() {
        let url = client("https://search.example/v1/", 50).request_url("\"Uniqlo tee\" fit");
        assert_eq!(
            url,
            "https://search.example/v1?key=k%20e%20y&cx=cx&q=%22Uniqlo%20tee%22%20fit&num=10&gl=us&hl=en"
        );
        assert!(client("https://s", 0).request_url("q").contains("num=1&"));
    }

    #[test]
    fn test_from_settings_requires_credentials() {
        let settings = SearchSettings::default();
        assert!(matches!(
            GoogleSearchClient::from_settings(&settings),
            Err(SearchError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_parses_items_and_drops_missing_links() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/customsearch")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"items":[
                    {"title":"Fit","snippet":"runs small","link":"https://reddit.com/a"},
                    {"title":"No link","snippet":"dropped"}
                ]}"#,
            )
            .create_async()
            .await;

        let search = client(&format!("{}/customsearch", server.url()), 10);
        let results = search.try_search("everlane fit").await.unwrap();
        mock.assert_async().await;

        assert_eq!(results, vec![RawResult::new("Fit", "runs small", "https://reddit.com/a")]);
    }

    #[tokio::test]
    async fn test_missing_items_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/customsearch")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"kind":"customsearch#search"}"#)
            .create_async()
            .await;

        let search = client(&format!("{}/customsearch", server.url()), 10);
        assert!(search.try_search("obscure").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_skipped_by_search() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/customsearch")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error":{"code":429,"message":"Quota exceeded"}}"#)
            .create_async()
            .await;

        let search = client(&format!("{}/customsearch", server.url()), 10);
        match search.try_search("q").await {
            Err(SearchError::ApiError { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "Quota exceeded");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
        assert!(search.search("q").await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/customsearch")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let search = client(&format!("{}/customsearch", server.url()), 10);
        assert!(matches!(
            search.try_search("q").await,
            Err(SearchError::InvalidResponse(_))
        ));
    }
}
