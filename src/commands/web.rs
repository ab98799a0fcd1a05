//! Web search and browser commands

use serde::{Deserialize, Serialize};

use crate::response::CommandResponse;
use crate::{Error, Result};

/// Default search endpoint
const DEFAULT_ENDPOINT: &str = "https://google.serper.dev";

/// Search API request body
#[derive(Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
}

/// Search API response
#[derive(Deserialize)]
struct SearchResponse {
    organic: Option<Vec<OrganicResult>>,
}

#[derive(Deserialize)]
struct OrganicResult {
    snippet: Option<String>,
    title: String,
}

/// Performs web searches and opens websites in the default browser
pub struct WebSearcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl WebSearcher {
    /// Create a searcher. A missing API key still allows browser commands;
    /// answer-style searches fall back to opening the results page.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Override the endpoint base URL (tests)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Search the web and answer with the top snippet
    pub async fn search(&self, query: &str) -> CommandResponse {
        if self.api_key.is_none() {
            return self.open_results_page(query);
        }

        match self.request(query).await {
            Ok(snippet) => {
                CommandResponse::plain(format!("Here's what I found: {snippet}"))
            }
            Err(e) => {
                tracing::warn!(kind = e.kind_name(), query, "search request failed");
                CommandResponse::plain(format!(
                    "Sorry, I couldn't search for {query}. Try asking again."
                ))
            }
        }
    }

    /// Open a website in the default browser
    pub fn open_website(&self, website: &str) -> CommandResponse {
        let site = website.trim().trim_end_matches('.').to_lowercase();
        let url = if site.starts_with("http://") || site.starts_with("https://") {
            site.clone()
        } else if site.contains('.') {
            format!("https://{site}")
        } else {
            format!("https://www.{site}.com")
        };

        match open_in_browser(&url) {
            Ok(()) => CommandResponse::plain(format!("Opening {website}.")),
            Err(e) => {
                tracing::warn!(kind = e.kind_name(), url, "failed to open browser");
                CommandResponse::plain(format!(
                    "Sorry, I couldn't open {website}. Try asking again."
                ))
            }
        }
    }

    /// Open a YouTube search for the query
    pub fn search_youtube(&self, query: &str) -> CommandResponse {
        let url = format!(
            "https://www.youtube.com/results?search_query={}",
            urlencoding::encode(query)
        );
        match open_in_browser(&url) {
            Ok(()) => CommandResponse::plain(format!("Searching YouTube for {query}.")),
            Err(e) => {
                tracing::warn!(kind = e.kind_name(), query, "failed to open browser");
                CommandResponse::plain(format!(
                    "Sorry, I couldn't search YouTube for {query}. Try asking again."
                ))
            }
        }
    }

    fn open_results_page(&self, query: &str) -> CommandResponse {
        let url = format!(
            "https://www.google.com/search?q={}",
            urlencoding::encode(query)
        );
        match open_in_browser(&url) {
            Ok(()) => CommandResponse::plain(format!("Searching the web for {query}.")),
            Err(e) => {
                tracing::warn!(kind = e.kind_name(), query, "failed to open browser");
                CommandResponse::plain(format!(
                    "Sorry, I couldn't search for {query}. Try asking again."
                ))
            }
        }
    }

    /// One search request returning the top result snippet
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, a
    /// missing key, or an empty result set.
    pub async fn request(&self, query: &str) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or(Error::Api {
            service: "search",
            message: "no search API key configured".to_string(),
        })?;

        let response = self
            .client
            .post(format!("{}/search", self.endpoint))
            .header("X-API-KEY", api_key)
            .json(&SearchRequest { q: query, num: 3 })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                service: "search",
                message: format!("status {status}: {body}"),
            });
        }

        let result: SearchResponse = response.json().await?;
        result
            .organic
            .unwrap_or_default()
            .into_iter()
            .find_map(|r| r.snippet.or(Some(r.title)))
            .ok_or(Error::Api {
                service: "search",
                message: "no results returned".to_string(),
            })
    }
}

/// Hand a URL to the platform's default opener
fn open_in_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = std::process::Command::new("open");
        c.arg(url);
        c
    };

    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    };

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = {
        let mut c = std::process::Command::new("xdg-open");
        c.arg(url);
        c
    };

    command.spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_without_key_never_calls_api() {
        // Points at an unroutable endpoint; a network attempt would error
        // rather than produce the browser fallback response.
        let searcher =
            WebSearcher::new(None).with_endpoint("http://127.0.0.1:1");
        let response = searcher.request("rust").await;
        assert!(response.is_err());
    }
}
