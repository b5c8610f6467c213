//! Tavily search API client.

use crate::search::{SearchHit, SearchRetriever};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const TAVILY_API_BASE: &str = "https://api.tavily.com";

/// Search retriever backed by the Tavily API.
pub struct TavilyRetriever {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

impl TavilyRetriever {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, TAVILY_API_BASE.to_string())
    }

    /// Point the client at a different endpoint. Used by tests.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl SearchRetriever for TavilyRetriever {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let body = json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": max_results,
        });

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Retriever(format!("Tavily request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Retriever(format!(
                "Tavily returned {}",
                response.status()
            )));
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| AppError::Retriever(format!("Tavily response malformed: {}", e)))?;

        Ok(parsed
            .results
            .into_iter()
            .take(max_results)
            .map(|r| SearchHit {
                href: r.url,
                title: r.title,
                snippet: r.content,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "tavily"
    }
}
