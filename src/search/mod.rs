//! Web search retrievers.
//!
//! A retriever turns a sub-query into a bounded list of candidate result
//! URLs. The pipeline never scrapes a retriever result directly; hits are
//! filtered through the session's visited-URL set first.

pub mod duckduckgo;
pub mod tavily;

use crate::config::ResearchConfig;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub href: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

/// A search provider. `search` returns at most `max_results` hits.
#[async_trait]
pub trait SearchRetriever: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;

    fn name(&self) -> &'static str;
}

/// Supported search providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetrieverKind {
    /// DuckDuckGo, keyless.
    #[default]
    Duckduckgo,
    /// Tavily search API, requires `TAVILY_API_KEY`.
    Tavily,
}

impl FromStr for RetrieverKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "duckduckgo" | "ddg" => Ok(Self::Duckduckgo),
            "tavily" => Ok(Self::Tavily),
            _ => Err(AppError::Config(format!(
                "Unknown retriever: {}. Use one of: duckduckgo, tavily",
                s
            ))),
        }
    }
}

/// Construct the retriever selected by the session config.
pub fn build_retriever(cfg: &ResearchConfig) -> Result<Arc<dyn SearchRetriever>> {
    match cfg.retriever {
        RetrieverKind::Duckduckgo => Ok(Arc::new(duckduckgo::DuckDuckGoRetriever::new())),
        RetrieverKind::Tavily => {
            let api_key = std::env::var("TAVILY_API_KEY")
                .map_err(|_| AppError::Config("TAVILY_API_KEY is not set".to_string()))?;
            Ok(Arc::new(tavily::TavilyRetriever::new(api_key)))
        }
    }
}
