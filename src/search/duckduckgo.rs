//! DuckDuckGo search via daedra.

use crate::search::{SearchHit, SearchRetriever};
use crate::types::{AppError, Result};
use async_trait::async_trait;

/// Keyless web search backed by DuckDuckGo.
#[derive(Debug, Default)]
pub struct DuckDuckGoRetriever;

impl DuckDuckGoRetriever {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchRetriever for DuckDuckGoRetriever {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: max_results,
                ..Default::default()
            }),
        };

        let response = daedra::tools::search::perform_search(&args)
            .await
            .map_err(|e| AppError::Retriever(format!("DuckDuckGo search failed: {}", e)))?;

        Ok(response
            .data
            .iter()
            .take(max_results)
            .map(|r| SearchHit {
                href: r.url.clone(),
                title: r.title.clone(),
                snippet: r.description.clone(),
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}
