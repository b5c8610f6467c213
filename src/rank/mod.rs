//! Content relevance ranking.
//!
//! A ranker reduces scraped pages to the excerpts most relevant to a
//! sub-query, bounded by a per-query excerpt budget. The trait seam is
//! async so embedding-backed implementations can slot in; the default
//! implementation is a local lexical ranker.

pub mod lexical;

use crate::config::ResearchConfig;
use crate::scrape::ScrapedPage;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Reduces pages to the top excerpts for a query.
#[async_trait]
pub trait ContextRanker: Send + Sync {
    /// Return at most `max_results` excerpts, most relevant first. An
    /// empty page set yields an empty result, not an error.
    async fn rank(
        &self,
        query: &str,
        pages: &[ScrapedPage],
        max_results: usize,
    ) -> Result<Vec<String>>;

    fn name(&self) -> &'static str;
}

/// Supported ranker backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RankerKind {
    /// Term-frequency cosine ranking over fixed-size chunks.
    #[default]
    Lexical,
}

impl FromStr for RankerKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lexical" => Ok(Self::Lexical),
            _ => Err(AppError::Config(format!(
                "Unknown ranker: {}. Use: lexical",
                s
            ))),
        }
    }
}

/// Construct the ranker selected by the session config.
pub fn build_ranker(cfg: &ResearchConfig) -> Result<Arc<dyn ContextRanker>> {
    match cfg.ranker {
        RankerKind::Lexical => Ok(Arc::new(lexical::LexicalRanker::new())),
    }
}
