//! Page content retrieval.
//!
//! A scraper turns admitted URLs into page text. Individual URLs that fail
//! to retrieve are dropped from the result set rather than failing the
//! gather; a sub-query proceeds with whatever content was retrievable,
//! even none.

pub mod html;
pub mod markdown;

use crate::config::ResearchConfig;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Retrieved content of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub content: String,
}

/// A page-content retriever. Failures of individual URLs are absorbed;
/// an `Err` means the scraper itself is unusable.
#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, urls: &[String]) -> Result<Vec<ScrapedPage>>;

    fn name(&self) -> &'static str;
}

/// Supported scraper backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScraperKind {
    /// Fetch pages converted to markdown.
    #[default]
    Markdown,
    /// Raw HTML fetch with text extraction.
    Html,
}

impl FromStr for ScraperKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" => Ok(Self::Markdown),
            "html" | "raw" => Ok(Self::Html),
            _ => Err(AppError::Config(format!(
                "Unknown scraper: {}. Use one of: markdown, html",
                s
            ))),
        }
    }
}

/// Construct the scraper selected by the session config.
pub fn build_scraper(cfg: &ResearchConfig) -> Result<Arc<dyn Scraper>> {
    match cfg.scraper {
        ScraperKind::Markdown => Ok(Arc::new(markdown::MarkdownScraper::new())),
        ScraperKind::Html => Ok(Arc::new(html::HtmlScraper::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraper_kind_from_str() {
        assert_eq!("markdown".parse::<ScraperKind>().unwrap(), ScraperKind::Markdown);
        assert_eq!("raw".parse::<ScraperKind>().unwrap(), ScraperKind::Html);
        assert!("headless".parse::<ScraperKind>().is_err());
    }
}
