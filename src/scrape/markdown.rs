//! Markdown page scraper backed by daedra.

use crate::scrape::{ScrapedPage, Scraper};
use crate::types::Result;
use async_trait::async_trait;
use futures::future::join_all;

/// Fetches pages and converts them to markdown.
#[derive(Debug, Default)]
pub struct MarkdownScraper;

impl MarkdownScraper {
    pub fn new() -> Self {
        Self
    }

    async fn fetch_one(url: &str) -> Option<ScrapedPage> {
        let args = daedra::VisitPageArgs {
            url: url.to_string(),
            include_images: false,
            selector: None,
        };

        match daedra::tools::fetch::fetch_page(&args).await {
            Ok(page) => Some(ScrapedPage {
                url: page.url,
                title: page.title,
                content: page.content,
            }),
            Err(err) => {
                // Partial-failure tolerance: the URL is dropped, the
                // gather continues with whatever else was retrievable.
                tracing::warn!(url, error = %err, "failed to scrape url, dropping");
                None
            }
        }
    }
}

#[async_trait]
impl Scraper for MarkdownScraper {
    async fn scrape(&self, urls: &[String]) -> Result<Vec<ScrapedPage>> {
        let pages = join_all(urls.iter().map(|url| Self::fetch_one(url))).await;
        Ok(pages.into_iter().flatten().collect())
    }

    fn name(&self) -> &'static str {
        "markdown"
    }
}
