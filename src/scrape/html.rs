//! Raw HTML scraper: plain HTTP fetch plus text extraction.

use crate::scrape::{ScrapedPage, Scraper};
use crate::types::Result;
use async_trait::async_trait;
use futures::future::join_all;
use scraper::{Html, Selector};
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Fetches pages with reqwest and extracts readable text from the HTML.
pub struct HtmlScraper {
    client: reqwest::Client,
}

impl HtmlScraper {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    async fn fetch_one(&self, url: &str) -> Option<ScrapedPage> {
        let response = match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(url, status = %response.status(), "scrape rejected, dropping url");
                return None;
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "failed to scrape url, dropping");
                return None;
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(url, error = %err, "failed to read page body, dropping");
                return None;
            }
        };

        let (title, content) = extract_text(&body);
        if content.is_empty() {
            return None;
        }

        Some(ScrapedPage {
            url: url.to_string(),
            title,
            content,
        })
    }
}

impl Default for HtmlScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scraper for HtmlScraper {
    async fn scrape(&self, urls: &[String]) -> Result<Vec<ScrapedPage>> {
        let pages = join_all(urls.iter().map(|url| self.fetch_one(url))).await;
        Ok(pages.into_iter().flatten().collect())
    }

    fn name(&self) -> &'static str {
        "html"
    }
}

/// Pull the title and the visible prose out of an HTML document.
fn extract_text(body: &str) -> (String, String) {
    let document = Html::parse_document(body);

    let title = Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
        })
        .unwrap_or_default();

    let content = match Selector::parse("p, h1, h2, h3, h4, li, blockquote") {
        Ok(selector) => document
            .select(&selector)
            .map(|el| el.text().collect::<String>())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Err(_) => String::new(),
    };

    (title, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_pulls_prose() {
        let html = r#"
            <html>
              <head><title>Rates</title><style>p { color: red }</style></head>
              <body>
                <h1>Interest rates</h1>
                <p>Higher rates cool housing demand.</p>
                <script>var x = 1;</script>
              </body>
            </html>
        "#;
        let (title, content) = extract_text(html);
        assert_eq!(title, "Rates");
        assert!(content.contains("Interest rates"));
        assert!(content.contains("cool housing demand"));
        assert!(!content.contains("var x"));
    }

    #[test]
    fn test_extract_text_empty_document() {
        let (title, content) = extract_text("<html><body></body></html>");
        assert!(title.is_empty());
        assert!(content.is_empty());
    }
}
