//! Mock collaborators for integration tests.
//!
//! Hand-written mocks keyed to the pipeline's seams: a scripted LLM, a
//! canned search retriever, a scraper with a configurable failure set,
//! a pass-through ranker and a frame-recording message sink.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use magellan::llm::LLMClient;
use magellan::rank::ContextRanker;
use magellan::scrape::{ScrapedPage, Scraper};
use magellan::search::{SearchHit, SearchRetriever};
use magellan::session::MessageSink;
use magellan::types::{AppError, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

// ============= Message Sink =============

/// Records every frame the delivery task writes.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub frames: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let sink = Self::default();
        let frames = Arc::clone(&sink.frames);
        (sink, frames)
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.frames.lock().push(text);
        Ok(())
    }
}

/// Parse recorded frames into `(type, output)` pairs.
pub fn parsed_frames(frames: &[String]) -> Vec<(String, serde_json::Value)> {
    frames
        .iter()
        .map(|frame| {
            let value: serde_json::Value = serde_json::from_str(frame).expect("frame is JSON");
            (
                value["type"].as_str().expect("frame has a type").to_string(),
                value["output"].clone(),
            )
        })
        .collect()
}

// ============= LLM =============

/// Scripted LLM: fixed sub-query decomposition, persona proposal and
/// report text. Records every prompt it receives.
pub struct MockLlm {
    pub sub_queries: Vec<String>,
    pub agent_json: String,
    pub report: String,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl MockLlm {
    pub fn new(sub_queries: &[&str], report: &str) -> Self {
        Self {
            sub_queries: sub_queries.iter().map(|s| s.to_string()).collect(),
            agent_json: r#"{"agent": "💰 Finance Agent", "agent_role_prompt": "You are a finance analyst."}"#
                .to_string(),
            report: report.to_string(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl LLMClient for MockLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        serde_json::to_string(&self.sub_queries)
            .map_err(|e| AppError::Llm(e.to_string()))
    }

    async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.agent_json.clone())
    }

    async fn stream_with_system(
        &self,
        _system: &str,
        prompt: &str,
    ) -> Result<Box<dyn futures::Stream<Item = Result<String>> + Send + Unpin>> {
        self.prompts.lock().push(prompt.to_string());

        // Split the report into chunks for streaming simulation.
        let chunks: Vec<String> = self
            .report
            .chars()
            .collect::<Vec<_>>()
            .chunks(5)
            .map(|c| c.iter().collect())
            .collect();
        Ok(Box::new(stream::iter(chunks.into_iter().map(Ok)).boxed()))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

// ============= Search Retriever =============

/// Returns canned hits per query; unknown queries yield no hits.
#[derive(Default)]
pub struct MockRetriever {
    pub hits: HashMap<String, Vec<SearchHit>>,
}

impl MockRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_urls(mut self, query: &str, urls: &[&str]) -> Self {
        let hits = urls
            .iter()
            .map(|url| SearchHit {
                href: url.to_string(),
                title: String::new(),
                snippet: String::new(),
            })
            .collect();
        self.hits.insert(query.to_string(), hits);
        self
    }
}

#[async_trait]
impl SearchRetriever for MockRetriever {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        Ok(self
            .hits
            .get(query)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .take(max_results)
            .collect())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// A retriever whose every search fails.
pub struct FailingRetriever;

#[async_trait]
impl SearchRetriever for FailingRetriever {
    async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchHit>> {
        Err(AppError::Retriever("search backend unreachable".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

// ============= Scraper =============

/// Serves canned page content per URL. URLs in the failure set (or with
/// no canned content) are silently dropped, like a real scrape failure.
/// Every invocation's URL list is recorded.
#[derive(Default)]
pub struct MockScraper {
    pub content: HashMap<String, String>,
    pub failing: HashSet<String>,
    pub calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, content: &str) -> Self {
        self.content.insert(url.to_string(), content.to_string());
        self
    }

    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }
}

#[async_trait]
impl Scraper for MockScraper {
    async fn scrape(&self, urls: &[String]) -> Result<Vec<ScrapedPage>> {
        self.calls.lock().push(urls.to_vec());
        Ok(urls
            .iter()
            .filter(|url| !self.failing.contains(*url))
            .filter_map(|url| {
                self.content.get(url).map(|content| ScrapedPage {
                    url: url.clone(),
                    title: String::new(),
                    content: content.clone(),
                })
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// ============= Ranker =============

/// Passes page contents through as excerpts, bounded by `max_results`.
pub struct PassthroughRanker;

#[async_trait]
impl ContextRanker for PassthroughRanker {
    async fn rank(
        &self,
        _query: &str,
        pages: &[ScrapedPage],
        max_results: usize,
    ) -> Result<Vec<String>> {
        Ok(pages
            .iter()
            .take(max_results)
            .map(|page| page.content.clone())
            .collect())
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}
