//! Lexical chunk ranking.
//!
//! Pages are split into fixed-size chunks, each chunk is scored by
//! term-frequency cosine similarity against the query, and the top chunks
//! become the excerpts for that sub-query.

use crate::rank::ContextRanker;
use crate::scrape::ScrapedPage;
use crate::types::Result;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use text_splitter::{ChunkConfig, TextSplitter};

/// Chunk size in characters. Pages are scored chunk-by-chunk so one long
/// irrelevant page cannot drown out a short relevant one.
const CHUNK_CHARS: usize = 1_000;

/// Tokens shorter than this carry no signal and are skipped.
const MIN_TERM_LEN: usize = 3;

pub struct LexicalRanker {
    splitter: TextSplitter<text_splitter::Characters>,
}

impl LexicalRanker {
    pub fn new() -> Self {
        Self {
            splitter: TextSplitter::new(ChunkConfig::new(CHUNK_CHARS)),
        }
    }
}

impl Default for LexicalRanker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContextRanker for LexicalRanker {
    async fn rank(
        &self,
        query: &str,
        pages: &[ScrapedPage],
        max_results: usize,
    ) -> Result<Vec<String>> {
        let query_terms = term_frequencies(query);
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(f32, String)> = Vec::new();
        for page in pages {
            for chunk in self.splitter.chunks(&page.content) {
                let score = cosine(&query_terms, &term_frequencies(chunk));
                if score > 0.0 {
                    scored.push((score, chunk.to_string()));
                }
            }
        }

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(max_results);

        Ok(scored.into_iter().map(|(_, chunk)| chunk).collect())
    }

    fn name(&self) -> &'static str {
        "lexical"
    }
}

fn term_frequencies(text: &str) -> HashMap<String, f32> {
    let mut frequencies = HashMap::new();
    for term in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.len() >= MIN_TERM_LEN)
    {
        *frequencies.entry(term.to_lowercase()).or_insert(0.0) += 1.0;
    }
    frequencies
}

fn cosine(a: &HashMap<String, f32>, b: &HashMap<String, f32>) -> f32 {
    let dot: f32 = a
        .iter()
        .filter_map(|(term, weight)| b.get(term).map(|other| weight * other))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }

    let norm = |m: &HashMap<String, f32>| m.values().map(|w| w * w).sum::<f32>().sqrt();
    dot / (norm(a) * norm(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, content: &str) -> ScrapedPage {
        ScrapedPage {
            url: url.to_string(),
            title: String::new(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_rank_prefers_relevant_content() {
        let ranker = LexicalRanker::new();
        let pages = vec![
            page("https://a.example", "Cooking pasta requires salted boiling water."),
            page(
                "https://b.example",
                "Rising interest rates increase mortgage costs and cool housing demand.",
            ),
        ];

        let excerpts = ranker
            .rank("impact of interest rates on housing", &pages, 1)
            .await
            .unwrap();
        assert_eq!(excerpts.len(), 1);
        assert!(excerpts[0].contains("mortgage costs"));
    }

    #[tokio::test]
    async fn test_rank_empty_pages_yields_empty() {
        let ranker = LexicalRanker::new();
        let excerpts = ranker.rank("anything", &[], 4).await.unwrap();
        assert!(excerpts.is_empty());
    }

    #[tokio::test]
    async fn test_rank_bounded_by_max_results() {
        let ranker = LexicalRanker::new();
        let pages: Vec<ScrapedPage> = (0..10)
            .map(|i| {
                page(
                    &format!("https://site-{}.example", i),
                    &format!("housing market report number {}", i),
                )
            })
            .collect();

        let excerpts = ranker.rank("housing market", &pages, 4).await.unwrap();
        assert_eq!(excerpts.len(), 4);
    }

    #[test]
    fn test_cosine_orthogonal_terms() {
        let a = term_frequencies("alpha beta");
        let b = term_frequencies("gamma delta");
        assert_eq!(cosine(&a, &b), 0.0);
    }

    #[test]
    fn test_term_frequencies_skips_short_terms() {
        let terms = term_frequencies("of on it housing");
        assert!(terms.contains_key("housing"));
        assert!(!terms.contains_key("of"));
    }
}
