//! Gathered research context and the token budgeter.

use rand::Rng;
use std::sync::OnceLock;
use tiktoken_rs::CoreBPE;

/// Reserved token allowance subtracted from the usable prompt budget to
/// absorb estimation error.
pub const SAFETY_MARGIN_TOKENS: usize = 512;

static BPE: OnceLock<CoreBPE> = OnceLock::new();

fn bpe() -> &'static CoreBPE {
    // cl100k_base ships embedded in the crate; loading cannot fail at runtime.
    BPE.get_or_init(|| {
        tiktoken_rs::cl100k_base().expect("cl100k_base tokenizer loads from embedded data")
    })
}

/// Count tokens the way the report prompt will be billed.
pub fn count_tokens(text: &str) -> usize {
    bpe().encode_ordinary(text).len()
}

/// The gathered result of one sub-query. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub sub_query: String,
    /// Ranked, compressed excerpt text. May be empty when every discovered
    /// URL was already visited or failed to scrape.
    pub content: String,
    pub source_urls: Vec<String>,
}

impl ContentBlock {
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Ordered sequence of content blocks, one per sub-query, concatenated in
/// sub-query dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchContext {
    blocks: Vec<ContentBlock>,
}

impl ResearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self { blocks }
    }

    pub fn push(&mut self, block: ContentBlock) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The context as it will appear inside the report prompt.
    pub fn serialize(&self) -> String {
        self.blocks
            .iter()
            .filter(|block| !block.is_empty())
            .map(|block| block.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn token_count(&self) -> usize {
        count_tokens(&self.serialize())
    }

    /// Shrink the context until its serialized form fits within `limit`
    /// tokens, evicting one block at a time.
    ///
    /// Eviction is uniformly random: sub-query contributions carry no
    /// inherent recency or priority ordering, so unbiased removal avoids
    /// systematically starving any one sub-query. The result is either
    /// within the limit or empty, and never has more blocks than the input.
    pub fn fit_to_budget(mut self, limit: usize) -> Self {
        while !self.blocks.is_empty() && self.token_count() > limit {
            let evicted = rand::rng().random_range(0..self.blocks.len());
            let block = self.blocks.remove(evicted);
            tracing::debug!(
                sub_query = %block.sub_query,
                remaining = self.blocks.len(),
                "evicted content block to meet token budget"
            );
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn block(sub_query: &str, content: &str) -> ContentBlock {
        ContentBlock {
            sub_query: sub_query.to_string(),
            content: content.to_string(),
            source_urls: vec![],
        }
    }

    fn sample_context(blocks: usize, words_each: usize) -> ResearchContext {
        ResearchContext::from_blocks(
            (0..blocks)
                .map(|i| block(&format!("q{}", i), &"housing market data ".repeat(words_each)))
                .collect(),
        )
    }

    #[test]
    fn test_count_tokens_nonzero() {
        assert!(count_tokens("interest rates and housing") > 0);
        assert_eq!(count_tokens(""), 0);
    }

    #[test]
    fn test_serialize_skips_empty_blocks() {
        let context = ResearchContext::from_blocks(vec![
            block("a", "first"),
            block("b", ""),
            block("c", "second"),
        ]);
        assert_eq!(context.serialize(), "first\n\nsecond");
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(50)]
    #[case(500)]
    #[case(100_000)]
    fn test_fit_converges(#[case] limit: usize) {
        let fitted = sample_context(6, 100).fit_to_budget(limit);
        assert!(fitted.is_empty() || fitted.token_count() <= limit);
    }

    #[test]
    fn test_fit_never_grows() {
        let context = sample_context(8, 40);
        let before = context.len();
        let fitted = context.fit_to_budget(200);
        assert!(fitted.len() <= before);
    }

    #[test]
    fn test_fit_with_zero_limit_empties_context() {
        let fitted = sample_context(3, 10).fit_to_budget(0);
        assert!(fitted.is_empty());
    }

    #[test]
    fn test_fit_keeps_context_already_within_limit() {
        let context = sample_context(2, 5);
        let fitted = context.clone().fit_to_budget(1_000_000);
        assert_eq!(fitted, context);
    }

    #[test]
    fn test_fit_evicts_single_oversized_block() {
        // One block alone exceeding the limit is evicted like any other;
        // the legitimate outcome is an empty context.
        let context = ResearchContext::from_blocks(vec![block(
            "q",
            &"housing market data ".repeat(1_000),
        )]);
        let fitted = context.fit_to_budget(10);
        assert!(fitted.is_empty());
    }

    #[test]
    fn test_empty_context_fits_any_limit() {
        let fitted = ResearchContext::new().fit_to_budget(0);
        assert!(fitted.is_empty());
        assert_eq!(fitted.token_count(), 0);
    }
}
