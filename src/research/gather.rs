//! Per-sub-query content gathering.

use crate::rank::ContextRanker;
use crate::research::context::ContentBlock;
use crate::scrape::Scraper;
use crate::search::SearchRetriever;
use crate::session::{SessionChannel, VisitedUrls};
use crate::types::Result;

/// Runs the gather pipeline for one sub-query: search, dedup-admit,
/// scrape, rank, emit progress. Many gatherers run concurrently per
/// session; the visited set and the channel are the only shared state.
pub struct ContentGatherer<'a> {
    pub retriever: &'a dyn SearchRetriever,
    pub scraper: &'a dyn Scraper,
    pub ranker: &'a dyn ContextRanker,
    pub visited: &'a VisitedUrls,
    pub channel: &'a SessionChannel,
    pub max_search_results: usize,
    pub max_excerpts: usize,
}

impl ContentGatherer<'_> {
    /// Gather content for one sub-query.
    ///
    /// URLs already claimed by a concurrent gather are skipped; a
    /// sub-query whose every discovered URL was already visited still
    /// ranks an empty document set and returns an empty block. Individual
    /// scrape failures shrink the result, they never abort the gather.
    pub async fn gather(&self, sub_query: &str) -> Result<ContentBlock> {
        self.channel
            .send_log(format!("\n🔎 Running research for '{}'...", sub_query));

        let hits = self
            .retriever
            .search(sub_query, self.max_search_results)
            .await?;
        let candidate_urls = hits
            .into_iter()
            .map(|hit| hit.href)
            .filter(|href| !href.is_empty());

        let admitted = self.visited.admit_new(candidate_urls);
        for url in &admitted {
            self.channel
                .send_log(format!("✅ Adding source url to research: {}\n", url));
        }

        self.channel
            .send_log("🤔 Researching for relevant information...\n");
        let pages = self.scraper.scrape(&admitted).await?;

        self.channel.send_log(format!(
            "📃 Getting relevant content based on query: {}...",
            sub_query
        ));
        let excerpts = self
            .ranker
            .rank(sub_query, &pages, self.max_excerpts)
            .await?;

        let block = ContentBlock {
            sub_query: sub_query.to_string(),
            content: excerpts.join("\n"),
            source_urls: admitted,
        };

        // Emitted only once the block is fully assembled, so a client
        // never observes partial content for this sub-query.
        self.channel.send_log(format!("📃 {}", block.content));
        Ok(block)
    }
}
