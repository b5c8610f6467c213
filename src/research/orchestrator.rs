//! The research run: one query in, one report out.

use crate::config::ResearchConfig;
use crate::llm::{self, LLMClient};
use crate::rank::{self, ContextRanker};
use crate::report::{DocumentExporter, ExportAdapter, LlmReportGenerator, ReportGenerator};
use crate::research::agent;
use crate::research::context::{
    count_tokens, ContentBlock, ResearchContext, SAFETY_MARGIN_TOKENS,
};
use crate::research::gather::ContentGatherer;
use crate::research::prompts;
use crate::scrape::{self, Scraper};
use crate::search::{self, SearchRetriever};
use crate::session::{DeliveryMessage, ExportPaths, SessionChannel, UsageReport, VisitedUrls};
use crate::types::{ReportType, Result};
use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Arc;

/// Usable token budget for the serialized research context: the smart
/// model's window less room for the report itself, capped by the
/// configured prompt limit, less the safety margin.
pub fn token_budget(cfg: &ResearchConfig) -> usize {
    cfg.smart_token_max
        .saturating_sub(cfg.total_words * 2)
        .min(cfg.prompt_token_limit)
        .saturating_sub(SAFETY_MARGIN_TOKENS)
}

/// Drives one research run for a session: persona selection, concurrent
/// context gathering, token budgeting, report generation, export.
///
/// Collaborator failures propagate and terminate the run; there are no
/// retries at this layer. Client disconnects never cancel a run: the
/// session channel absorbs delivery failures and the run completes on its
/// own.
pub struct Researcher {
    query: String,
    report_type: ReportType,
    source_urls: Vec<String>,
    cfg: ResearchConfig,
    channel: Arc<SessionChannel>,
    visited: Arc<VisitedUrls>,
    retriever: Arc<dyn SearchRetriever>,
    scraper: Arc<dyn Scraper>,
    ranker: Arc<dyn ContextRanker>,
    fast_llm: Arc<dyn LLMClient>,
    generator: Arc<dyn ReportGenerator>,
    exporter: Arc<dyn ExportAdapter>,
}

impl Researcher {
    /// Wire a researcher with the production collaborators selected by the
    /// session config.
    pub fn from_config(
        query: String,
        report_type: ReportType,
        source_urls: Vec<String>,
        cfg: ResearchConfig,
        channel: Arc<SessionChannel>,
        output_dir: PathBuf,
    ) -> Result<Self> {
        let retriever = search::build_retriever(&cfg)?;
        let scraper = scrape::build_scraper(&cfg)?;
        let ranker = rank::build_ranker(&cfg)?;
        let fast_llm = llm::client_from_config(&cfg, &cfg.fast_llm_model)?;
        let smart_llm = llm::client_from_config(&cfg, &cfg.smart_llm_model)?;
        let generator = Arc::new(LlmReportGenerator::new(smart_llm, cfg.total_words));
        let exporter = Arc::new(DocumentExporter::new(output_dir));

        Ok(Self::with_collaborators(
            query,
            report_type,
            source_urls,
            cfg,
            channel,
            retriever,
            scraper,
            ranker,
            fast_llm,
            generator,
            exporter,
        ))
    }

    /// Full collaborator injection. Tests use this to substitute mocks.
    #[allow(clippy::too_many_arguments)]
    pub fn with_collaborators(
        query: String,
        report_type: ReportType,
        source_urls: Vec<String>,
        cfg: ResearchConfig,
        channel: Arc<SessionChannel>,
        retriever: Arc<dyn SearchRetriever>,
        scraper: Arc<dyn Scraper>,
        ranker: Arc<dyn ContextRanker>,
        fast_llm: Arc<dyn LLMClient>,
        generator: Arc<dyn ReportGenerator>,
        exporter: Arc<dyn ExportAdapter>,
    ) -> Self {
        Self {
            query,
            report_type,
            source_urls,
            cfg,
            channel,
            visited: Arc::new(VisitedUrls::new()),
            retriever,
            scraper,
            ranker,
            fast_llm,
            generator,
            exporter,
        }
    }

    /// Run the research to completion and return the report text.
    pub async fn run(&self) -> Result<String> {
        tracing::info!(query = %self.query, report_type = %self.report_type, "starting research run");

        let mut role = agent::select_agent(self.fast_llm.as_ref(), &self.query).await?;
        self.channel.send_log(role.name.clone());

        let context = if self.source_urls.is_empty() {
            self.context_by_search().await?
        } else {
            self.context_by_urls().await?
        };

        if self.report_type == ReportType::CustomReport {
            if let Some(custom_role) = &self.cfg.agent_role {
                role.role_prompt = custom_role.clone();
            }
        }
        self.channel.send_log(format!(
            "✍️ Writing {} for research task: {}...",
            self.report_type, self.query
        ));

        let budget = token_budget(&self.cfg);
        let gathered = context.len();
        let context = context.fit_to_budget(budget);
        tracing::info!(
            budget,
            kept = context.len(),
            gathered,
            "context fitted to token budget"
        );
        let prompt_tokens = context.token_count() + SAFETY_MARGIN_TOKENS;

        let report = self
            .generator
            .generate(
                &self.query,
                &context.serialize(),
                &role.role_prompt,
                self.report_type,
                &self.channel,
            )
            .await?;

        self.channel.send(DeliveryMessage::Usage(UsageReport {
            prompt_tokens,
            completion_tokens: count_tokens(&report),
            smart_llm_model: self.cfg.smart_llm_model.clone(),
        }));

        let pdf = self.exporter.to_pdf(&report).await?;
        let docx = self.exporter.to_docx(&report).await?;
        self.channel.send(DeliveryMessage::Path(ExportPaths {
            pdf: pdf.display().to_string(),
            docx: docx.display().to_string(),
        }));

        tracing::info!(query = %self.query, "research run finished");
        Ok(report)
    }

    /// Search mode: decompose the query, gather every sub-query
    /// concurrently, merge blocks in dispatch order.
    async fn context_by_search(&self) -> Result<ResearchContext> {
        let response = self
            .fast_llm
            .generate(&prompts::sub_queries_prompt(&self.query))
            .await?;
        let mut sub_queries = prompts::parse_string_list(&response, prompts::MAX_SUB_QUERIES);
        sub_queries.push(self.query.clone());

        self.channel.send_log(format!(
            "🧠 I will conduct my research based on the following queries: {:?}...",
            sub_queries
        ));

        let gatherer = self.gatherer();
        let blocks = try_join_all(sub_queries.iter().map(|q| gatherer.gather(q))).await?;
        Ok(ResearchContext::from_blocks(blocks))
    }

    /// URL mode: the caller supplied the sources; scrape them once and
    /// rank against the original query.
    async fn context_by_urls(&self) -> Result<ResearchContext> {
        let admitted = self.visited.admit_new(self.source_urls.iter().cloned());
        self.channel.send_log(format!(
            "🧠 I will conduct my research based on the following urls: {:?}...",
            admitted
        ));

        let pages = self.scraper.scrape(&admitted).await?;
        let excerpts = self
            .ranker
            .rank(&self.query, &pages, self.cfg.max_excerpts_per_query)
            .await?;

        Ok(ResearchContext::from_blocks(vec![ContentBlock {
            sub_query: self.query.clone(),
            content: excerpts.join("\n"),
            source_urls: admitted,
        }]))
    }

    fn gatherer(&self) -> ContentGatherer<'_> {
        ContentGatherer {
            retriever: self.retriever.as_ref(),
            scraper: self.scraper.as_ref(),
            ranker: self.ranker.as_ref(),
            visited: &self.visited,
            channel: &self.channel,
            max_search_results: self.cfg.max_search_results_per_query,
            max_excerpts: self.cfg.max_excerpts_per_query,
        }
    }
}
