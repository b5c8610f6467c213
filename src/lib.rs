//! # Magellan - Autonomous Deep Research Server
//!
//! Magellan accepts a research task over a persistent WebSocket
//! connection, decomposes it into sub-queries, gathers and deduplicates
//! web content for every sub-query concurrently, compresses the gathered
//! context against a hard token budget, and streams progress plus the
//! final report back to the client.
//!
//! ## Overview
//!
//! Magellan can be used in two ways:
//!
//! 1. **As a standalone server** - run the `magellan-server` binary and
//!    connect a client to `/ws`
//! 2. **As a library** - drive [`research::Researcher`] directly with your
//!    own collaborators
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use magellan::config::ResearchConfig;
//! use magellan::research::Researcher;
//! use magellan::session::SessionChannel;
//! use magellan::types::ReportType;
//! use std::sync::Arc;
//!
//! let channel = Arc::new(SessionChannel::open(Box::new(my_sink)));
//! let researcher = Researcher::from_config(
//!     "impact of interest rates on housing".to_string(),
//!     ReportType::ResearchReport,
//!     Vec::new(),
//!     ResearchConfig::default(),
//!     channel,
//!     "outputs".into(),
//! )?;
//! let report = researcher.run().await?;
//! ```
//!
//! ## Architecture
//!
//! - [`session`] - per-connection delivery channel and visited-URL set
//! - [`research`] - orchestrator, concurrent gatherers, token budgeter
//! - [`search`] / [`scrape`] / [`rank`] - pluggable web collaborators
//! - [`llm`] / [`report`] - model clients, report generation and export
//! - [`api`] - WebSocket endpoint and static file surface
//!
//! Collaborators sit behind trait seams (`SearchRetriever`, `Scraper`,
//! `ContextRanker`, `LLMClient`, `ReportGenerator`, `ExportAdapter`), so
//! tests and embedders can substitute their own implementations.

/// WebSocket endpoint and static routes.
pub mod api;
/// Server and research-session configuration.
pub mod config;
/// LLM provider clients and abstractions.
pub mod llm;
/// Content relevance ranking.
pub mod rank;
/// Report generation and document export.
pub mod report;
/// The research pipeline: orchestrator, gatherers, budgeter.
pub mod research;
/// Page content retrieval.
pub mod scrape;
/// Web search retrievers.
pub mod search;
/// Per-connection session state.
pub mod session;
/// Core types and error handling.
pub mod types;

// Re-export commonly used types
pub use config::{ResearchConfig, ServerConfig, Settings};
pub use llm::LLMClient;
pub use rank::ContextRanker;
pub use report::{ExportAdapter, ReportGenerator};
pub use research::{ContentBlock, Researcher, ResearchContext};
pub use scrape::Scraper;
pub use search::SearchRetriever;
pub use session::{DeliveryMessage, SessionChannel, VisitedUrls};
pub use types::{AppError, ReportType, Result, StartCommand};

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Process-level server configuration.
    pub server: Arc<ServerConfig>,
    /// Default research parameters for sessions that bring no config of
    /// their own.
    pub research_defaults: Arc<ResearchConfig>,
}
