//! The research pipeline.
//!
//! One research run flows through a fixed sequence of phases:
//!
//! 1. **Persona selection** ([`agent`]) - the fast model picks a
//!    specialist role for the report.
//! 2. **Context gathering** ([`gather`], [`orchestrator`]) - the query is
//!    decomposed into sub-queries, each gathered concurrently; discovered
//!    URLs are deduplicated across the fan-out through the session's
//!    visited set. Callers may instead supply seed URLs, which skips the
//!    search step entirely.
//! 3. **Budgeting** ([`context`]) - the merged context is shrunk by random
//!    eviction until it fits the prompt token budget.
//! 4. **Report generation + export** - the smart model writes the report;
//!    adapters render it to PDF and DOCX.
//!
//! Progress from every phase is streamed to the client through the
//! session channel; a disconnected client never cancels a run.

pub mod agent;
pub mod context;
pub mod gather;
pub mod orchestrator;
pub mod prompts;

pub use context::{count_tokens, ContentBlock, ResearchContext, SAFETY_MARGIN_TOKENS};
pub use gather::ContentGatherer;
pub use orchestrator::{token_budget, Researcher};
