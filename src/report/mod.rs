//! Report generation and export.
//!
//! The generator turns the budgeted context into report text via the smart
//! model, streaming chunks to the session channel as they arrive. The
//! export adapters render the finished markdown into distributable
//! documents.

pub mod export;

use crate::llm::LLMClient;
use crate::research::prompts;
use crate::session::{DeliveryMessage, SessionChannel};
use crate::types::{ReportType, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

pub use export::{DocumentExporter, ExportAdapter};

/// Writes the final report from the budgeted research context.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(
        &self,
        query: &str,
        context: &str,
        role_prompt: &str,
        report_type: ReportType,
        channel: &SessionChannel,
    ) -> Result<String>;
}

/// Report generator backed by the smart LLM, streaming chunks to the
/// client as they arrive.
pub struct LlmReportGenerator {
    llm: Arc<dyn LLMClient>,
    total_words: usize,
}

impl LlmReportGenerator {
    pub fn new(llm: Arc<dyn LLMClient>, total_words: usize) -> Self {
        Self { llm, total_words }
    }
}

#[async_trait]
impl ReportGenerator for LlmReportGenerator {
    async fn generate(
        &self,
        query: &str,
        context: &str,
        role_prompt: &str,
        report_type: ReportType,
        channel: &SessionChannel,
    ) -> Result<String> {
        let prompt = prompts::report_prompt(report_type, query, context, self.total_words);

        let mut stream = self.llm.stream_with_system(role_prompt, &prompt).await?;
        let mut report = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            channel.send(DeliveryMessage::Report(chunk.clone()));
            report.push_str(&chunk);
        }

        Ok(report)
    }
}
