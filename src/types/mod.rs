use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============= Research Request Types =============

/// Payload of the `start` command received over the research WebSocket.
#[derive(Debug, Clone, Deserialize)]
pub struct StartCommand {
    /// The research task to investigate.
    pub task: String,
    /// Which report flavor to produce.
    pub report_type: ReportType,
    /// Seed URLs. When present, research is grounded on these pages
    /// instead of web search.
    #[serde(default)]
    pub source_urls: Vec<String>,
    /// Optional path to a per-session research config file.
    #[serde(default)]
    pub config_path: Option<String>,
    #[serde(default = "default_prompt_token_limit")]
    pub prompt_token_limit: usize,
    #[serde(default = "default_total_words")]
    pub total_words: usize,
}

fn default_prompt_token_limit() -> usize {
    10_000
}

fn default_total_words() -> usize {
    1_000
}

/// The report flavors a research run can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// A detailed, in-depth answer to the research task.
    #[default]
    ResearchReport,
    /// An annotated list of sources relevant to the task.
    ResourceReport,
    /// A markdown outline serving as a skeleton for a later report.
    OutlineReport,
    /// A report written under a caller-configured agent role.
    CustomReport,
}

impl FromStr for ReportType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "research_report" => Ok(Self::ResearchReport),
            "resource_report" => Ok(Self::ResourceReport),
            "outline_report" => Ok(Self::OutlineReport),
            "custom_report" => Ok(Self::CustomReport),
            _ => Err(AppError::Config(format!(
                "Unknown report type: {}. Use one of: research_report, \
                 resource_report, outline_report, custom_report",
                s
            ))),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ResearchReport => "research_report",
            Self::ResourceReport => "resource_report",
            Self::OutlineReport => "outline_report",
            Self::CustomReport => "custom_report",
        };
        write!(f, "{}", name)
    }
}

// ============= Error Types =============

/// Errors surfaced by the research core.
///
/// Transport failures never appear here: a dead client connection is
/// absorbed inside the session channel, not propagated into the run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing configuration. Fatal before gathering starts.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Search retriever failure. Terminates the run.
    #[error("Search error: {0}")]
    Retriever(String),

    /// Whole-scrape failure (individual URL failures are absorbed).
    #[error("Scrape error: {0}")]
    Scrape(String),

    /// Relevance ranker failure. Terminates the run.
    #[error("Ranking error: {0}")]
    Rank(String),

    /// LLM completion failure. Terminates the run.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Report export failure.
    #[error("Export error: {0}")]
    Export(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
