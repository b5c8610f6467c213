//! Configuration for the server and for research sessions.
//!
//! Two layers:
//!
//! - [`ServerConfig`] - process-level settings (bind address, static dirs),
//!   loaded once at startup from `magellan.toml` plus `MAGELLAN_*`
//!   environment overrides.
//! - [`ResearchConfig`] - per-session research parameters, resolved once
//!   when a `start` command arrives (optionally from the command's
//!   `config_path`) and read-only for the rest of the session.
//!
//! API keys are never stored in config files; they are read from the
//! environment (`OPENAI_API_KEY`, `TAVILY_API_KEY`) when a collaborator is
//! constructed.

use crate::rank::RankerKind;
use crate::scrape::ScraperKind;
use crate::search::RetrieverKind;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served at `/site` for the client application.
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,

    /// Directory where exported reports are written, served at `/outputs`.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_frontend_dir() -> String {
    "frontend".to_string()
}

fn default_output_dir() -> String {
    "outputs".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_dir: default_frontend_dir(),
            output_dir: default_output_dir(),
            log_level: default_log_level(),
        }
    }
}

// ============= Research Configuration =============

/// Parameters of one research session. Resolved at session start, immutable
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    #[serde(default)]
    pub retriever: RetrieverKind,

    #[serde(default)]
    pub scraper: ScraperKind,

    #[serde(default)]
    pub ranker: RankerKind,

    /// Model used for the cheap structural calls (role selection,
    /// sub-query decomposition).
    #[serde(default = "default_fast_llm_model")]
    pub fast_llm_model: String,

    /// Model used to write the report.
    #[serde(default = "default_smart_llm_model")]
    pub smart_llm_model: String,

    /// Context window of the smart model.
    #[serde(default = "default_smart_token_max")]
    pub smart_token_max: usize,

    /// Hard ceiling on the serialized research context, in tokens.
    #[serde(default = "default_prompt_token_limit")]
    pub prompt_token_limit: usize,

    /// Target report length in words.
    #[serde(default = "default_total_words")]
    pub total_words: usize,

    #[serde(default = "default_max_search_results")]
    pub max_search_results_per_query: usize,

    /// How many ranked excerpts each sub-query contributes.
    #[serde(default = "default_max_excerpts")]
    pub max_excerpts_per_query: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Role override used by custom reports.
    #[serde(default)]
    pub agent_role: Option<String>,

    #[serde(default = "default_openai_api_base")]
    pub openai_api_base: String,
}

fn default_fast_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_smart_llm_model() -> String {
    "gpt-3.5-turbo-16k".to_string()
}

fn default_smart_token_max() -> usize {
    16_385
}

fn default_prompt_token_limit() -> usize {
    10_000
}

fn default_total_words() -> usize {
    1_000
}

fn default_max_search_results() -> usize {
    5
}

fn default_max_excerpts() -> usize {
    4
}

fn default_temperature() -> f32 {
    0.55
}

fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            retriever: RetrieverKind::default(),
            scraper: ScraperKind::default(),
            ranker: RankerKind::default(),
            fast_llm_model: default_fast_llm_model(),
            smart_llm_model: default_smart_llm_model(),
            smart_token_max: default_smart_token_max(),
            prompt_token_limit: default_prompt_token_limit(),
            total_words: default_total_words(),
            max_search_results_per_query: default_max_search_results(),
            max_excerpts_per_query: default_max_excerpts(),
            temperature: default_temperature(),
            agent_role: None,
            openai_api_base: default_openai_api_base(),
        }
    }
}

impl ResearchConfig {
    /// Load a research config from an optional TOML/JSON file, with
    /// `MAGELLAN_RESEARCH_*` environment overrides layered on top.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("MAGELLAN_RESEARCH").separator("__"),
        );
        builder
            .build()
            .and_then(|raw| raw.try_deserialize())
            .map_err(|err| AppError::Config(err.to_string()))
    }

    /// Apply the per-run limits carried by a `start` command.
    pub fn with_limits(mut self, prompt_token_limit: usize, total_words: usize) -> Self {
        self.prompt_token_limit = prompt_token_limit;
        self.total_words = total_words;
        self
    }
}

// ============= Settings File =============

/// Root of `magellan.toml`: `[server]` plus `[research]` defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub research: ResearchConfig,
}

impl Settings {
    /// Load settings from the given file (or `magellan.toml` when present),
    /// with `MAGELLAN_*` environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();
        match path {
            Some(path) => builder = builder.add_source(config::File::with_name(path)),
            None => {
                builder = builder.add_source(config::File::with_name("magellan").required(false))
            }
        }
        builder = builder.add_source(config::Environment::with_prefix("MAGELLAN").separator("__"));
        builder
            .build()
            .and_then(|raw| raw.try_deserialize())
            .map_err(|err| AppError::Config(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_research_defaults() {
        let cfg = ResearchConfig::default();
        assert_eq!(cfg.prompt_token_limit, 10_000);
        assert_eq!(cfg.total_words, 1_000);
        assert_eq!(cfg.max_excerpts_per_query, 4);
        assert_eq!(cfg.retriever, RetrieverKind::Duckduckgo);
    }

    #[test]
    fn test_with_limits_overrides() {
        let cfg = ResearchConfig::default().with_limits(4_000, 500);
        assert_eq!(cfg.prompt_token_limit, 4_000);
        assert_eq!(cfg.total_words, 500);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            retriever = "tavily"
            smart_llm_model = "gpt-4"
            max_search_results_per_query = 7
            "#
        )
        .unwrap();

        let cfg = ResearchConfig::load(file.path().to_str()).unwrap();
        assert_eq!(cfg.retriever, RetrieverKind::Tavily);
        assert_eq!(cfg.smart_llm_model, "gpt-4");
        assert_eq!(cfg.max_search_results_per_query, 7);
        // Unspecified keys keep their defaults.
        assert_eq!(cfg.total_words, 1_000);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = ResearchConfig::load(Some("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_settings_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [server]
            port = 9100

            [research]
            total_words = 1500
            "#
        )
        .unwrap();

        let settings = Settings::load(file.path().to_str()).unwrap();
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.research.total_words, 1500);
    }
}
