//! Report persona selection.
//!
//! The fast model proposes a specialist persona for the research task (a
//! finance analyst for market questions, a travel writer for destination
//! guides, and so on). The persona's role prompt becomes the system prompt
//! of the report generation call.

use crate::llm::LLMClient;
use crate::types::Result;
use serde::Deserialize;

/// Persona picked for a research run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentRole {
    /// Display name, e.g. "💰 Finance Agent".
    #[serde(rename = "agent")]
    pub name: String,
    /// System prompt describing the persona.
    #[serde(rename = "agent_role_prompt")]
    pub role_prompt: String,
}

impl AgentRole {
    /// Persona used when the model's proposal cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            name: "🤖 Research Agent".to_string(),
            role_prompt: "You are a critical-thinking AI research assistant. Your sole purpose \
                          is to write well-reasoned, objective and structured reports on the \
                          given text."
                .to_string(),
        }
    }
}

const AGENT_SELECTION_INSTRUCTIONS: &str = r#"
This task involves researching a given topic, regardless of its complexity or the availability of a definitive answer. The research is conducted by a specific agent, defined by its type and role.

Examples:
task: "should I invest in apple stocks?"
response: {"agent": "💰 Finance Agent", "agent_role_prompt": "You are a seasoned finance analyst AI assistant. Your primary goal is to compose comprehensive, astute, impartial, and methodically arranged financial reports based on provided data and trends."}
task: "what are the most interesting sites in Tel Aviv?"
response: {"agent": "🌍 Travel Agent", "agent_role_prompt": "You are a world-travelled AI tour guide assistant. Your main purpose is to draft engaging, insightful, unbiased, and well-structured travel reports on given locations, including history, attractions, and cultural insights."}

Respond with only a JSON object in the same format: an "agent" determined by the field of the topic, and an "agent_role_prompt" instructing that agent how to write.
"#;

/// Ask the fast model which persona should write the report. Unparseable
/// proposals fall back to the generic researcher rather than failing the
/// run.
pub async fn select_agent(llm: &dyn LLMClient, query: &str) -> Result<AgentRole> {
    let response = llm
        .generate_with_system(AGENT_SELECTION_INSTRUCTIONS, query)
        .await?;
    Ok(parse_agent_response(&response).unwrap_or_else(|| {
        tracing::warn!("persona proposal was not valid JSON, using fallback persona");
        AgentRole::fallback()
    }))
}

fn parse_agent_response(response: &str) -> Option<AgentRole> {
    // Models occasionally wrap the object in prose or code fences; parse
    // the outermost braces.
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    serde_json::from_str(&response[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_json() {
        let parsed = parse_agent_response(
            r#"{"agent": "💰 Finance Agent", "agent_role_prompt": "You are a finance analyst."}"#,
        )
        .unwrap();
        assert_eq!(parsed.name, "💰 Finance Agent");
        assert_eq!(parsed.role_prompt, "You are a finance analyst.");
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let parsed = parse_agent_response(
            "Sure! Here you go:\n```json\n{\"agent\": \"🌍 Travel Agent\", \
             \"agent_role_prompt\": \"You are a tour guide.\"}\n```",
        )
        .unwrap();
        assert_eq!(parsed.name, "🌍 Travel Agent");
    }

    #[test]
    fn test_parse_garbage_returns_none() {
        assert!(parse_agent_response("I'd pick a finance specialist.").is_none());
        assert!(parse_agent_response("{\"agent\": 3}").is_none());
    }
}
