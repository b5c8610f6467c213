//! Prompt builders for the research pipeline.

use crate::types::ReportType;

/// How many sub-queries the decomposition asks for. The original task is
/// appended on top of these.
pub const MAX_SUB_QUERIES: usize = 3;

/// Ask the fast model to decompose a task into search queries.
pub fn sub_queries_prompt(query: &str) -> String {
    format!(
        r#"Write {count} google search queries to search online that form an objective opinion from the following task: "{query}"

You must respond with a JSON list of strings in the following format: ["query 1", "query 2", "query 3"]."#,
        count = MAX_SUB_QUERIES,
        query = query,
    )
}

/// Parse a JSON list of strings out of a model response, tolerating
/// surrounding prose. Falls back to line splitting, stripping any
/// numbering, and never returns more than `max` entries.
pub fn parse_string_list(response: &str, max: usize) -> Vec<String> {
    if let (Some(start), Some(end)) = (response.find('['), response.rfind(']')) {
        if start < end {
            if let Ok(parsed) = serde_json::from_str::<Vec<String>>(&response[start..=end]) {
                return parsed
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .take(max)
                    .collect();
            }
        }
    }

    response
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| c.is_numeric() || c == '.' || c == ')' || c == '-')
                .trim()
                .trim_matches('"')
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .take(max)
        .collect()
}

/// Build the report-writing prompt for the given report flavor.
pub fn report_prompt(
    report_type: ReportType,
    query: &str,
    context: &str,
    total_words: usize,
) -> String {
    match report_type {
        ReportType::ResearchReport | ReportType::CustomReport => format!(
            r#"Information: """{context}"""

Using the above information, answer the following query or task: "{query}" in a detailed report.
The report should focus on the answer to the query, should be well structured, informative,
in depth and comprehensive, with facts and numbers if available and a minimum of {total_words} words.

You should strive to write the report as long as you can using all relevant and necessary information provided.
You must write the report with markdown syntax.
Use an unbiased and journalistic tone.
You MUST determine your own concrete and valid opinion based on the given information. Do NOT deter to general and meaningless conclusions.
You MUST write all used source urls at the end of the report as references.
You MUST write the report in APA format.
Please do your best, this is very important to my career."#,
        ),
        ReportType::ResourceReport => format!(
            r#"Information: """{context}"""

Based on the above information, generate a bibliography recommendation report for the following question or topic: "{query}".
The report should provide a detailed analysis of each recommended resource, explaining how each source can contribute to finding answers to the research question.
Focus on the relevance, reliability, and significance of each source.
Ensure that the report is well-structured, informative, in-depth, and follows Markdown syntax.
Include relevant facts, figures, and numbers whenever available.
The report should have a minimum length of {total_words} words."#,
        ),
        ReportType::OutlineReport => format!(
            r#"Information: """{context}"""

Using the above information, generate an outline for a research report in Markdown syntax for the following question or topic: "{query}".
The outline should provide a well-structured framework for the research report, including the main sections, subsections, and key points to be covered.
The research report should be detailed, informative, in-depth, and a minimum of {total_words} words.
Use appropriate Markdown syntax to format the outline and ensure readability."#,
        ),
    }
}
