// src/llm/match_analyzer.rs
//! Language-model second opinion on a candidate/vacancy pair.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::client::{ChatMessage, LlmClient, ToolDefinition};
use super::prompts::{match_user_prompt, MATCH_SYSTEM_PROMPT};
use crate::app_log;
use crate::types::{CandidateProfile, Vacancy};

const ANALYZE_TOOL: &str = "analyze_match";
const MATCH_TEMPERATURE: f32 = 0.1;
const MATCH_MAX_TOKENS: u32 = 4000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAssessment {
    pub score: i64,
    pub decision: String,
    pub reasoning_report: String,
}

fn analyze_tool() -> ToolDefinition {
    ToolDefinition {
        name: ANALYZE_TOOL,
        description: "Analyzes the fit and returns a structured assessment",
        parameters: json!({
            "type": "object",
            "properties": {
                "score": {"type": "integer"},
                "decision": {"type": "string"},
                "reasoning_report": {"type": "string"}
            },
            "required": ["score", "decision", "reasoning_report"]
        }),
    }
}

/// `key: value` lines; absent optional fields are skipped
pub fn profile_as_text(profile: &CandidateProfile) -> String {
    let mut lines = vec![
        format!("first_name: {}", profile.first_name),
        format!("last_name: {}", profile.last_name),
        format!("sex: {}", profile.sex),
        format!("birth_date: {}", profile.birth_date),
        format!("current_position: {}", profile.current_position),
    ];
    if let Some(education) = &profile.education {
        lines.push(format!("education: {}", education));
    }
    lines.push(format!("experience_years: {}", profile.experience_years));
    lines.push(format!("experience_months: {}", profile.experience_months));
    if let Some(description) = &profile.experience_description {
        lines.push(format!("experience_description: {}", description));
    }
    lines.push(format!("hard_skills: {}", profile.hard_skills.join(", ")));
    if let Some(expectations) = &profile.career_expectations {
        lines.push(format!("career_expectations: {}", expectations));
    }
    lines.join("\n")
}

pub fn vacancy_as_text(vacancy: &Vacancy) -> String {
    format!("{}\n\n{}", vacancy.name, vacancy.description)
}

pub struct MatchAnalyzer {
    client: LlmClient,
}

impl MatchAnalyzer {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// `None` when the model call fails or the model skips the tool
    pub async fn assess(
        &self,
        profile: &CandidateProfile,
        vacancy: &Vacancy,
    ) -> Option<MatchAssessment> {
        let messages = vec![
            ChatMessage::system(MATCH_SYSTEM_PROMPT),
            ChatMessage::user(match_user_prompt(
                &profile_as_text(profile),
                &vacancy_as_text(vacancy),
            )),
        ];

        match self
            .client
            .call_tool::<MatchAssessment>(
                &messages,
                &analyze_tool(),
                MATCH_TEMPERATURE,
                Some(MATCH_MAX_TOKENS),
            )
            .await
        {
            Ok(assessment) => assessment,
            Err(e) => {
                app_log!(error, "Match assessment failed: {:#}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::profile::fixtures::profile;
    use crate::types::vacancy::fixtures::vacancy;

    #[test]
    fn test_profile_as_text() {
        let mut candidate = profile(&["Python", "Docker"], 4, 2);
        candidate.career_expectations = Some("remote".to_string());
        let text = profile_as_text(&candidate);

        assert!(text.starts_with("first_name: Anna\nlast_name: Ivanova\nsex: female"));
        assert!(text.contains("birth_date: 1994-03-14"));
        assert!(text.contains("hard_skills: Python, Docker"));
        assert!(text.contains("experience_years: 4\nexperience_months: 2"));
        assert!(text.ends_with("career_expectations: remote"));
        assert!(!text.contains("experience_description"));
    }

    #[test]
    fn test_vacancy_as_text() {
        let posting = vacancy(&["Python"], &[], None, None);
        assert_eq!(
            vacancy_as_text(&posting),
            "Backend developer\n\nPython backend services"
        );
    }

    #[test]
    fn test_tool_schema_lists_required_fields() {
        let tool = analyze_tool();
        assert_eq!(tool.name, "analyze_match");
        assert_eq!(tool.parameters["required"].as_array().unwrap().len(), 3);
    }
}
