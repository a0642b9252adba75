// src/llm/dialog_analyzer.rs
//! Extracts new skills, experience and expectations from a career dialog.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::client::{ChatMessage, LlmClient, ToolDefinition};
use super::prompts::dialog_analysis_prompt;
use crate::app_log;
use crate::types::{CandidateProfile, ProfileUpdate};

const ANALYZE_TOOL: &str = "analyze_dialog";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogAnalysis {
    #[serde(default)]
    pub new_hard_skills: Vec<String>,
    #[serde(default)]
    pub new_experience: String,
    #[serde(default)]
    pub career_expectations: String,
}

impl DialogAnalysis {
    pub fn is_empty(&self) -> bool {
        self.new_hard_skills.iter().all(|s| s.trim().is_empty())
            && self.new_experience.trim().is_empty()
            && self.career_expectations.trim().is_empty()
    }

    /// Profile changes implied by the analysis: unseen skills are appended,
    /// new experience is appended to the description, non-empty
    /// expectations replace the stored ones.
    pub fn profile_update(&self, profile: &CandidateProfile) -> ProfileUpdate {
        let mut update = ProfileUpdate::default();

        let mut skills = profile.hard_skills.clone();
        for skill in &self.new_hard_skills {
            let skill = skill.trim();
            if !skill.is_empty() && !skills.iter().any(|known| known == skill) {
                skills.push(skill.to_string());
            }
        }
        if skills.len() != profile.hard_skills.len() {
            update.hard_skills = Some(skills);
        }

        let experience = self.new_experience.trim();
        if !experience.is_empty() {
            update.experience_description = Some(match profile.experience_description.as_deref() {
                Some(current) if !current.trim().is_empty() => format!("{} {}", current, experience),
                _ => experience.to_string(),
            });
        }

        let expectations = self.career_expectations.trim();
        if !expectations.is_empty() {
            update.career_expectations = Some(expectations.to_string());
        }

        update
    }
}

fn analyze_tool() -> ToolDefinition {
    ToolDefinition {
        name: ANALYZE_TOOL,
        description: "Analyzes the dialog and extracts new information about the user",
        parameters: json!({
            "type": "object",
            "properties": {
                "new_hard_skills": {"type": "array", "items": {"type": "string"}},
                "new_experience": {"type": "string"},
                "career_expectations": {"type": "string"}
            },
            "required": ["new_hard_skills", "new_experience", "career_expectations"]
        }),
    }
}

/// One `role: content` line per message
pub fn format_history(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|msg| format!("{}: {}", msg.role, msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct DialogAnalyzer {
    client: LlmClient,
}

impl DialogAnalyzer {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// `None` when the model call fails or the model skips the tool
    pub async fn analyze(
        &self,
        history: &[ChatMessage],
        current_skills: &[String],
        current_experience: &str,
        career_expectations: &str,
    ) -> Option<DialogAnalysis> {
        if history.is_empty() {
            return None;
        }

        let messages = vec![
            ChatMessage::system(dialog_analysis_prompt(
                &current_skills.join(", "),
                current_experience,
                career_expectations,
            )),
            ChatMessage::user(format_history(history)),
        ];

        match self
            .client
            .call_tool::<DialogAnalysis>(&messages, &analyze_tool(), 0.0, None)
            .await
        {
            Ok(analysis) => analysis,
            Err(e) => {
                app_log!(error, "Dialog analysis failed: {:#}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::profile::fixtures::profile;

    #[test]
    fn test_format_history() {
        let history = vec![
            ChatMessage::user("I know Rust"),
            ChatMessage::assistant("Great"),
        ];
        assert_eq!(format_history(&history), "user: I know Rust\nassistant: Great");
    }

    #[test]
    fn test_profile_update_merges() {
        let mut candidate = profile(&["Python", "SQL"], 3, 0);
        candidate.experience_description = Some("Django services.".to_string());
        candidate.career_expectations = Some("office".to_string());

        let analysis = DialogAnalysis {
            new_hard_skills: vec!["SQL".to_string(), "Kafka".to_string(), " ".to_string()],
            new_experience: "Led a team of three.".to_string(),
            career_expectations: "remote, team lead".to_string(),
        };
        let update = analysis.profile_update(&candidate);
        assert_eq!(
            update.hard_skills,
            Some(vec!["Python".to_string(), "SQL".to_string(), "Kafka".to_string()])
        );
        assert_eq!(
            update.experience_description.as_deref(),
            Some("Django services. Led a team of three.")
        );
        assert_eq!(update.career_expectations.as_deref(), Some("remote, team lead"));
        assert_eq!(update.experience_years, None);
    }

    #[test]
    fn test_empty_analysis_changes_nothing() {
        let candidate = profile(&["Go"], 1, 0);
        let analysis = DialogAnalysis {
            new_hard_skills: vec!["Go".to_string()],
            ..Default::default()
        };
        assert!(analysis.profile_update(&candidate).is_empty());
        assert!(DialogAnalysis::default().is_empty());
    }

    #[test]
    fn test_first_experience_is_not_prefixed() {
        let candidate = profile(&[], 0, 6);
        let analysis = DialogAnalysis {
            new_experience: "Internship at a bank.".to_string(),
            ..Default::default()
        };
        assert_eq!(
            analysis.profile_update(&candidate).experience_description.as_deref(),
            Some("Internship at a bank.")
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let analysis: DialogAnalysis =
            serde_json::from_str(r#"{"new_hard_skills": ["Rust"]}"#).unwrap();
        assert_eq!(analysis.new_hard_skills, vec!["Rust"]);
        assert!(analysis.new_experience.is_empty());
    }
}
