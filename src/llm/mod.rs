// src/llm/mod.rs
pub mod career;
pub mod client;
pub mod dialog_analyzer;
pub mod match_analyzer;
pub mod prompts;

pub use career::{CareerChat, DialogHistory, DEFAULT_MAX_HISTORY};
pub use client::{ChatMessage, LlmClient, Role, ToolDefinition};
pub use dialog_analyzer::{DialogAnalysis, DialogAnalyzer};
pub use match_analyzer::{MatchAnalyzer, MatchAssessment};
