// src/services/mod.rs
//! Orchestration over storage, parsing, matching and the LLM collaborators

pub mod matching_service;
pub mod parsing_service;
pub mod user_service;

pub use matching_service::{CandidateMatch, MatchingService, VacancyMatch};
pub use parsing_service::ParsingService;
pub use user_service::{ImportReport, UserService};
