//! Career matching backend: candidate profiles, vacancies parsed from
//! uploaded documents, a deterministic explainable matcher and LLM-backed
//! career guidance.

pub mod cli;
pub mod core;
pub mod environment;
pub mod llm;
pub mod matcher;
pub mod parsing;
pub mod services;
pub mod types;
pub mod utils;

pub use matcher::{compute_match, MatchResult, MatcherConfig, SkillIndex, SkillLexicon};
pub use types::{CandidateProfile, Vacancy};

/// Forwards to the `tracing` macro of the same level.
#[macro_export]
macro_rules! app_log {
    (trace, $($arg:tt)+) => { ::tracing::trace!($($arg)+) };
    (debug, $($arg:tt)+) => { ::tracing::debug!($($arg)+) };
    (info, $($arg:tt)+) => { ::tracing::info!($($arg)+) };
    (warn, $($arg:tt)+) => { ::tracing::warn!($($arg)+) };
    (error, $($arg:tt)+) => { ::tracing::error!($($arg)+) };
}
