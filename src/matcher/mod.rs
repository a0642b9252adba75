// src/matcher/mod.rs
//! Deterministic candidate/vacancy scoring.
//!
//! Everything under this module is pure: no I/O, no logging side channels,
//! no shared mutable state. The only shared value is the immutable
//! [`SkillIndex`], built once and read concurrently.

pub mod canonical;
pub mod config;
pub mod experience;
pub mod fuzzy;
pub mod lexicon;
pub mod scorer;
pub mod skills;
pub mod textsim;

pub use canonical::{canonicalize, CanonicalMatch, Canonicalized, DEFAULT_FUZZY_THRESHOLD};
pub use config::{ExperienceConfig, MatchWeights, MatcherConfig, SkillMatchConfig, TextSimConfig};
pub use experience::{experience_score, OverMaxPolicy};
pub use lexicon::{default_index, normalize_skill, SkillIndex, SkillLexicon};
pub use scorer::{compute_match, Breakdown, MatchDetails, MatchResult};
pub use skills::{match_sets, skills_scores, SetMatchOutcome, SkillDetails, SkillScores, TargetMatch};
pub use textsim::{cosine_similarity, text_similarity, TfidfVectorizer};
