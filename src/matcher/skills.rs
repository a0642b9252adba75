// src/matcher/skills.rs
//! Coverage of a target skill set (must-have or nice-to-have) by the
//! candidate's canonical skills.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::canonical::{canonicalize, CanonicalMatch};
use super::config::SkillMatchConfig;
use super::fuzzy::{extract_one, token_set_ratio};
use super::lexicon::SkillIndex;

/// Best candidate found for one target skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetMatch {
    /// Winning candidate skill, recorded even below the threshold.
    pub candidate: Option<String>,
    pub score: f64,
    pub matched: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetMatchOutcome {
    pub matched: usize,
    pub total: usize,
    pub details: BTreeMap<String, TargetMatch>,
}

impl SetMatchOutcome {
    /// `matched / total`, or `neutral` for an empty target set.
    pub fn coverage_or(&self, neutral: f64) -> f64 {
        if self.total == 0 {
            neutral
        } else {
            self.matched as f64 / self.total as f64
        }
    }
}

/// Matches every target skill against the candidate set. A target counts as
/// covered when its best token-set score reaches `threshold`.
pub fn match_sets(
    candidate: &BTreeSet<String>,
    target: &BTreeSet<String>,
    threshold: f64,
) -> SetMatchOutcome {
    let mut outcome = SetMatchOutcome {
        total: target.len(),
        ..Default::default()
    };

    for item in target {
        let best = extract_one(
            item,
            candidate.iter().map(String::as_str),
            token_set_ratio,
            0.0,
        );

        let entry = match best {
            None => TargetMatch {
                candidate: None,
                score: 0.0,
                matched: false,
            },
            Some((name, score)) => {
                let matched = score >= threshold;
                if matched {
                    outcome.matched += 1;
                }
                TargetMatch {
                    candidate: Some(name.to_string()),
                    score,
                    matched,
                }
            }
        };
        outcome.details.insert(item.clone(), entry);
    }

    outcome
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonizationDetails {
    pub user: BTreeMap<String, CanonicalMatch>,
    pub must: BTreeMap<String, CanonicalMatch>,
    pub nice: BTreeMap<String, CanonicalMatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillDetails {
    pub user_canon_skills: Vec<String>,
    pub must_canon: Vec<String>,
    pub nice_canon: Vec<String>,
    pub canonization_details: CanonizationDetails,
    pub must_matches: BTreeMap<String, TargetMatch>,
    pub nice_matches: BTreeMap<String, TargetMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScores {
    pub must: f64,
    pub nice: f64,
    pub details: SkillDetails,
}

/// Canonicalizes the three lists independently and scores must-have and
/// nice-to-have coverage, falling back to the neutral values when a target
/// list resolves to nothing.
pub fn skills_scores<S: AsRef<str>>(
    user_skills: &[S],
    must_have: &[S],
    nice_to_have: &[S],
    config: &SkillMatchConfig,
    index: &SkillIndex,
) -> SkillScores {
    let user = canonicalize(user_skills, index, config.canonical_threshold);
    let must = canonicalize(must_have, index, config.canonical_threshold);
    let nice = canonicalize(nice_to_have, index, config.canonical_threshold);

    let must_outcome = match_sets(&user.skills, &must.skills, config.threshold_must);
    let nice_outcome = match_sets(&user.skills, &nice.skills, config.threshold_nice);

    SkillScores {
        must: must_outcome.coverage_or(config.neutral_must),
        nice: nice_outcome.coverage_or(config.neutral_nice),
        details: SkillDetails {
            user_canon_skills: user.skills.into_iter().collect(),
            must_canon: must.skills.into_iter().collect(),
            nice_canon: nice.skills.into_iter().collect(),
            canonization_details: CanonizationDetails {
                user: user.details,
                must: must.details,
                nice: nice.details,
            },
            must_matches: must_outcome.details,
            nice_matches: nice_outcome.details,
        },
    }
}
