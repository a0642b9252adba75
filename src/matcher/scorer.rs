// src/matcher/scorer.rs
//! Aggregates the four sub-scores into one explainable match result.

use serde::{Deserialize, Serialize};

use super::config::MatcherConfig;
use super::experience::experience_score;
use super::lexicon::SkillIndex;
use super::skills::{skills_scores, SkillDetails};
use super::textsim::text_similarity;
use crate::types::{CandidateProfile, Vacancy};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub experience: f64,
    pub must: f64,
    pub nice: f64,
    pub text: f64,
}

impl Breakdown {
    fn values(&self) -> [f64; 4] {
        [self.experience, self.must, self.nice, self.text]
    }

    pub fn is_normalized(&self) -> bool {
        self.values().iter().all(|v| (0.0..=1.0).contains(v))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub user_months: i64,
    pub vacancy_min: Option<i64>,
    pub vacancy_max: Option<i64>,
    #[serde(flatten)]
    pub skills: SkillDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub total: f64,
    pub breakdown: Breakdown,
    pub details: MatchDetails,
}

/// Scores one candidate against one vacancy. Pure: the result depends only on
/// the inputs and the immutable index.
pub fn compute_match(
    profile: &CandidateProfile,
    vacancy: &Vacancy,
    config: &MatcherConfig,
    index: &SkillIndex,
) -> MatchResult {
    let user_months = profile.total_months();

    let experience = experience_score(
        Some(user_months),
        vacancy.min_exp_months,
        vacancy.max_exp_months,
        config.experience.under_min_gamma,
        config.experience.over_max_policy,
        config.experience.over_max_bonus,
    );

    let skills = skills_scores(
        &profile.hard_skills,
        &vacancy.must_have,
        &vacancy.nice_to_have,
        &config.skills,
        index,
    );

    let text = text_similarity(
        profile.experience_description.as_deref(),
        Some(vacancy.description.as_str()),
        config.text.use_tfidf,
        config.text.neutral_if_empty,
    );

    let breakdown = Breakdown {
        experience,
        must: skills.must,
        nice: skills.nice,
        text,
    };
    debug_assert!(
        breakdown.is_normalized(),
        "breakdown out of range: {:?}",
        breakdown
    );

    let weights = &config.weights;
    let total = (weights.experience * breakdown.experience
        + weights.must * breakdown.must
        + weights.nice * breakdown.nice
        + weights.text * breakdown.text)
        .clamp(0.0, 1.0);

    MatchResult {
        total,
        breakdown,
        details: MatchDetails {
            user_months,
            vacancy_min: vacancy.min_exp_months,
            vacancy_max: vacancy.max_exp_months,
            skills: skills.details,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::config::MatchWeights;
    use crate::matcher::lexicon::default_index;
    use crate::types::profile::fixtures::profile;
    use crate::types::vacancy::fixtures::vacancy;

    #[test]
    fn test_full_match() {
        let index = default_index();
        let mut candidate = profile(&["python", "Django", "postgres", "Docker"], 4, 0);
        candidate.experience_description =
            Some("Built Python backend services with Django and PostgreSQL".to_string());
        let mut posting = vacancy(&["Python", "Django"], &["PostgreSQL"], Some(36), Some(60));
        posting.description = "Python backend services with Django".to_string();

        let result = compute_match(&candidate, &posting, &MatcherConfig::default(), &index);
        assert_eq!(result.breakdown.experience, 1.0);
        assert_eq!(result.breakdown.must, 1.0);
        assert_eq!(result.breakdown.nice, 1.0);
        assert!(result.breakdown.text > 0.0 && result.breakdown.text < 1.0);
        assert!(result.total > 0.9);
        assert_eq!(result.details.user_months, 48);
        assert_eq!(result.details.vacancy_min, Some(36));
    }

    #[test]
    fn test_partial_must_and_short_experience() {
        let index = default_index();
        let candidate = profile(&["Python", "SQL"], 0, 6);
        let posting = vacancy(&["Python", "Django"], &[], Some(24), None);

        let result = compute_match(&candidate, &posting, &MatcherConfig::default(), &index);
        assert!((result.breakdown.experience - 0.0625).abs() < 1e-12);
        assert_eq!(result.breakdown.must, 0.5);
        assert_eq!(result.breakdown.nice, 0.5);
        assert_eq!(result.breakdown.text, 0.5);
        let expected = 0.5 * 0.0625 + 0.3 * 0.5 + 0.1 * 0.5 + 0.1 * 0.5;
        assert!((result.total - expected).abs() < 1e-12);
        assert!(!result.details.skills.must_matches["Django"].matched);
    }

    #[test]
    fn test_total_clamped_for_unnormalized_weights() {
        let index = default_index();
        let candidate = profile(&["Rust"], 10, 0);
        let posting = vacancy(&["Rust"], &[], None, None);

        let heavy = MatcherConfig {
            weights: MatchWeights {
                experience: 2.0,
                must: 2.0,
                nice: 2.0,
                text: 2.0,
            },
            ..Default::default()
        };
        let result = compute_match(&candidate, &posting, &heavy, &index);
        assert_eq!(result.total, 1.0);

        let zero = MatcherConfig {
            weights: MatchWeights {
                experience: 0.0,
                must: 0.0,
                nice: 0.0,
                text: 0.0,
            },
            ..Default::default()
        };
        let result = compute_match(&candidate, &posting, &zero, &index);
        assert_eq!(result.total, 0.0);
        assert!(result.breakdown.is_normalized());
    }

    #[test]
    fn test_details_serialize_flat() {
        let index = default_index();
        let result = compute_match(
            &profile(&["Go"], 2, 0),
            &vacancy(&["Go"], &["Kubernetes"], Some(12), Some(36)),
            &MatcherConfig::default(),
            &index,
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["details"]["user_months"], 24);
        assert!(json["details"]["must_canon"].is_array());
        assert!(json["details"]["canonization_details"]["user"].is_object());
        assert_eq!(json["breakdown"]["experience"], 1.0);
    }
}
