// src/matcher/config.rs
//! Matcher tunables. Every field has a default, so a partial TOML file only
//! overrides what it names.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::canonical::DEFAULT_FUZZY_THRESHOLD;
use super::experience::OverMaxPolicy;

/// Linear coefficients of the four sub-scores. Non-negative; they need not
/// sum to 1, the aggregated score is clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub experience: f64,
    pub must: f64,
    pub nice: f64,
    pub text: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            experience: 0.5,
            must: 0.3,
            nice: 0.1,
            text: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillMatchConfig {
    /// Token-set score (0-100) a must-have needs to count as covered.
    pub threshold_must: f64,
    pub threshold_nice: f64,
    /// Sub-score used when the vacancy lists no must-have skills.
    pub neutral_must: f64,
    pub neutral_nice: f64,
    /// Fuzzy threshold for resolving raw strings against the lexicon.
    pub canonical_threshold: f64,
}

impl Default for SkillMatchConfig {
    fn default() -> Self {
        Self {
            threshold_must: 88.0,
            threshold_nice: 80.0,
            neutral_must: 0.6,
            neutral_nice: 0.5,
            canonical_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    /// Exponent of the shortfall curve; above 1 punishes harder than linear.
    pub under_min_gamma: f64,
    pub over_max_policy: OverMaxPolicy,
    pub over_max_bonus: f64,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            under_min_gamma: 2.0,
            over_max_policy: OverMaxPolicy::Cap,
            over_max_bonus: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSimConfig {
    /// TF-IDF cosine when true, token-set ratio otherwise.
    pub use_tfidf: bool,
    pub neutral_if_empty: f64,
}

impl Default for TextSimConfig {
    fn default() -> Self {
        Self {
            use_tfidf: true,
            neutral_if_empty: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub weights: MatchWeights,
    pub skills: SkillMatchConfig,
    pub experience: ExperienceConfig,
    pub text: TextSimConfig,
    /// Minimum total for a positive match decision.
    pub decision_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            weights: MatchWeights::default(),
            skills: SkillMatchConfig::default(),
            experience: ExperienceConfig::default(),
            text: TextSimConfig::default(),
            decision_threshold: 0.5,
        }
    }
}

impl MatcherConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse matcher configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would push a sub-score outside [0, 1]
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("weights.experience", self.weights.experience),
            ("weights.must", self.weights.must),
            ("weights.nice", self.weights.nice),
            ("weights.text", self.weights.text),
        ];
        for (name, value) in weights {
            if !(value.is_finite() && value >= 0.0) {
                anyhow::bail!("{} must be a non-negative number, got {}", name, value);
            }
        }

        let unit = [
            ("skills.neutral_must", self.skills.neutral_must),
            ("skills.neutral_nice", self.skills.neutral_nice),
            ("text.neutral_if_empty", self.text.neutral_if_empty),
            ("decision_threshold", self.decision_threshold),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("{} must be within [0, 1], got {}", name, value);
            }
        }

        let percent = [
            ("skills.threshold_must", self.skills.threshold_must),
            ("skills.threshold_nice", self.skills.threshold_nice),
            ("skills.canonical_threshold", self.skills.canonical_threshold),
        ];
        for (name, value) in percent {
            if !(0.0..=100.0).contains(&value) {
                anyhow::bail!("{} must be within [0, 100], got {}", name, value);
            }
        }

        let gamma = self.experience.under_min_gamma;
        if !(gamma.is_finite() && gamma > 0.0) {
            anyhow::bail!("experience.under_min_gamma must be a positive number, got {}", gamma);
        }
        let bonus = self.experience.over_max_bonus;
        if !(bonus.is_finite() && bonus >= -1.0) {
            anyhow::bail!("experience.over_max_bonus must be at least -1, got {}", bonus);
        }
        Ok(())
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = crate::core::FsOps::read_file_safe(path).await?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid matcher configuration: {}", path.display()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize matcher configuration")
    }

    pub fn is_positive(&self, total: f64) -> bool {
        total >= self.decision_threshold
    }
}
