// src/matcher/canonical.rs
//! Maps free-text skill strings onto canonical lexicon names.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::fuzzy::{extract_one, token_set_ratio};
use super::lexicon::{normalize_skill, SkillIndex};

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 90.0;

/// Evidence for how one raw skill string was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMatch {
    /// Lexicon alias that matched; `None` when the raw string was kept as is.
    pub match_variant: Option<String>,
    pub canonical: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canonicalized {
    pub skills: BTreeSet<String>,
    /// Keyed by the raw input string.
    pub details: BTreeMap<String, CanonicalMatch>,
}

/// Resolves each raw skill by exact alias lookup, then by the best token-set
/// match over all aliases. Strings that resolve to nothing are kept in their
/// trimmed original casing so rare skills still count.
pub fn canonicalize<S: AsRef<str>>(
    raw_skills: &[S],
    index: &SkillIndex,
    fuzzy_threshold: f64,
) -> Canonicalized {
    let mut result = Canonicalized::default();

    for raw in raw_skills {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            continue;
        }
        let normalized = normalize_skill(raw);

        if let Some(display) = index.resolve(&normalized) {
            result.skills.insert(display.to_string());
            result.details.insert(
                raw.to_string(),
                CanonicalMatch {
                    match_variant: Some(normalized),
                    canonical: display.to_string(),
                    score: 100.0,
                },
            );
            continue;
        }

        let best = extract_one(
            &normalized,
            index.aliases().iter().map(String::as_str),
            token_set_ratio,
            0.0,
        );

        let resolved = best
            .filter(|(_, score)| *score >= fuzzy_threshold)
            .and_then(|(variant, score)| {
                index
                    .resolve(variant)
                    .map(|display| (variant.to_string(), display.to_string(), score))
            });

        match resolved {
            Some((variant, display, score)) => {
                result.skills.insert(display.clone());
                result.details.insert(
                    raw.to_string(),
                    CanonicalMatch {
                        match_variant: Some(variant),
                        canonical: display,
                        score,
                    },
                );
            }
            None => {
                let kept = raw.trim().to_string();
                result.skills.insert(kept.clone());
                result.details.insert(
                    raw.to_string(),
                    CanonicalMatch {
                        match_variant: None,
                        canonical: kept,
                        score: best.map(|(_, score)| score).unwrap_or(0.0),
                    },
                );
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::lexicon::SkillLexicon;

    fn index() -> SkillIndex {
        SkillIndex::build(&SkillLexicon::builtin())
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let index = index();
        let a = canonicalize(&["python"], &index, DEFAULT_FUZZY_THRESHOLD);
        let b = canonicalize(&["Python"], &index, DEFAULT_FUZZY_THRESHOLD);
        let c = canonicalize(&[" PYTHON  "], &index, DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(a.skills, b.skills);
        assert_eq!(b.skills, c.skills);
        assert_eq!(a.skills.iter().next().map(String::as_str), Some("Python"));
    }

    #[test]
    fn test_alias_resolves_with_full_score() {
        let result = canonicalize(&["Питон", "k8s"], &index(), DEFAULT_FUZZY_THRESHOLD);
        assert!(result.skills.contains("Python"));
        assert!(result.skills.contains("Kubernetes"));
        let evidence = &result.details["Питон"];
        assert_eq!(evidence.match_variant.as_deref(), Some("питон"));
        assert_eq!(evidence.score, 100.0);
    }

    #[test]
    fn test_fuzzy_match_by_token_overlap() {
        let result = canonicalize(&["Boot Spring"], &index(), DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(result.skills.len(), 1);
        assert!(result.skills.contains("Spring"));
        let evidence = &result.details["Boot Spring"];
        assert_eq!(evidence.canonical, "Spring");
        assert!(evidence.score >= DEFAULT_FUZZY_THRESHOLD);
    }

    #[test]
    fn test_unknown_skill_kept_verbatim() {
        let result = canonicalize(&["  Quantum Origami "], &index(), DEFAULT_FUZZY_THRESHOLD);
        assert!(result.skills.contains("Quantum Origami"));
        let evidence = &result.details["  Quantum Origami "];
        assert_eq!(evidence.match_variant, None);
        assert!(evidence.score < DEFAULT_FUZZY_THRESHOLD);
    }

    #[test]
    fn test_empty_index_scores_zero() {
        let empty = SkillIndex::default();
        let result = canonicalize(&["Python"], &empty, DEFAULT_FUZZY_THRESHOLD);
        assert!(result.skills.contains("Python"));
        assert_eq!(result.details["Python"].score, 0.0);
    }

    #[test]
    fn test_blank_entries_skipped_and_duplicates_collapsed() {
        let result = canonicalize(
            &["", "   ", "Python", "python3", "py"],
            &index(),
            DEFAULT_FUZZY_THRESHOLD,
        );
        assert_eq!(result.skills.len(), 1);
        assert_eq!(result.details.len(), 3);
    }
}
