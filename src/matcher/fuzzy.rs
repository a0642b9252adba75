// src/matcher/fuzzy.rs
//! Approximate string matching on a 0-100 scale.
//!
//! `ratio` is the normalized Indel similarity. The token-based scorers build
//! on it the way rapidfuzz's `fuzz` module does: tokens are whitespace
//! separated and compared as sorted sets, so word order never matters.

use rapidfuzz::distance::indel;
use std::collections::BTreeSet;

/// Scoring function shape shared by every scorer in this module.
pub type Scorer = fn(&str, &str) -> f64;

/// Normalized Indel similarity. Empty input on either side scores 0.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

fn token_set(s: &str) -> BTreeSet<&str> {
    s.split_whitespace().collect()
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Ratio of both strings after sorting their tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Order-insensitive token overlap.
///
/// Scores 100 when the tokens of one side are a subset of the other's.
/// Otherwise the best of: the two differences against each other, and the
/// shared tokens against each side's full sorted token list.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect = intersection.join(" ");
    let ab = diff_ab.join(" ");
    let ba = diff_ba.join(" ");

    let mut best = ratio(&ab, &ba);
    if !sect.is_empty() {
        let sect_ab = format!("{} {}", sect, ab);
        let sect_ba = format!("{} {}", sect, ba);
        best = best.max(ratio(&sect, &sect_ab)).max(ratio(&sect, &sect_ba));
    }
    best
}

/// Best alignment of the shorter string against equally long windows of the
/// longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if shorter.is_empty() {
        return 0.0;
    }

    let longer_chars: Vec<char> = longer.chars().collect();
    let window = shorter.chars().count();
    if window == longer_chars.len() {
        return ratio(shorter, longer);
    }

    let mut best = 0.0_f64;
    for start in 0..=(longer_chars.len() - window) {
        let candidate: String = longer_chars[start..start + window].iter().collect();
        let score = ratio(shorter, &candidate);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

/// Partial alignment on tokens. Any shared token scores 100; otherwise the
/// best of the sorted token lists and the two token differences.
pub fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    if tokens_a.intersection(&tokens_b).next().is_some() {
        return 100.0;
    }

    let best = partial_ratio(&sorted_tokens(a), &sorted_tokens(b));
    // Without repeated tokens the differences are the sorted lists again
    let words_a = a.split_whitespace().count();
    let words_b = b.split_whitespace().count();
    if words_a == tokens_a.len() && words_b == tokens_b.len() {
        return best;
    }

    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();
    best.max(partial_ratio(&diff_ab.join(" "), &diff_ba.join(" ")))
}

/// Weighted blend of the scorers above, chosen by how different the two
/// lengths are.
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    const UNBASE_SCALE: f64 = 0.95;

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let len_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;
    let end_ratio = ratio(a, b);

    if len_ratio < 1.5 {
        return end_ratio
            .max(token_sort_ratio(a, b) * UNBASE_SCALE)
            .max(token_set_ratio(a, b) * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    let partial = partial_ratio(a, b) * partial_scale;
    let partial_tokens = partial_token_ratio(a, b) * partial_scale * UNBASE_SCALE;

    end_ratio.max(partial).max(partial_tokens)
}

/// First best-scoring choice with a score of at least `cutoff`.
pub fn extract_one<'a, I>(query: &str, choices: I, scorer: Scorer, cutoff: f64) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for choice in choices {
        let score = scorer(query, choice);
        if score < cutoff {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => {
                best = Some((choice, score));
                if score >= 100.0 {
                    break;
                }
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_identical_and_empty() {
        assert_eq!(ratio("python", "python"), 100.0);
        assert_eq!(ratio("", "python"), 0.0);
        assert_eq!(ratio("python", ""), 0.0);
    }

    #[test]
    fn test_token_set_ratio_ignores_order_and_subsets() {
        assert_eq!(token_set_ratio("machine learning", "learning machine"), 100.0);
        assert_eq!(token_set_ratio("spring boot", "spring"), 100.0);
        assert_eq!(token_set_ratio("", "spring"), 0.0);
        assert!(token_set_ratio("django", "python") < 50.0);
    }

    #[test]
    fn test_token_sort_ratio() {
        assert_eq!(token_sort_ratio("data science", "science data"), 100.0);
    }

    #[test]
    fn test_partial_ratio_finds_substring() {
        assert_eq!(partial_ratio("python", "strong python skills"), 100.0);
        assert_eq!(partial_ratio("", "python"), 0.0);
    }

    #[test]
    fn test_partial_token_ratio_shared_token_and_differences() {
        assert_eq!(partial_token_ratio("rest api design", "api"), 100.0);
        assert_eq!(partial_token_ratio("", "api"), 0.0);
        // Repeated tokens collapse in the differences
        assert_eq!(partial_token_ratio("go go go", "golang"), 100.0);
        assert!(partial_token_ratio("kubernetes", "postgres") < 100.0);
    }

    #[test]
    fn test_weighted_ratio_uses_token_partial_for_long_pairs() {
        // A whole shared token puts a floor under long-vs-short pairs
        let score = weighted_ratio("ml ops", "ops engineering team");
        assert!(score >= 100.0 * 0.9 * 0.95 - 1e-9, "got {}", score);
    }

    #[test]
    fn test_weighted_ratio_scales_partial_matches() {
        assert_eq!(weighted_ratio("docker", "docker"), 100.0);
        let score = weighted_ratio("python", "python django");
        assert!((score - 90.0).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_extract_one_returns_first_best() {
        let choices = ["java", "python", "python"];
        let best = extract_one("python", choices.iter().copied(), ratio, 0.0);
        assert_eq!(best, Some(("python", 100.0)));

        let none = extract_one("python", std::iter::empty(), ratio, 0.0);
        assert!(none.is_none());

        let below = extract_one("rust", ["haskell"].iter().copied(), ratio, 90.0);
        assert!(below.is_none());
    }
}
