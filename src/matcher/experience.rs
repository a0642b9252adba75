// src/matcher/experience.rs
//! Experience fit against a vacancy's `[min, max]` window, in months.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a candidate above the vacancy maximum is scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverMaxPolicy {
    #[default]
    Cap,
    Plateau,
    Bonus,
}

impl OverMaxPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverMaxPolicy::Cap => "cap",
            OverMaxPolicy::Plateau => "plateau",
            OverMaxPolicy::Bonus => "bonus",
        }
    }
}

impl fmt::Display for OverMaxPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverMaxPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cap" => Ok(OverMaxPolicy::Cap),
            "plateau" => Ok(OverMaxPolicy::Plateau),
            "bonus" => Ok(OverMaxPolicy::Bonus),
            other => anyhow::bail!("Unknown over-max policy: {}. Use cap, plateau or bonus", other),
        }
    }
}

/// Scores experience fit.
///
/// - no experience on record: 0
/// - below the minimum: `(user / min) ^ gamma`, clamped to `[0, 1]`; a
///   non-positive minimum cannot be undershot meaningfully and scores 0
/// - inside the window (inclusive): 1
/// - above a finite maximum: 1 for `cap`/`plateau`; `bonus` yields
///   `min(1, 1 + bonus)`
///
/// Missing bounds read as `0` and `+inf`. A maximum below the minimum is
/// raised to the minimum rather than rejected.
pub fn experience_score(
    user_months: Option<i64>,
    min_months: Option<i64>,
    max_months: Option<i64>,
    gamma: f64,
    over_max_policy: OverMaxPolicy,
    over_max_bonus: f64,
) -> f64 {
    let Some(user) = user_months else {
        return 0.0;
    };

    let user = user.max(0);
    let min = min_months.unwrap_or(0);
    let max = max_months.map(|max| max.max(min));

    if user < min {
        if min <= 0 {
            return 0.0;
        }
        let raw = (user as f64 / min as f64).powf(gamma);
        return raw.clamp(0.0, 1.0);
    }

    match max {
        Some(max) if user > max => match over_max_policy {
            // Clamped to 1 on purpose; the bonus never lifts the score.
            OverMaxPolicy::Bonus => (1.0 + over_max_bonus).min(1.0),
            OverMaxPolicy::Cap | OverMaxPolicy::Plateau => 1.0,
        },
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(user: Option<i64>, min: Option<i64>, max: Option<i64>) -> f64 {
        experience_score(user, min, max, 2.0, OverMaxPolicy::Cap, 0.05)
    }

    #[test]
    fn test_missing_user_months_is_zero() {
        assert_eq!(score(None, None, None), 0.0);
        assert_eq!(score(None, Some(12), Some(36)), 0.0);
        assert_eq!(score(None, Some(0), None), 0.0);
    }

    #[test]
    fn test_inside_window_is_one() {
        assert_eq!(score(Some(24), Some(12), Some(36)), 1.0);
        for user in 12..=36 {
            assert_eq!(score(Some(user), Some(12), Some(36)), 1.0);
        }
        assert_eq!(score(Some(500), Some(12), None), 1.0);
    }

    #[test]
    fn test_zero_required_zero_held() {
        assert_eq!(score(Some(0), Some(0), Some(0)), 1.0);
        assert_eq!(score(Some(0), Some(0), Some(60)), 1.0);
        assert_eq!(score(Some(0), None, None), 1.0);
    }

    #[test]
    fn test_shortfall_curve() {
        let s = score(Some(6), Some(24), None);
        assert!((s - 0.0625).abs() < 1e-12);
        let linear = experience_score(Some(6), Some(24), None, 1.0, OverMaxPolicy::Cap, 0.0);
        assert!((linear - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_shortfall_monotonic() {
        for gamma in [1.0, 1.5, 2.0, 3.0] {
            let mut previous = 0.0;
            for user in 0..48 {
                let s = experience_score(Some(user), Some(48), None, gamma, OverMaxPolicy::Cap, 0.0);
                assert!(s >= previous);
                assert!((0.0..=1.0).contains(&s));
                previous = s;
            }
        }
    }

    #[test]
    fn test_negative_inputs() {
        assert_eq!(score(Some(-5), Some(12), None), 0.0);
        assert_eq!(score(Some(-5), Some(0), None), 1.0);
        assert_eq!(score(Some(0), Some(-3), None), 1.0);
    }

    #[test]
    fn test_inverted_bounds_repaired() {
        assert_eq!(score(Some(30), Some(24), Some(12)), 1.0);
        assert_eq!(score(Some(24), Some(24), Some(12)), 1.0);
        let s = score(Some(12), Some(24), Some(6));
        assert!((s - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_over_max_policies() {
        for policy in [OverMaxPolicy::Cap, OverMaxPolicy::Plateau, OverMaxPolicy::Bonus] {
            assert_eq!(experience_score(Some(100), Some(12), Some(36), 2.0, policy, 0.05), 1.0);
        }
        assert_eq!(
            experience_score(Some(100), Some(12), Some(36), 2.0, OverMaxPolicy::Bonus, -0.2),
            0.8
        );
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Bonus".parse::<OverMaxPolicy>().unwrap(), OverMaxPolicy::Bonus);
        assert_eq!(" plateau ".parse::<OverMaxPolicy>().unwrap(), OverMaxPolicy::Plateau);
        assert!("reward".parse::<OverMaxPolicy>().is_err());
        assert_eq!(OverMaxPolicy::Cap.to_string(), "cap");
    }
}
