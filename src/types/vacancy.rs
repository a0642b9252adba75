// src/types/vacancy.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{check_experience_range, check_not_blank, ValidationError};

/// A stored job posting. Experience bounds are in months; an absent maximum
/// is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vacancy {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub min_exp_months: Option<i64>,
    pub max_exp_months: Option<i64>,
    pub must_have: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVacancy {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub min_exp_months: Option<i64>,
    #[serde(default)]
    pub max_exp_months: Option<i64>,
    #[serde(default)]
    pub must_have: Vec<String>,
    #[serde(default)]
    pub nice_to_have: Vec<String>,
}

impl NewVacancy {
    /// Builds a vacancy from parsed text; years become months. Oversized
    /// year counts saturate and are left for `validate` to reject.
    pub fn from_parsed(name: &str, description: String, parsed: ParsedVacancy) -> Self {
        Self {
            name: name.trim().to_string(),
            description,
            min_exp_months: parsed.years_min.map(years_to_months),
            max_exp_months: parsed.years_max.map(years_to_months),
            must_have: parsed.must_have,
            nice_to_have: parsed.nice_to_have,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_not_blank("name", &self.name)?;
        check_experience_range(self.min_exp_months, self.max_exp_months)
    }

    pub fn into_vacancy(self, id: Uuid, now: DateTime<Utc>) -> Vacancy {
        Vacancy {
            id,
            name: self.name,
            description: self.description,
            min_exp_months: self.min_exp_months,
            max_exp_months: self.max_exp_months,
            must_have: self.must_have,
            nice_to_have: self.nice_to_have,
            created_at: now,
            updated_at: now,
        }
    }
}

fn years_to_months(years: i64) -> i64 {
    years.saturating_mul(12)
}

/// What the vacancy text parser recovers from a posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedVacancy {
    pub years_min: Option<i64>,
    pub years_max: Option<i64>,
    pub must_have: Vec<String>,
    pub nice_to_have: Vec<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn vacancy(must: &[&str], nice: &[&str], min: Option<i64>, max: Option<i64>) -> Vacancy {
        NewVacancy {
            name: "Backend developer".to_string(),
            description: "Python backend services".to_string(),
            min_exp_months: min,
            max_exp_months: max,
            must_have: must.iter().map(|s| s.to_string()).collect(),
            nice_to_have: nice.iter().map(|s| s.to_string()).collect(),
        }
        .into_vacancy(Uuid::new_v4(), Utc::now())
    }
}
