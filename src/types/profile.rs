// src/types/profile.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::validation::{
    check_birth_date, check_experience, check_name, check_not_blank, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => anyhow::bail!("Unknown sex: {}. Use male or female", other),
        }
    }
}

/// A stored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub current_position: String,
    pub education: Option<String>,
    pub experience_years: i32,
    pub experience_months: i32,
    /// Derived from years and months when the record is written.
    pub experience_total_months: Option<i64>,
    pub experience_description: Option<String>,
    pub hard_skills: Vec<String>,
    pub career_expectations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateProfile {
    /// Precomputed total when present and positive, else `years * 12 + months`.
    pub fn total_months(&self) -> i64 {
        self.experience_total_months
            .filter(|total| *total > 0)
            .unwrap_or_else(|| total_months(self.experience_years, self.experience_months))
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        check_name("first_name", &self.first_name)?;
        check_name("last_name", &self.last_name)?;
        check_birth_date(self.birth_date, today)?;
        check_not_blank("current_position", &self.current_position)?;
        check_experience(self.experience_years, self.experience_months)
    }
}

pub fn total_months(years: i32, months: i32) -> i64 {
    i64::from(years) * 12 + i64::from(months)
}

/// Input for creating a candidate; identity and timestamps are assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProfile {
    pub first_name: String,
    pub last_name: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub current_position: String,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub experience_years: i32,
    #[serde(default)]
    pub experience_months: i32,
    #[serde(default)]
    pub experience_description: Option<String>,
    #[serde(default)]
    pub hard_skills: Vec<String>,
    #[serde(default)]
    pub career_expectations: Option<String>,
}

impl NewProfile {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        check_name("first_name", &self.first_name)?;
        check_name("last_name", &self.last_name)?;
        check_birth_date(self.birth_date, today)?;
        check_not_blank("current_position", &self.current_position)?;
        check_experience(self.experience_years, self.experience_months)
    }

    pub fn into_profile(self, id: Uuid, now: DateTime<Utc>) -> CandidateProfile {
        CandidateProfile {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            sex: self.sex,
            birth_date: self.birth_date,
            current_position: self.current_position.trim().to_string(),
            education: self.education,
            experience_years: self.experience_years,
            experience_months: self.experience_months,
            experience_total_months: Some(total_months(
                self.experience_years,
                self.experience_months,
            )),
            experience_description: self.experience_description,
            hard_skills: self.hard_skills,
            career_expectations: self.career_expectations,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update: only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub current_position: Option<String>,
    pub education: Option<String>,
    pub experience_years: Option<i32>,
    pub experience_months: Option<i32>,
    pub experience_description: Option<String>,
    pub hard_skills: Option<Vec<String>>,
    pub career_expectations: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }

    /// Applies the provided fields in memory and refreshes the total.
    pub fn apply_to(&self, profile: &mut CandidateProfile) {
        if let Some(position) = &self.current_position {
            profile.current_position = position.trim().to_string();
        }
        if let Some(education) = &self.education {
            profile.education = Some(education.clone());
        }
        if let Some(years) = self.experience_years {
            profile.experience_years = years;
        }
        if let Some(months) = self.experience_months {
            profile.experience_months = months;
        }
        if let Some(description) = &self.experience_description {
            profile.experience_description = Some(description.clone());
        }
        if let Some(skills) = &self.hard_skills {
            profile.hard_skills = skills.clone();
        }
        if let Some(expectations) = &self.career_expectations {
            profile.career_expectations = Some(expectations.clone());
        }
        profile.experience_total_months = Some(total_months(
            profile.experience_years,
            profile.experience_months,
        ));
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn profile(skills: &[&str], years: i32, months: i32) -> CandidateProfile {
        let now = Utc::now();
        CandidateProfile {
            id: Uuid::new_v4(),
            first_name: "Anna".to_string(),
            last_name: "Ivanova".to_string(),
            sex: Sex::Female,
            birth_date: NaiveDate::from_ymd_opt(1994, 3, 14).unwrap(),
            current_position: "Backend developer".to_string(),
            education: Some("MSU, Applied Mathematics".to_string()),
            experience_years: years,
            experience_months: months,
            experience_total_months: Some(total_months(years, months)),
            experience_description: None,
            hard_skills: skills.iter().map(|s| s.to_string()).collect(),
            career_expectations: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_total_months_prefers_precomputed() {
        let mut profile = fixtures::profile(&[], 2, 3);
        assert_eq!(profile.total_months(), 27);
        profile.experience_total_months = Some(40);
        assert_eq!(profile.total_months(), 40);
        profile.experience_total_months = None;
        assert_eq!(profile.total_months(), 27);
    }

    #[test]
    fn test_validate_profile() {
        let profile = fixtures::profile(&["Python"], 3, 0);
        assert!(profile.validate(today()).is_ok());

        let mut bad = profile.clone();
        bad.first_name = "  ".to_string();
        assert_eq!(
            bad.validate(today()),
            Err(ValidationError::Blank { field: "first_name" })
        );

        let mut bad = profile.clone();
        bad.experience_months = 12;
        assert_eq!(bad.validate(today()), Err(ValidationError::ExperienceMonths(12)));

        let mut bad = profile;
        bad.current_position = "\t".to_string();
        assert!(bad.validate(today()).is_err());
    }

    #[test]
    fn test_update_recomputes_total() {
        let mut profile = fixtures::profile(&["Python"], 1, 6);
        let update = ProfileUpdate {
            experience_years: Some(4),
            hard_skills: Some(vec!["Rust".to_string()]),
            ..Default::default()
        };
        update.apply_to(&mut profile);
        assert_eq!(profile.experience_years, 4);
        assert_eq!(profile.experience_months, 6);
        assert_eq!(profile.experience_total_months, Some(54));
        assert_eq!(profile.hard_skills, vec!["Rust"]);
        assert!(ProfileUpdate::default().is_empty());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_new_profile_trims_names() {
        let new = NewProfile {
            first_name: " Ivan ".to_string(),
            last_name: "Petrov".to_string(),
            sex: "m".parse().unwrap(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            current_position: "QA engineer".to_string(),
            education: None,
            experience_years: 5,
            experience_months: 2,
            experience_description: None,
            hard_skills: vec![],
            career_expectations: None,
        };
        assert!(new.validate(today()).is_ok());
        let profile = new.into_profile(Uuid::new_v4(), Utc::now());
        assert_eq!(profile.first_name, "Ivan");
        assert_eq!(profile.sex, Sex::Male);
        assert_eq!(profile.experience_total_months, Some(62));
    }

    #[test]
    fn test_sex_parsing() {
        assert_eq!("Female".parse::<Sex>().unwrap(), Sex::Female);
        assert!("unknown".parse::<Sex>().is_err());
        assert_eq!(Sex::Male.to_string(), "male");
    }
}
