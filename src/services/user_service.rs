// src/services/user_service.rs
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::app_log;
use crate::core::{Database, UserRepository};
use crate::llm::DialogAnalysis;
use crate::types::{CandidateProfile, NewProfile, ProfileUpdate, Sex};

/// One row of a profile import file. `hard_skills` is `;`-separated.
#[derive(Debug, Deserialize)]
struct ProfileRecord {
    first_name: String,
    last_name: String,
    sex: String,
    birth_date: NaiveDate,
    current_position: String,
    education: Option<String>,
    experience_years: Option<i32>,
    experience_months: Option<i32>,
    experience_description: Option<String>,
    hard_skills: Option<String>,
    career_expectations: Option<String>,
}

impl ProfileRecord {
    fn into_new_profile(self) -> Result<NewProfile> {
        let sex: Sex = self.sex.parse()?;
        let hard_skills = self
            .hard_skills
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(NewProfile {
            first_name: self.first_name,
            last_name: self.last_name,
            sex,
            birth_date: self.birth_date,
            current_position: self.current_position,
            education: non_blank(self.education),
            experience_years: self.experience_years.unwrap_or(0),
            experience_months: self.experience_months.unwrap_or(0),
            experience_description: non_blank(self.experience_description),
            hard_skills,
            career_expectations: non_blank(self.career_expectations),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a CSV profile export. Each row yields either a profile or the
/// reason it was rejected, keyed by its 1-based data row number.
pub fn parse_profiles_csv(content: &str) -> Result<Vec<(usize, Result<NewProfile>)>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers().context("Failed to read CSV header")?;
    for required in ["first_name", "last_name", "sex", "birth_date", "current_position"] {
        if !headers.iter().any(|h| h == required) {
            anyhow::bail!("CSV header is missing column: {}", required);
        }
    }

    Ok(reader
        .deserialize::<ProfileRecord>()
        .enumerate()
        .map(|(i, record)| {
            let row = record
                .context("Malformed CSV row")
                .and_then(ProfileRecord::into_new_profile);
            (i + 1, row)
        })
        .collect())
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<Uuid>,
    pub rejected: Vec<(usize, String)>,
}

pub struct UserService<'a> {
    users: UserRepository<'a>,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            users: UserRepository::new(db.pool()),
        }
    }

    pub async fn create(&self, new_profile: NewProfile) -> Result<CandidateProfile> {
        new_profile.validate(Utc::now().date_naive())?;
        let profile = new_profile.into_profile(Uuid::new_v4(), Utc::now());
        self.users.insert(&profile).await?;
        Ok(profile)
    }

    pub async fn get(&self, id: Uuid) -> Result<CandidateProfile> {
        self.users
            .get(id)
            .await?
            .with_context(|| format!("User not found: {}", id))
    }

    pub async fn list(&self) -> Result<Vec<CandidateProfile>> {
        self.users.list().await
    }

    /// Validates the merged record before writing only the given fields
    pub async fn update(&self, id: Uuid, update: &ProfileUpdate) -> Result<CandidateProfile> {
        let mut profile = self.get(id).await?;
        if update.is_empty() {
            return Ok(profile);
        }

        update.apply_to(&mut profile);
        profile.validate(Utc::now().date_naive())?;

        self.users
            .update_info(id, update)
            .await?
            .with_context(|| format!("User not found: {}", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.users.delete(id).await? {
            anyhow::bail!("User not found: {}", id);
        }
        Ok(())
    }

    /// Inserts every valid row; invalid rows are reported, not fatal
    pub async fn import_csv(&self, content: &str) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        for (row, parsed) in parse_profiles_csv(content)? {
            let outcome = match parsed {
                Ok(new_profile) => self.create(new_profile).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(profile) => report.imported.push(profile.id),
                Err(e) => {
                    app_log!(warn, "Skipping CSV row {}: {:#}", row, e);
                    report.rejected.push((row, format!("{:#}", e)));
                }
            }
        }
        app_log!(
            info,
            "Imported {} profiles, rejected {}",
            report.imported.len(),
            report.rejected.len()
        );
        Ok(report)
    }

    pub async fn apply_dialog_analysis(
        &self,
        id: Uuid,
        analysis: &DialogAnalysis,
    ) -> Result<CandidateProfile> {
        let profile = self.get(id).await?;
        let update = analysis.profile_update(&profile);
        if update.is_empty() {
            app_log!(info, "Dialog analysis added nothing new for {}", id);
            return Ok(profile);
        }
        self.update(id, &update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
first_name,last_name,sex,birth_date,current_position,education,experience_years,experience_months,experience_description,hard_skills,career_expectations
Anna,Ivanova,female,1994-03-14,Backend developer,MSU,3,6,,Python; SQL ;Docker,remote
Ivan,Petrov,x,1990-01-01,QA,,1,0,,,
Oleg,Sidorov,m,1988-07-30,Data engineer,,,,Spark pipelines,Kafka,
";

    fn new_profile() -> NewProfile {
        NewProfile {
            first_name: " Maria ".to_string(),
            last_name: "Orlova".to_string(),
            sex: Sex::Female,
            birth_date: NaiveDate::from_ymd_opt(1997, 5, 2).unwrap(),
            current_position: "Data analyst".to_string(),
            education: None,
            experience_years: 2,
            experience_months: 3,
            experience_description: None,
            hard_skills: vec!["SQL".to_string()],
            career_expectations: None,
        }
    }

    #[test]
    fn test_parse_profiles_csv() {
        let rows = parse_profiles_csv(CSV).unwrap();
        assert_eq!(rows.len(), 3);

        let anna = rows[0].1.as_ref().unwrap();
        assert_eq!(anna.hard_skills, vec!["Python", "SQL", "Docker"]);
        assert_eq!(anna.experience_months, 6);
        assert_eq!(anna.experience_description, None);
        assert_eq!(anna.career_expectations.as_deref(), Some("remote"));

        assert_eq!(rows[1].0, 2);
        assert!(rows[1].1.is_err());

        let oleg = rows[2].1.as_ref().unwrap();
        assert_eq!(oleg.sex, Sex::Male);
        assert_eq!(oleg.experience_years, 0);
        assert_eq!(oleg.hard_skills, vec!["Kafka"]);
    }

    #[test]
    fn test_csv_requires_core_columns() {
        assert!(parse_profiles_csv("first_name,last_name\nA,B\n").is_err());
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let db = Database::in_memory().await.unwrap();
        let service = UserService::new(&db);

        let created = service.create(new_profile()).await.unwrap();
        assert_eq!(created.first_name, "Maria");
        assert_eq!(created.experience_total_months, Some(27));

        let update = ProfileUpdate {
            experience_years: Some(3),
            ..Default::default()
        };
        let updated = service.update(created.id, &update).await.unwrap();
        assert_eq!(updated.experience_total_months, Some(39));
        assert_eq!(updated.experience_months, 3);

        let invalid = ProfileUpdate {
            experience_months: Some(12),
            ..Default::default()
        };
        assert!(service.update(created.id, &invalid).await.is_err());
        assert_eq!(service.get(created.id).await.unwrap().experience_months, 3);

        service.delete(created.id).await.unwrap();
        assert!(service.get(created.id).await.is_err());
        assert!(service.delete(created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_profile() {
        let db = Database::in_memory().await.unwrap();
        let service = UserService::new(&db);
        let mut bad = new_profile();
        bad.last_name = "   ".to_string();
        assert!(service.create(bad).await.is_err());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_csv_reports_rejected_rows() {
        let db = Database::in_memory().await.unwrap();
        let service = UserService::new(&db);
        let report = service.import_csv(CSV).await.unwrap();
        assert_eq!(report.imported.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, 2);
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_apply_dialog_analysis() {
        let db = Database::in_memory().await.unwrap();
        let service = UserService::new(&db);
        let created = service.create(new_profile()).await.unwrap();

        let analysis = DialogAnalysis {
            new_hard_skills: vec!["Python".to_string(), "SQL".to_string()],
            new_experience: "Built BI dashboards.".to_string(),
            career_expectations: "Move to data engineering".to_string(),
        };
        let updated = service
            .apply_dialog_analysis(created.id, &analysis)
            .await
            .unwrap();
        assert_eq!(updated.hard_skills, vec!["SQL", "Python"]);
        assert_eq!(
            updated.experience_description.as_deref(),
            Some("Built BI dashboards.")
        );
        assert_eq!(
            updated.career_expectations.as_deref(),
            Some("Move to data engineering")
        );
    }
}
